//! Host client implementation

use super::kernels::cast_strided;
use super::{HostDevice, HostHandle, HostPool, HostQueue, HostRuntime};
use crate::cast::CastOp;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::{Allocator, RuntimeClient, TensorHandle};
use crate::tensor::{Layout, Tensor, TensorDesc};

/// Host context: device, scoped pool and launch queue
///
/// Clones share the pool and the queue, the way copies of an operator
/// context refer to the same device state.
#[derive(Clone, Debug)]
pub struct HostClient {
    device: HostDevice,
    pool: HostPool,
    queue: HostQueue,
}

impl HostClient {
    /// Create a client with an unbounded pool
    pub fn new(device: HostDevice) -> Self {
        Self {
            device,
            pool: HostPool::new(),
            queue: HostQueue::default(),
        }
    }

    /// Create a client whose pool holds at most `limit_bytes` at once
    pub fn with_pool_limit(device: HostDevice, limit_bytes: usize) -> Self {
        Self {
            device,
            pool: HostPool::with_limit(Some(limit_bytes)),
            queue: HostQueue::default(),
        }
    }

    /// End the current invocation scope, releasing every pool block
    ///
    /// Tensors requested before the reset become stale.
    pub fn reset_scope(&self) {
        self.pool.reset();
    }

    /// Blocks held by the current scope
    pub fn allocation_count(&self) -> usize {
        self.pool.allocation_count()
    }

    /// Bytes held by the current scope
    pub fn allocated_bytes(&self) -> usize {
        self.pool.allocated_bytes()
    }

    /// Copy `data` into a new row-major tensor of `shape`
    pub fn upload<T: Element>(&self, data: &[T], shape: &[i64]) -> Result<Tensor<HostRuntime>> {
        self.upload_bytes(bytemuck::cast_slice(data), shape, T::DTYPE)
    }

    /// Copy raw little-endian element bytes into a new row-major tensor
    ///
    /// Boolean tensors are uploaded this way, one `0`/`1` byte per element.
    pub fn upload_bytes(
        &self,
        bytes: &[u8],
        shape: &[i64],
        dtype: DType,
    ) -> Result<Tensor<HostRuntime>> {
        let expected = byte_len(&Layout::contiguous(shape)?, dtype)?;
        if bytes.len() != expected {
            return Err(Error::invalid_argument(
                "bytes",
                format!(
                    "{} bytes do not fill a {dtype} tensor of shape {shape:?} ({expected} bytes)",
                    bytes.len()
                ),
            ));
        }
        let handle = self.request_tensor(shape, dtype)?;
        self.pool.write(handle.data_ptr(), bytes)?;
        Ok(Tensor::from_handle(handle))
    }

    /// Copy a tensor's elements back in storage order
    pub fn download<T: Element>(&self, tensor: &Tensor<HostRuntime>) -> Result<Vec<T>> {
        if tensor.dtype() != T::DTYPE {
            return Err(Error::invalid_argument(
                "tensor",
                format!("cannot read a {} tensor as {}", tensor.dtype(), T::DTYPE),
            ));
        }
        let bytes = self.download_bytes(tensor)?;
        Ok(bytes
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }

    /// Copy a tensor's backing bytes
    pub fn download_bytes(&self, tensor: &Tensor<HostRuntime>) -> Result<Vec<u8>> {
        let len = byte_len(&tensor.layout(), tensor.dtype())?;
        self.pool.read(tensor.data_ptr(), len)
    }
}

impl RuntimeClient<HostRuntime> for HostClient {
    fn device(&self) -> &HostDevice {
        &self.device
    }

    fn queue(&self) -> &HostQueue {
        &self.queue
    }

    fn allocator(&self) -> &HostPool {
        &self.pool
    }

    fn synchronize(&self) {
        // Host kernels complete at launch, nothing to do
    }

    fn request_strided_tensor(
        &self,
        shape: &[i64],
        strides: &[i64],
        dtype: DType,
    ) -> Result<HostHandle> {
        let layout = Layout::new(shape, strides)?;
        // Element count must be addressable even when strides alias storage
        layout.elem_count()?;
        let size_bytes = byte_len(&layout, dtype)?;
        let ptr = self.pool.allocate(size_bytes)?;
        Ok(HostHandle::new(ptr, shape, strides, dtype, self.device.clone()))
    }

    fn request_buffer(&self, num_bytes: usize) -> Result<HostHandle> {
        let len = i64::try_from(num_bytes)
            .map_err(|_| Error::invalid_argument("num_bytes", "exceeds the addressable range"))?;
        self.request_tensor(&[len], DType::U8)
    }

    fn cast_data_type(
        &self,
        src: &TensorDesc,
        src_ptr: u64,
        op: CastOp,
        dst: &TensorDesc,
        dst_ptr: u64,
    ) -> Result<()> {
        let src_len = check_desc("source", src, op.src())?;
        let dst_len = check_desc("destination", dst, op.dst())?;
        if src.numel() != dst.numel() {
            return Err(Error::Backend(format!(
                "cast {op}: source has {} elements, destination has {}",
                src.numel(),
                dst.numel()
            )));
        }

        let numel = src.numel();
        self.pool.with_blocks(src_ptr, dst_ptr, |src_bytes, dst_bytes| {
            if src_bytes.len() < src_len || dst_bytes.len() < dst_len {
                return Err(Error::Backend(format!(
                    "cast {op}: {numel} elements overrun the backing blocks"
                )));
            }
            cast_strided(src_bytes, src, dst_bytes, dst);
            Ok(())
        })?;

        self.queue.push(op);
        tracing::trace!(%op, numel, "host cast launched");
        Ok(())
    }
}

/// Bytes an allocation needs to back every index of `layout`
fn byte_len(layout: &Layout, dtype: DType) -> Result<usize> {
    layout
        .storage_len()?
        .checked_mul(dtype.size_in_bytes())
        .ok_or_else(|| {
            Error::invalid_argument("shape", format!("{dtype} storage of {layout:?} overflows"))
        })
}

/// Validate a descriptor against the op; returns the bytes it reaches
fn check_desc(role: &str, desc: &TensorDesc, dtype: DType) -> Result<usize> {
    if desc.dtype() != dtype {
        return Err(Error::Backend(format!(
            "{role} descriptor is {} but the op expects {dtype}",
            desc.dtype()
        )));
    }
    if desc.numel() > 0 && desc.strides().iter().any(|&stride| stride < 0) {
        return Err(Error::Backend(format!(
            "{role} descriptor has negative strides {:?}",
            desc.strides()
        )));
    }
    Layout::new(desc.shape(), desc.strides())
        .and_then(|layout| byte_len(&layout, dtype))
        .map_err(|err| Error::Backend(format!("{role} descriptor: {err}")))
}
