//! Scoped host memory pool

use crate::error::{Error, Result};
use crate::runtime::Allocator;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// First address handed out; keeps `0` free to mean "no allocation"
const BASE_ADDR: u64 = 0x1000;

/// Block alignment in bytes
const ALIGN: u64 = 64;

#[derive(Debug, Default)]
struct PoolState {
    blocks: HashMap<u64, Vec<u8>>,
    next_addr: u64,
    limit: Option<usize>,
    bytes: usize,
}

/// Scoped pool of zeroed host blocks
///
/// Addresses are synthetic and only grow, so a handle kept across
/// [`Allocator::reset`] never resolves to a newer block: using it is
/// reported as a backend error instead of reading someone else's data.
///
/// Clones share the same pool.
#[derive(Clone, Debug)]
pub struct HostPool {
    state: Arc<Mutex<PoolState>>,
}

impl HostPool {
    /// Create an unbounded pool
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Create a pool refusing to hold more than `limit` bytes at once
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState {
                next_addr: BASE_ADDR,
                limit,
                ..PoolState::default()
            })),
        }
    }

    /// Byte limit, if any
    pub fn limit(&self) -> Option<usize> {
        self.state.lock().limit
    }

    /// Copy `bytes` to the start of the block at `addr`
    pub(crate) fn write(&self, addr: u64, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let block = lookup_mut(&mut state.blocks, addr)?;
        let len = block.len();
        let Some(target) = block.get_mut(..bytes.len()) else {
            return Err(overrun(addr, bytes.len(), len));
        };
        target.copy_from_slice(bytes);
        Ok(())
    }

    /// Copy the first `len` bytes of the block at `addr`
    pub(crate) fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
        let state = self.state.lock();
        let block = state.blocks.get(&addr).ok_or_else(|| stale(addr))?;
        block
            .get(..len)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| overrun(addr, len, block.len()))
    }

    /// Run `f` over the source block and the destination block
    ///
    /// The two addresses must name distinct live blocks.
    pub(crate) fn with_blocks<T>(
        &self,
        src: u64,
        dst: u64,
        f: impl FnOnce(&[u8], &mut [u8]) -> Result<T>,
    ) -> Result<T> {
        if src == dst {
            return Err(Error::Backend(format!(
                "source and destination alias the block at 0x{src:x}"
            )));
        }
        let mut state = self.state.lock();
        // Take the destination out so both blocks can be borrowed at once
        let mut dst_block = state.blocks.remove(&dst).ok_or_else(|| stale(dst))?;
        let result = match state.blocks.get(&src) {
            Some(src_block) => f(src_block, &mut dst_block),
            None => Err(stale(src)),
        };
        state.blocks.insert(dst, dst_block);
        result
    }
}

impl Default for HostPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for HostPool {
    fn allocate(&self, size_bytes: usize) -> Result<u64> {
        let mut state = self.state.lock();
        if let Some(limit) = state.limit {
            if state.bytes.saturating_add(size_bytes) > limit {
                tracing::trace!(size_bytes, in_use = state.bytes, limit, "host pool exhausted");
                return Err(Error::OutOfMemory { size: size_bytes });
            }
        }

        let addr = state.next_addr;
        let next_addr = u64::try_from(size_bytes.max(1))
            .ok()
            .and_then(|len| len.checked_next_multiple_of(ALIGN))
            .and_then(|span| addr.checked_add(span))
            .ok_or(Error::OutOfMemory { size: size_bytes })?;
        let mut block = Vec::new();
        if block.try_reserve_exact(size_bytes).is_err() {
            tracing::trace!(size_bytes, "host allocation refused");
            return Err(Error::OutOfMemory { size: size_bytes });
        }
        block.resize(size_bytes, 0);
        state.next_addr = next_addr;
        state.bytes = state.bytes.saturating_add(size_bytes);
        state.blocks.insert(addr, block);
        tracing::trace!(addr, size_bytes, "host block allocated");
        Ok(addr)
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        tracing::trace!(
            blocks = state.blocks.len(),
            bytes = state.bytes,
            "host pool scope released"
        );
        state.blocks.clear();
        state.bytes = 0;
    }

    fn allocation_count(&self) -> usize {
        self.state.lock().blocks.len()
    }

    fn allocated_bytes(&self) -> usize {
        self.state.lock().bytes
    }
}

fn lookup_mut(blocks: &mut HashMap<u64, Vec<u8>>, addr: u64) -> Result<&mut Vec<u8>> {
    blocks.get_mut(&addr).ok_or_else(|| stale(addr))
}

fn stale(addr: u64) -> Error {
    Error::Backend(format!("no live allocation at 0x{addr:x}"))
}

fn overrun(addr: u64, wanted: usize, len: usize) -> Error {
    Error::Backend(format!(
        "access of {wanted} bytes overruns the {len}-byte block at 0x{addr:x}"
    ))
}
