//! Cast orchestration
//!
//! Operators call into this module to bring their operands to a dtype the
//! kernel they are about to launch accepts:
//!
//! ```text
//! promote_all ──► cast_to (per tensor) ──► resolve ──► direct / special tables
//!                     │
//!                     └─► request_tensor + cast_data_type (one or two hops)
//! ```
//!
//! Every cast is enqueued on the client's queue; nothing here waits for the
//! device. Failures abort the remaining work without undoing what was
//! already enqueued.

mod plan;

pub use plan::{
    CastOp, CastPlan, INTERMEDIATE_DTYPE, can_cast, direct_cast_op, resolve, special_cast_op,
};

use crate::dtype::{DType, DTypeSet, promotion_target};
use crate::error::{Error, Result};
use crate::runtime::{Runtime, RuntimeClient};
use crate::tensor::{Tensor, TensorDesc};

/// Dtype conversion operations available on every runtime client
pub trait CastOps<R: Runtime> {
    /// Cast `tensor` to `dtype`, rebinding it to the converted tensor
    ///
    /// A tensor already of `dtype` is left untouched: no allocation, no
    /// kernel launch. Otherwise a new tensor of the same shape is requested
    /// and `tensor` is rebound to it once the cast is enqueued.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCast` if no cast path exists; `tensor` is then
    /// unchanged and nothing was allocated.
    fn cast_to(&self, tensor: &mut Tensor<R>, dtype: DType) -> Result<()>;

    /// Cast into a new view, leaving `tensor` as it is
    fn cast_to_new(&self, tensor: &Tensor<R>, dtype: DType) -> Result<Tensor<R>> {
        let mut out = tensor.clone();
        self.cast_to(&mut out, dtype)?;
        Ok(out)
    }

    /// Cast `src` into the existing allocation of `dst`
    ///
    /// Matching dtypes make this a no-op. Otherwise the shapes must be equal.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the shapes differ, `UnsupportedCast` if no
    /// cast path exists.
    fn cast_into(&self, dst: &mut Tensor<R>, src: &Tensor<R>) -> Result<()>;

    /// Bring every tensor to one dtype the operator supports
    ///
    /// The target is chosen by [`promotion_target`] from the distinct operand
    /// dtypes and `supported`. Tensors are cast in order; the first failure
    /// is returned and tensors cast before it stay cast.
    ///
    /// Returns the chosen dtype.
    fn promote_all(&self, tensors: &mut [&mut Tensor<R>], supported: DTypeSet) -> Result<DType>;
}

impl<R: Runtime, C: RuntimeClient<R>> CastOps<R> for C {
    fn cast_to(&self, tensor: &mut Tensor<R>, dtype: DType) -> Result<()> {
        let src_dtype = tensor.dtype();
        if src_dtype == dtype {
            return Ok(());
        }

        let plan = resolve(src_dtype, dtype)?;
        let mut dst = Tensor::from_handle(self.request_tensor(tensor.shape(), dtype)?);
        tracing::debug!(src = %src_dtype, dst = %dtype, hops = plan.hops(), "cast to new tensor");

        run_plan(self, plan, tensor, &mut dst)?;
        *tensor = dst;
        Ok(())
    }

    fn cast_into(&self, dst: &mut Tensor<R>, src: &Tensor<R>) -> Result<()> {
        if src.dtype() == dst.dtype() {
            return Ok(());
        }
        if src.shape() != dst.shape() {
            return Err(Error::shape_mismatch(dst.shape(), src.shape()));
        }

        let plan = resolve(src.dtype(), dst.dtype())?;
        tracing::debug!(src = %src.dtype(), dst = %dst.dtype(), hops = plan.hops(), "cast into destination");

        run_plan(self, plan, src, dst)
    }

    fn promote_all(&self, tensors: &mut [&mut Tensor<R>], supported: DTypeSet) -> Result<DType> {
        let present: DTypeSet = tensors.iter().map(|t| t.dtype()).collect();
        let target = promotion_target(present, supported)?;
        tracing::debug!(?present, ?supported, %target, "promoting operands");

        for tensor in tensors.iter_mut() {
            self.cast_to(tensor, target)?;
        }
        Ok(target)
    }
}

/// Enqueue the hop(s) of `plan` converting `src` into `dst`
fn run_plan<R: Runtime, C: RuntimeClient<R>>(
    client: &C,
    plan: CastPlan,
    src: &Tensor<R>,
    dst: &mut Tensor<R>,
) -> Result<()> {
    match plan {
        CastPlan::Direct(op) => launch(client, op, src, dst),
        CastPlan::TwoHop {
            intermediate,
            first,
            second,
        } => {
            let mut scratch = Tensor::from_handle(client.request_tensor(src.shape(), intermediate)?);
            tracing::debug!(%intermediate, "requested two-hop scratch tensor");
            launch(client, first, src, &mut scratch)?;
            launch(client, second, &scratch, dst)
        }
    }
}

fn launch<R: Runtime, C: RuntimeClient<R>>(
    client: &C,
    op: CastOp,
    src: &Tensor<R>,
    dst: &mut Tensor<R>,
) -> Result<()> {
    let src_desc = TensorDesc::new(src);
    let dst_desc = TensorDesc::new(dst);
    let src_ptr = src.data_ptr();
    let dst_ptr = dst.data_ptr_mut();
    client.cast_data_type(&src_desc, src_ptr, op, &dst_desc, dst_ptr)
}
