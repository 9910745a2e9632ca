//! Host launch queue

use crate::cast::CastOp;
use parking_lot::Mutex;
use std::sync::Arc;

/// Record of the cast kernels launched through a client, in launch order
///
/// Host kernels complete at launch, so the queue only keeps the history.
/// Clones share the same record.
#[derive(Clone, Debug, Default)]
pub struct HostQueue {
    launched: Arc<Mutex<Vec<CastOp>>>,
}

impl HostQueue {
    pub(crate) fn push(&self, op: CastOp) {
        self.launched.lock().push(op);
    }

    /// Ops launched so far, oldest first
    pub fn launched(&self) -> Vec<CastOp> {
        self.launched.lock().clone()
    }

    /// Number of launched ops
    pub fn len(&self) -> usize {
        self.launched.lock().len()
    }

    /// Whether nothing was launched yet
    pub fn is_empty(&self) -> bool {
        self.launched.lock().is_empty()
    }
}
