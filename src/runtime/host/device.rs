//! Host device

use crate::runtime::Device;

/// Host memory device
///
/// Several ids can coexist so tests can tell clients apart; they all live
/// in process memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HostDevice {
    id: usize,
}

impl HostDevice {
    /// Create a host device with the given id
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

impl Device for HostDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        format!("host:{}", self.id)
    }
}
