//! Host runtime implementation

use super::{HostClient, HostDevice, HostHandle, HostPool, HostQueue};
use crate::runtime::Runtime;

/// Reference runtime backed by process memory
///
/// Implements the whole runtime contract without an accelerator: tensors
/// live in a scoped pool of byte blocks and casts run synchronously on the
/// host when they are enqueued.
#[derive(Clone, Debug, Default)]
pub struct HostRuntime;

impl Runtime for HostRuntime {
    type Device = HostDevice;
    type Client = HostClient;
    type Allocator = HostPool;
    type Handle = HostHandle;
    type Queue = HostQueue;

    fn name() -> &'static str {
        "host"
    }

    fn default_device() -> Self::Device {
        HostDevice::new(0)
    }

    fn default_client(device: &Self::Device) -> Self::Client {
        HostClient::new(device.clone())
    }
}
