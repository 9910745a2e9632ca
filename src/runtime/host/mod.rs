//! Host reference runtime
//!
//! Runs the full runtime contract in process memory: a scoped pool of byte
//! blocks addressed by synthetic device pointers, a launch queue that
//! records every cast, and a conversion kernel for every dtype pair. It is
//! what the cast engine is tested against and a template for accelerator
//! bindings.

mod client;
mod device;
mod handle;
mod kernels;
mod pool;
mod queue;
mod runtime;

pub use client::HostClient;
pub use device::HostDevice;
pub use handle::HostHandle;
pub use pool::HostPool;
pub use queue::HostQueue;
pub use runtime::HostRuntime;
