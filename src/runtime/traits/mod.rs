//! Runtime traits for accelerator backend abstraction

pub mod client;
pub mod device;
pub mod handle;
pub mod runtime;

pub use client::RuntimeClient;
pub use device::Device;
pub use handle::TensorHandle;
pub use runtime::Runtime;
