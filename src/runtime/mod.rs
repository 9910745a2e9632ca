//! Runtime backends the cast engine runs against
//!
//! This module defines the contract a concrete accelerator binding has to
//! fulfil, and a host-memory reference runtime implementing it.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a specific accelerator)
//! ├── Client (context: queue, scoped pool, cast kernel entry point)
//! ├── Allocator (scoped pool, reset per invocation)
//! └── Handle (opaque tensor handle with property accessors)
//! ```

mod allocator;
pub mod host;
mod traits;

pub use allocator::Allocator;
pub use traits::{Device, Runtime, RuntimeClient, TensorHandle};
