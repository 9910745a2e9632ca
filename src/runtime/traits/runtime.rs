//! Core trait for accelerator runtimes

/// Core trait for accelerator runtimes
///
/// `Runtime` names the types a concrete accelerator binding provides. The
/// cast engine is generic over it and never touches a concrete backend.
///
/// # Associated Types
///
/// - `Device`: Identifies a specific accelerator
/// - `Client`: The per-invocation context (queue, scoped pool, kernel library)
/// - `Allocator`: Scoped pool that owns device memory lifetime
/// - `Handle`: Opaque tensor handle the context hands out
/// - `Queue`: The single queue casts are enqueued on
///
/// # Example
///
/// ```ignore
/// let device = HostRuntime::default_device();
/// let client = HostRuntime::default_client(&device);
/// let handle = client.request_tensor(&[2, 3], DType::F32)?;
/// ```
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: super::Device;

    /// Context for requesting tensors and launching casts
    type Client: super::RuntimeClient<Self>;

    /// Scoped memory pool type
    type Allocator: crate::runtime::Allocator;

    /// Opaque tensor handle
    type Handle: super::TensorHandle<Self>;

    /// Queue handle returned by the client
    type Queue: Send + Sync;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}
