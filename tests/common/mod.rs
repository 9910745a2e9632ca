//! Common test utilities
#![allow(dead_code)]

use dcast::runtime::Runtime;
use dcast::runtime::host::{HostClient, HostDevice, HostRuntime};

/// Create a host client and device for testing
pub fn create_host_client() -> (HostClient, HostDevice) {
    let device = HostRuntime::default_device();
    let client = HostRuntime::default_client(&device);
    (client, device)
}

/// Create a host client whose pool holds at most `limit_bytes`
pub fn create_limited_client(limit_bytes: usize) -> HostClient {
    HostClient::with_pool_limit(HostRuntime::default_device(), limit_bytes)
}

/// Assert two f32 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
