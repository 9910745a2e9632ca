//! Integration tests for cast orchestration on the host runtime

mod common;

use common::create_host_client;
use dcast::cast::{CastOps, resolve};
use dcast::dtype::{DType, DTypeSet};
use dcast::error::Error;
use dcast::runtime::RuntimeClient;
use dcast::runtime::host::HostRuntime;
use dcast::tensor::{MemoryFormat, Tensor};
use half::f16;

#[test]
fn test_same_dtype_cast_is_noop() {
    let (client, _device) = create_host_client();
    for dtype in DType::ALL {
        let bytes = vec![0u8; 3 * dtype.size_in_bytes()];
        let mut t = client.upload_bytes(&bytes, &[3], dtype).unwrap();
        let ptr = t.data_ptr();
        let allocations = client.allocation_count();

        client.cast_to(&mut t, dtype).unwrap();

        assert_eq!(t.data_ptr(), ptr, "{dtype}");
        assert_eq!(t.dtype(), dtype);
        assert_eq!(client.allocation_count(), allocations);
    }
    assert!(client.queue().is_empty());
}

#[test]
fn test_direct_cast_rebinds_to_new_tensor() {
    let (client, _device) = create_host_client();
    let mut t = client.upload(&[1i32, -2, 3, 400], &[2, 2]).unwrap();
    let original = t.clone();

    client.cast_to(&mut t, DType::F32).unwrap();

    assert_eq!(t.dtype(), DType::F32);
    assert_eq!(t.shape(), &[2, 2]);
    assert!(!t.shares_storage(&original));
    assert_eq!(client.download::<f32>(&t).unwrap(), vec![1.0, -2.0, 3.0, 400.0]);
    // The old view still reads its own data
    assert_eq!(client.download::<i32>(&original).unwrap(), vec![1, -2, 3, 400]);
    assert_eq!(client.queue().len(), 1);
}

#[test]
fn test_bool_to_i64_goes_through_i32() {
    let (client, _device) = create_host_client();
    let mut t = client.upload_bytes(&[1, 0, 1], &[3], DType::Bool).unwrap();
    let allocations = client.allocation_count();

    client.cast_to(&mut t, DType::I64).unwrap();

    assert_eq!(t.dtype(), DType::I64);
    assert_eq!(client.download::<i64>(&t).unwrap(), vec![1, 0, 1]);
    // Destination plus one scratch intermediate
    assert_eq!(client.allocation_count(), allocations + 2);

    let launched = client.queue().launched();
    assert_eq!(launched, resolve(DType::Bool, DType::I64).unwrap().ops());
    assert_eq!(launched[0].dst(), DType::I32);
    assert_eq!(launched[1].src(), DType::I32);
}

#[test]
fn test_i64_to_i8_wraps_through_i32() {
    let (client, _device) = create_host_client();
    let mut t = client.upload(&[300i64, -1, 5], &[3]).unwrap();

    client.cast_to(&mut t, DType::I8).unwrap();

    assert_eq!(client.download::<i8>(&t).unwrap(), vec![44, -1, 5]);
    assert_eq!(client.queue().len(), 2);
}

#[test]
fn test_integer_to_bool_via_special_pair() {
    let (client, _device) = create_host_client();
    let mut t = client.upload(&[0i16, 7, -3, 0], &[4]).unwrap();

    client.cast_to(&mut t, DType::Bool).unwrap();

    assert_eq!(t.dtype(), DType::Bool);
    assert_eq!(client.download_bytes(&t).unwrap(), vec![0, 1, 1, 0]);
}

#[test]
fn test_unsupported_pair_leaves_tensor_untouched() {
    let (client, _device) = create_host_client();
    let mut t = client.upload(&[1u16, 2], &[2]).unwrap();
    let ptr = t.data_ptr();
    let allocations = client.allocation_count();

    let err = client.cast_to(&mut t, DType::F32).unwrap_err();

    assert_eq!(
        err,
        Error::UnsupportedCast {
            src: DType::U16,
            dst: DType::F32
        }
    );
    assert_eq!(err.to_string(), "Can not cast from u16 to f32");
    assert_eq!(t.dtype(), DType::U16);
    assert_eq!(t.data_ptr(), ptr);
    assert_eq!(client.allocation_count(), allocations);
    assert!(client.queue().is_empty());
}

#[test]
fn test_cast_to_new_keeps_source() {
    let (client, _device) = create_host_client();
    let t = client.upload(&[1.5f32, -0.5], &[2]).unwrap();

    let half = client.cast_to_new(&t, DType::F16).unwrap();

    assert_eq!(t.dtype(), DType::F32);
    assert_eq!(half.dtype(), DType::F16);
    assert_eq!(
        client.download::<f16>(&half).unwrap(),
        vec![f16::from_f32(1.5), f16::from_f32(-0.5)]
    );
}

#[test]
fn test_cast_into_writes_existing_allocation() {
    let (client, _device) = create_host_client();
    let src = client.upload(&[2.75f32, -1.25, 9.0], &[3]).unwrap();
    let mut dst = client.upload(&[0i32; 3], &[3]).unwrap();
    let ptr = dst.data_ptr();
    let allocations = client.allocation_count();

    client.cast_into(&mut dst, &src).unwrap();

    assert_eq!(dst.data_ptr(), ptr);
    assert_eq!(client.allocation_count(), allocations);
    assert_eq!(client.download::<i32>(&dst).unwrap(), vec![2, -1, 9]);
}

#[test]
fn test_cast_into_shape_mismatch() {
    let (client, _device) = create_host_client();
    let src = client.upload(&[1i32, 2, 3, 4], &[4]).unwrap();
    let mut dst = client.upload(&[0.0f32; 4], &[2, 2]).unwrap();

    let err = client.cast_into(&mut dst, &src).unwrap_err();

    assert_eq!(
        err,
        Error::ShapeMismatch {
            expected: vec![2, 2],
            got: vec![4]
        }
    );
    assert!(client.queue().is_empty());
}

#[test]
fn test_cast_into_same_dtype_skips_shape_check() {
    let (client, _device) = create_host_client();
    let src = client.upload(&[1i32, 2, 3, 4], &[4]).unwrap();
    let mut dst = client.upload(&[0i32; 4], &[2, 2]).unwrap();

    client.cast_into(&mut dst, &src).unwrap();

    assert_eq!(client.download::<i32>(&dst).unwrap(), vec![0; 4]);
}

#[test]
fn test_cast_into_unsupported_pair() {
    let (client, _device) = create_host_client();
    let src = client.upload(&[1.0f64], &[1]).unwrap();
    let mut dst = client.upload(&[0i64], &[1]).unwrap();

    let err = client.cast_into(&mut dst, &src).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedCast {
            src: DType::F64,
            dst: DType::I64
        }
    ));
}

#[test]
fn test_promote_compute_and_write_back() {
    // Optimizer-style flow: bring mixed operands to a kernel dtype, then
    // write the results back into the caller's tensors.
    let (client, _device) = create_host_client();
    let mut param = client.upload(&[1.5f64, -2.25], &[2]).unwrap();
    let mut grad = client
        .upload(&[f16::from_f32(0.5), f16::from_f32(-4.0)], &[2])
        .unwrap();

    let mut param_work = param.clone();
    let mut grad_work = grad.clone();
    let target = client
        .promote_all(
            &mut [&mut param_work, &mut grad_work],
            DTypeSet::of(&[DType::F16, DType::F32]),
        )
        .unwrap();

    assert_eq!(target, DType::F32);
    assert_eq!(param_work.dtype(), DType::F32);
    assert_eq!(grad_work.dtype(), DType::F32);
    assert_eq!(client.download::<f32>(&grad_work).unwrap(), vec![0.5, -4.0]);

    client.cast_into(&mut param, &param_work).unwrap();
    client.cast_into(&mut grad, &grad_work).unwrap();

    assert_eq!(param.dtype(), DType::F64);
    assert_eq!(client.download::<f64>(&param).unwrap(), vec![1.5, -2.25]);
    assert_eq!(
        client.download::<f16>(&grad).unwrap(),
        vec![f16::from_f32(0.5), f16::from_f32(-4.0)]
    );
    assert_eq!(client.queue().len(), 4);
}

#[test]
fn test_cast_into_channels_last_destination() {
    let (client, _device) = create_host_client();
    let src = client.upload(&[0.0f32, 1.0, 2.0, 3.0], &[1, 2, 1, 2]).unwrap();
    let mut dst = Tensor::<HostRuntime>::from_handle(
        client
            .request_strided_tensor(&[1, 2, 1, 2], &[4, 1, 4, 2], DType::I32)
            .unwrap(),
    );

    client.cast_into(&mut dst, &src).unwrap();

    // Logical element [0, c, 0, w] lives at storage offset c + 2 * w
    assert_eq!(client.download::<i32>(&dst).unwrap(), vec![0, 2, 1, 3]);

    let back = client.cast_to_new(&dst, DType::F32).unwrap();
    assert!(back.layout().is_contiguous());
    assert_eq!(client.download::<f32>(&back).unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_cast_to_from_channels_last_source() {
    let (client, _device) = create_host_client();
    let logical: Vec<f32> = (0..12).map(|v| v as f32).collect();
    let src = client.upload(&logical, &[1, 3, 2, 2]).unwrap();
    let mut nhwc = src
        .with_memory_format(&client, MemoryFormat::ChannelsLast)
        .unwrap();
    assert_eq!(nhwc.strides(), &[12, 1, 6, 3]);
    client.cast_into(&mut nhwc, &src).unwrap();

    // Storage is channel-interleaved
    assert_eq!(
        client.download::<f32>(&nhwc).unwrap(),
        vec![0.0, 4.0, 8.0, 1.0, 5.0, 9.0, 2.0, 6.0, 10.0, 3.0, 7.0, 11.0]
    );

    let mut t = nhwc.clone();
    client.cast_to(&mut t, DType::I32).unwrap();

    assert!(t.layout().is_contiguous());
    assert_eq!(
        client.download::<i32>(&t).unwrap(),
        (0..12).collect::<Vec<i32>>()
    );
}

#[test]
fn test_two_hop_cast_from_channels_last_source() {
    let (client, _device) = create_host_client();
    let src = client.upload(&[0.0f32, 1.0, 2.0, 3.0], &[1, 2, 1, 2]).unwrap();
    let mut wide = Tensor::<HostRuntime>::from_handle(
        client
            .request_strided_tensor(&[1, 2, 1, 2], &[4, 1, 4, 2], DType::I64)
            .unwrap(),
    );
    client.cast_into(&mut wide, &src).unwrap();
    assert_eq!(client.download::<i64>(&wide).unwrap(), vec![0, 2, 1, 3]);

    client.cast_to(&mut wide, DType::I8).unwrap();

    assert_eq!(wide.dtype(), DType::I8);
    assert_eq!(client.download::<i8>(&wide).unwrap(), vec![0, 1, 2, 3]);
    // One cast into the strided tensor, then two hops out of it
    assert_eq!(client.queue().len(), 3);
}
