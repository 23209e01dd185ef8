use memref::prelude::*;
use memref::{DType, ElementFormat};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn rank1_populate_dump_compare() -> anyhow::Result<()> {
    init();
    let mut view = VecF1d::alloc([4])?;
    for (i, v) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
        view.set([i], v)?;
    }
    assert_eq!(
        view.dump().to_string(),
        "1.000000 2.000000 3.000000 4.000000\n"
    );

    let expected = VecF1d::from_slice(&[1.0, 2.0, 3.0, 4.0], [4])?;
    assert!(view.compare(&expected));

    let shorter = VecF1d::alloc([3])?;
    assert!(!view.compare(&shorter));

    view.destroy();
    expected.destroy();
    Ok(())
}

#[test]
fn rank2_zeros_dump() -> anyhow::Result<()> {
    init();
    let view = VecF2d::alloc(shape![2, 3])?;
    let dump = view.dump().to_string();
    let lines = dump.lines().collect::<Vec<_>>();
    assert_eq!(lines, vec!["0.000000 0.000000 0.000000"; 2]);
    Ok(())
}

#[test]
fn zero_sized_dimensions() -> anyhow::Result<()> {
    init();
    let v1 = VecF1d::alloc([0])?;
    assert_eq!(v1.dump().to_string(), "\n");
    assert!(matches!(
        v1.get([0]),
        Err(ViewError::IndexOutOfRange { dim: 0, index: 0, size: 0 })
    ));

    let v2 = VecF2d::alloc([0, 5])?;
    assert_eq!(v2.dump().rows().count(), 0);
    assert!(v2.compare(&VecF2d::alloc([0, 5])?));
    assert!(!v2.compare(&VecF2d::alloc([5, 0])?));
    Ok(())
}

#[test]
fn kernel_output_against_reference() -> anyhow::Result<()> {
    init();
    // Reference computed through the checked API.
    let (m, n) = (4, 5);
    let reference = VecF2d::from_fn([m, n], |[i, j]| (i * n + j) as f32 * 0.5)?;

    // Output written by a producer through the raw base pointer and strides.
    let mut out = VecF2d::alloc([m, n])?;
    let (offset, strides) = (out.offset(), *out.strides());
    let base = out.as_mut_ptr();
    for i in 0..m {
        for j in 0..n {
            let addr = offset + i * strides[0] + j * strides[1];
            unsafe { *base.add(addr) = (i * n + j) as f32 * 0.5 };
        }
    }

    assert_eq!(out, reference);
    out.all_close(&reference, 1e-6, 1e-6)?;

    out.set([3, 4], 0.0)?;
    assert_ne!(out, reference);
    assert!(out.all_close(&reference, 1e-6, 1e-6).is_err());
    Ok(())
}

memref::memref_type!(VecI2d, i32, 2);

#[test]
fn declared_view_type() -> anyhow::Result<()> {
    init();
    let mut view = VecI2d::alloc([2, 2])?;
    view[[1, 1]] = 42;
    assert_eq!(view.dt(), DType::I32);
    assert_eq!(view.dump().to_string(), "0 0\n0 42\n");
    assert_eq!(
        view.dump()
            .with_format(ElementFormat::Fixed { precision: 1 })
            .to_string(),
        "0.0 0.0\n0.0 42.0\n"
    );
    Ok(())
}
