use num_traits::ToPrimitive;

use crate::{ElementType, StridedView};

impl<T: ElementType + ToPrimitive, const N: usize> StridedView<T, N> {
    /// Checks that every element of `self` is within `atol + rtol * |other|` of
    /// the matching element of `other`. NaNs compare close to NaNs and
    /// infinities to infinities of the same sign.
    pub fn all_close(&self, other: &Self, atol: f64, rtol: f64) -> anyhow::Result<()> {
        if self.shape() != other.shape() {
            anyhow::bail!("Shape mismatch {:?} != {:?}", self.shape(), other.shape())
        }

        let mut stats = CloseStats::new(atol, rtol);
        let (lhs, rhs) = (self.as_slice(), other.as_slice());
        for idx in self.indices() {
            let a = lhs[self.layout().offset_of_unchecked(&idx)];
            let b = rhs[other.layout().offset_of_unchecked(&idx)];
            stats.update(widen(a), widen(b), idx);
        }

        if stats.fail_count > 0 {
            anyhow::bail!(
                "{} samples not close - AVGE={} MAE={} at {:?}",
                stats.fail_count,
                stats.avg_error(),
                stats.max_abs_error,
                stats.max_abs_error_idxs,
            );
        } else {
            log::info!(
                "All close - AVGE={} MAE={} at {:?}",
                stats.avg_error(),
                stats.max_abs_error,
                stats.max_abs_error_idxs
            );
            Ok(())
        }
    }
}

fn widen<T: ToPrimitive>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[derive(derive_new::new)]
struct CloseStats<const N: usize> {
    #[new(default)]
    total_error: f64,
    #[new(default)]
    max_abs_error: f64,
    #[new(default)]
    max_abs_error_idxs: Option<[usize; N]>,
    #[new(default)]
    element_count: usize,
    #[new(default)]
    fail_count: usize,
    atol: f64,
    rtol: f64,
}

impl<const N: usize> CloseStats<N> {
    fn update(&mut self, a: f64, b: f64, index: [usize; N]) {
        let abs_diff = (a - b).abs();
        self.element_count += 1;

        if !self.is_close(a, b, abs_diff) {
            self.fail_count += 1;
        }

        // Matching NaNs or infinities produce a NaN difference; keep it out of the stats.
        if abs_diff.is_nan() {
            return;
        }
        self.total_error += abs_diff;
        if abs_diff > self.max_abs_error {
            self.max_abs_error = abs_diff;
            self.max_abs_error_idxs = Some(index);
        }
    }

    fn avg_error(&self) -> f64 {
        if self.element_count == 0 {
            return 0.0;
        }
        self.total_error / self.element_count as f64
    }

    fn is_close(&self, a: f64, b: f64, abs_diff: f64) -> bool {
        (a.is_nan() && b.is_nan())
            || (a.is_infinite() && b.is_infinite() && a.signum() == b.signum())
            || abs_diff <= self.atol + self.rtol * b.abs()
    }
}

#[cfg(test)]
mod tests {
    use crate::{StridedView, VecF1d, VecF2d};
    use half::bf16;

    #[test]
    fn close_within_tolerance() {
        let a = VecF2d::from_slice(&[1.0, 2.0, 3.0, 4.0], [2, 2]).unwrap();
        let b = VecF2d::from_slice(&[1.0, 2.00001, 3.0, 3.99999], [2, 2]).unwrap();
        a.all_close(&b, 1e-4, 1e-4).unwrap();
        assert!(!a.compare(&b));
    }

    #[test]
    fn not_close_reports() {
        let a = VecF1d::from_slice(&[1.0, 2.0, 3.0], [3]).unwrap();
        let b = VecF1d::from_slice(&[1.0, 2.5, 3.0], [3]).unwrap();
        let err = a.all_close(&b, 1e-3, 1e-3).unwrap_err().to_string();
        assert!(err.starts_with("1 samples not close"), "{}", err);
        assert!(err.ends_with("at Some([1])"), "{}", err);
    }

    #[test]
    fn shape_mismatch() {
        let a = VecF1d::alloc([3]).unwrap();
        let b = VecF1d::alloc([4]).unwrap();
        let err = a.all_close(&b, 1.0, 1.0).unwrap_err().to_string();
        assert_eq!(err, "Shape mismatch [3] != [4]");
    }

    #[test]
    fn nan_and_inf() {
        let a = VecF1d::from_slice(&[f32::NAN, f32::INFINITY, 0.0], [3]).unwrap();
        let b = a.clone();
        a.all_close(&b, 0.0, 0.0).unwrap();
        // Exact comparison keeps IEEE semantics.
        assert!(!a.compare(&b));

        let c = VecF1d::from_slice(&[f32::NAN, f32::NEG_INFINITY, 0.0], [3]).unwrap();
        assert!(a.all_close(&c, 0.0, 0.0).is_err());
    }

    #[test]
    fn empty_views_are_close() {
        let a = VecF2d::alloc([0, 2]).unwrap();
        let b = VecF2d::alloc([0, 2]).unwrap();
        a.all_close(&b, 0.0, 0.0).unwrap();
    }

    #[test]
    fn reduced_precision() {
        let a = StridedView::<bf16, 1>::from_fn([8], |[i]| bf16::from_f32(i as f32 / 3.0)).unwrap();
        let b = StridedView::<bf16, 1>::from_fn([8], |[i]| bf16::from_f32(i as f32 / 3.0 + 1e-3))
            .unwrap();
        a.all_close(&b, 1e-2, 1e-2).unwrap();
    }
}
