//! One-dimensional cubic Hermite blending shared by the grid and the coupling tables.

/// Blends a low `(vl, vdl)` and a high `(vh, vdh)` value/derivative pair at
/// fractional position `t` in `[0, 1]`.
///
/// Derivatives must already be expressed per unit of `t`, i.e. multiplied by
/// the width of the interval being blended.
#[inline]
pub fn interpolate_cubic(t: f64, vl: f64, vdl: f64, vh: f64, vdh: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let p0 = (2.0 * t3 - 3.0 * t2 + 1.0) * vl;
    let m0 = (t3 - 2.0 * t2 + t) * vdl;
    let p1 = (-2.0 * t3 + 3.0 * t2) * vh;
    let m1 = (t3 - t2) * vdh;

    p0 + m0 + p1 + m1
}

/// Slope of `ys` over `xs` around node `i`: forward at the first node,
/// backward at the last, mean of both neighbouring slopes otherwise.
///
/// # Panics
/// Panics if the slices have fewer than two entries or differ in length.
#[inline]
pub fn node_slope(xs: &[f64], ys: &[f64], i: usize) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let last = xs.len() - 1;
    if i == 0 {
        (ys[1] - ys[0]) / (xs[1] - xs[0])
    } else if i == last {
        (ys[last] - ys[last - 1]) / (xs[last] - xs[last - 1])
    } else {
        let left = (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        let right = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);
        0.5 * (left + right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn endpoints_are_reproduced(
            vl in -1e3f64..1e3,
            vdl in -1e3f64..1e3,
            vh in -1e3f64..1e3,
            vdh in -1e3f64..1e3,
        ) {
            prop_assert_eq!(interpolate_cubic(0.0, vl, vdl, vh, vdh), vl);
            prop_assert_eq!(interpolate_cubic(1.0, vl, vdl, vh, vdh), vh);
        }
    }

    #[test]
    fn cubic_polynomials_are_exact_with_true_derivatives() {
        // f(t) = t^3 - t + 2 on [0, 1]
        let f = |t: f64| t * t * t - t + 2.0;
        let df = |t: f64| 3.0 * t * t - 1.0;
        for step in 0..=10 {
            let t = step as f64 / 10.0;
            let value = interpolate_cubic(t, f(0.0), df(0.0), f(1.0), df(1.0));
            assert!((value - f(t)).abs() < 1e-12);
        }
    }

    #[test]
    fn slopes_are_one_sided_at_the_ends() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0, 4.0];
        assert_eq!(node_slope(&xs, &ys, 0), 2.0);
        assert_eq!(node_slope(&xs, &ys, 2), 1.0);
        assert_eq!(node_slope(&xs, &ys, 1), 1.5);
    }
}
