/// Radius of a zero-amount ("not available") bubble.
pub const MIN_RADIUS: f64 = 5.0;
/// Radius of the smallest non-zero amount.
pub const SMALL_RADIUS: f64 = 10.0;

/// Piecewise-linear amount→radius scale through three control points:
/// `0 → MIN_RADIUS`, `min non-zero → SMALL_RADIUS`, `max → diameter / 10`.
///
/// Values beyond the last control point extrapolate along the last segment.
/// Negative amounts are outside the contract.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    min_non_zero: Option<f64>,
    max: f64,
    max_radius: f64,
}

impl RadiusScale {
    pub fn new(min_non_zero: Option<f64>, max: f64, diameter: f64) -> Self {
        Self {
            min_non_zero,
            max,
            max_radius: diameter / 10.0,
        }
    }

    pub fn radius(&self, weight: f64) -> f64 {
        let Some(min) = self.min_non_zero else {
            return MIN_RADIUS;
        };

        if weight < min {
            interpolate(weight, 0.0, min, MIN_RADIUS, SMALL_RADIUS)
        } else {
            interpolate(weight, min, self.max, SMALL_RADIUS, self.max_radius)
        }
    }
}

fn interpolate(x: f64, d0: f64, d1: f64, r0: f64, r1: f64) -> f64 {
    let span = d1 - d0;
    if span == 0.0 {
        return r0;
    }
    r0 + (x - d0) / span * (r1 - r0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn control_points_map_exactly() {
        let scale = RadiusScale::new(Some(100.0), 500.0, 600.0);
        assert_eq!(scale.radius(0.0), MIN_RADIUS);
        assert_eq!(scale.radius(100.0), SMALL_RADIUS);
        assert_eq!(scale.radius(500.0), 60.0);
        assert_eq!(scale.radius(300.0), 35.0);
        assert_eq!(scale.radius(50.0), 7.5);
    }

    #[test]
    fn single_non_zero_value_gets_small_radius() {
        let scale = RadiusScale::new(Some(42.0), 42.0, 800.0);
        assert_eq!(scale.radius(42.0), SMALL_RADIUS);
        assert_eq!(scale.radius(0.0), MIN_RADIUS);
    }

    #[test]
    fn all_zero_dataset_uses_floor_radius() {
        let scale = RadiusScale::new(None, 0.0, 800.0);
        assert_eq!(scale.radius(0.0), MIN_RADIUS);
    }

    proptest! {
        #[test]
        fn non_zero_weights_scale_monotonically(
            min in 1.0f64..1_000.0,
            extra in 0.0f64..1_000_000.0,
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
            diameter in 200.0f64..2_000.0,
        ) {
            let max = min + extra;
            let scale = RadiusScale::new(Some(min), max, diameter);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let w1 = min + low * extra;
            let w2 = min + high * extra;
            prop_assert!(scale.radius(w1) <= scale.radius(w2) + 1e-9);
            prop_assert!(scale.radius(0.0) < scale.radius(min));
        }
    }
}
