use crate::catalog::CatalogEntry;
use crate::errors::{Result, SimError};
use rand::{rngs::StdRng, Rng};

/// Instantaneous synthetic telemetry for one catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Satellite {
    pub(crate) id: u32,
    pub(crate) name: &'static str,
    pub(crate) latitude: f64,    // deg, [-60, 60]
    pub(crate) longitude: f64,   // deg, [-180, 180)
    pub(crate) altitude: f64,    // km
    pub(crate) velocity: f64,    // km/s, [7.5, 8.0)
    pub(crate) orbit_angle: f64, // deg, [0, 360)
}

/// Uniform random samples in [0, 1).
pub(crate) trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

impl UniformSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

const LAT_AMPLITUDE: f64 = 60.0;
const BASE_ALTITUDE_KM: f64 = 400.0;
const ALTITUDE_STEP_KM: f64 = 100.0;
const VELOCITY_MIN: f64 = 7.5;
const VELOCITY_SPAN: f64 = 0.5;
const PHASE_STEP_DEG: f64 = 90.0;

pub(crate) fn wrap_degrees(deg: f64) -> f64 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if w >= 360.0 {
        0.0
    } else {
        w
    }
}

pub(crate) fn altitude_for_index(index: usize) -> f64 {
    BASE_ALTITUDE_KM + index as f64 * ALTITUDE_STEP_KM
}

pub(crate) fn generate<S: UniformSource + ?Sized>(
    entry: &CatalogEntry,
    index: usize,
    now_ms: f64,
    source: &mut S,
) -> Result<Satellite> {
    if !now_ms.is_finite() {
        return Err(SimError::NonFiniteClock(now_ms));
    }
    let u = source.next_unit();
    if !(0.0..1.0).contains(&u) {
        return Err(SimError::SampleOutOfRange(u));
    }

    let i = index as f64;
    Ok(Satellite {
        id: entry.id,
        name: entry.name,
        latitude: (now_ms / 10_000.0 + i).sin() * LAT_AMPLITUDE,
        longitude: wrap_degrees(now_ms / 5_000.0 + i * PHASE_STEP_DEG) - 180.0,
        altitude: altitude_for_index(index),
        velocity: VELOCITY_MIN + u * VELOCITY_SPAN,
        orbit_angle: wrap_degrees(now_ms / 1_000.0 + i * PHASE_STEP_DEG),
    })
}

/// Builds the whole set in catalog order. The first failure aborts the set.
pub(crate) fn generate_all<S: UniformSource + ?Sized>(
    catalog: &[CatalogEntry],
    now_ms: f64,
    source: &mut S,
) -> Result<Vec<Satellite>> {
    catalog
        .iter()
        .enumerate()
        .map(|(idx, entry)| generate(entry, idx, now_ms, source))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::FixedSamples;
    use super::*;
    use crate::catalog::CATALOG;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    #[test]
    fn ranges_hold_over_time() {
        let mut rng = StdRng::seed_from_u64(7);
        for k in 0..5_000u64 {
            let t = 1.7e12 + k as f64 * 7_919.37;
            for (i, entry) in CATALOG.iter().enumerate() {
                let s = generate(entry, i, t, &mut rng).unwrap();
                assert!((-60.0..=60.0).contains(&s.latitude), "lat {}", s.latitude);
                assert!((-180.0..180.0).contains(&s.longitude), "lng {}", s.longitude);
                assert!((0.0..360.0).contains(&s.orbit_angle), "angle {}", s.orbit_angle);
                assert!((7.5..8.0).contains(&s.velocity), "vel {}", s.velocity);
            }
        }
    }

    #[test]
    fn altitude_depends_only_on_index() {
        let mut src = FixedSamples::new(&[0.5]);
        for t in [0.0, 12_345.0, 1.7e12] {
            let set = generate_all(&CATALOG, t, &mut src).unwrap();
            let alts: Vec<f64> = set.iter().map(|s| s.altitude).collect();
            assert_eq!(alts, vec![400.0, 500.0, 600.0, 700.0]);
        }
    }

    #[test]
    fn values_at_epoch() {
        let mut src = FixedSamples::new(&[0.0]);
        let set = generate_all(&CATALOG, 0.0, &mut src).unwrap();
        assert_abs_diff_eq!(set[0].latitude, 0.0);
        assert_abs_diff_eq!(set[0].longitude, -180.0);
        assert_abs_diff_eq!(set[0].orbit_angle, 0.0);
        assert_abs_diff_eq!(set[1].orbit_angle, 90.0);
        assert_abs_diff_eq!(set[1].longitude, -90.0);
        assert_abs_diff_eq!(set[0].velocity, 7.5);
    }

    #[test]
    fn velocity_follows_the_sample() {
        let mut src = FixedSamples::new(&[0.25, 0.999]);
        let a = generate(&CATALOG[0], 0, 1_000.0, &mut src).unwrap();
        let b = generate(&CATALOG[0], 0, 1_000.0, &mut src).unwrap();
        assert_abs_diff_eq!(a.velocity, 7.625);
        assert!(b.velocity < 8.0);
        assert_eq!(a.orbit_angle, b.orbit_angle);
    }

    #[test]
    fn set_keeps_catalog_order_and_identity() {
        let mut src = FixedSamples::new(&[0.1]);
        let set = generate_all(&CATALOG, 42_000.0, &mut src).unwrap();
        assert_eq!(set.len(), CATALOG.len());
        for (s, e) in set.iter().zip(CATALOG.iter()) {
            assert_eq!(s.id, e.id);
            assert_eq!(s.name, e.name);
        }
    }

    #[test]
    fn bad_inputs_fail_the_whole_set() {
        let mut src = FixedSamples::new(&[0.2, f64::NAN]);
        let err = generate_all(&CATALOG, 1_000.0, &mut src).unwrap_err();
        assert!(matches!(err, SimError::SampleOutOfRange(v) if v.is_nan()));

        let mut src = FixedSamples::new(&[1.0]);
        assert_eq!(
            generate(&CATALOG[0], 0, 0.0, &mut src),
            Err(SimError::SampleOutOfRange(1.0))
        );

        let mut src = FixedSamples::new(&[0.5]);
        assert!(matches!(
            generate(&CATALOG[0], 0, f64::INFINITY, &mut src),
            Err(SimError::NonFiniteClock(_))
        ));
    }

    #[test]
    fn wrap_degrees_stays_in_range() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-1e-18), 0.0);
        assert_abs_diff_eq!(wrap_degrees(-90.0), 270.0);
        assert_abs_diff_eq!(wrap_degrees(725.0), 5.0);
    }
}
