use crate::kinematics::series::{AttitudeSample, AttitudeSeries, PositionSample, PositionSeries};
use crate::math::lagrange::LagrangeHelper;
use crate::prelude::{ConditionError, ConditionResult};
use std::ops::Range;

/// Interpolation order: nodes per query. Odd, so the query sits between the
/// two middle nodes.
pub const INTERP_ORDER: usize = 9;

const HALF_WINDOW: usize = INTERP_ORDER / 2;

/// Locates the `INTERP_ORDER` nodes centered on `t`.
///
/// Index arithmetic assumes near-uniform spacing: the step is estimated from
/// the first two samples and the center index derived by division. Queries
/// inside the first or last `INTERP_ORDER` samples are refused, as is any
/// center index whose node window would leave the series.
fn node_window<F>(len: usize, time_at: F, t: f64) -> ConditionResult<Range<usize>>
where
    F: Fn(usize) -> f64,
{
    let needed = 2 * INTERP_ORDER + 1;
    if len < needed {
        return Err(ConditionError::SeriesTooShort { len, needed });
    }

    let lower = time_at(INTERP_ORDER);
    let upper = time_at(len - INTERP_ORDER);
    if t < lower || t > upper {
        return Err(ConditionError::OutOfWindow {
            query: t,
            lower,
            upper,
        });
    }

    let step = (time_at(1) - time_at(0)).round();
    let center = ((t - time_at(0)) / step).floor();
    if !center.is_finite() {
        return Err(ConditionError::CorruptTelemetry(format!(
            "sample spacing {:.6} too fine to index",
            time_at(1) - time_at(0)
        )));
    }

    let start = center as isize - HALF_WINDOW as isize;
    let end = center as isize + HALF_WINDOW as isize + 1;
    if start < 0 || end as usize > len {
        return Err(ConditionError::OutOfWindow {
            query: t,
            lower,
            upper,
        });
    }
    Ok(start as usize..end as usize)
}

impl AttitudeSeries {
    /// Interpolated unit attitude at `t`.
    ///
    /// The nine nodes are sign-corrected against each other before fitting:
    /// a node whose vector part opposes its predecessor's is negated whole,
    /// so the double-cover ambiguity never leaks into the polynomial. The
    /// fitted 4-vector is renormalized before it is returned.
    pub fn attitude_at(&self, t: f64) -> ConditionResult<AttitudeSample> {
        self.metrics.record_query();
        let window = match node_window(self.samples.len(), |i| self.samples[i].t, t) {
            Ok(window) => window,
            Err(err) => {
                self.metrics.record_refusal();
                return Err(err);
            }
        };

        let mut times = [0.0; INTERP_ORDER];
        let mut comps = [[0.0; INTERP_ORDER]; 4];
        for (k, idx) in window.enumerate() {
            let sample = &self.samples[idx];
            times[k] = sample.t;
            let mut q = sample.q;
            if k > 0 {
                let dot = q[0] * comps[0][k - 1] + q[1] * comps[1][k - 1] + q[2] * comps[2][k - 1];
                if dot < 0.0 {
                    for component in q.iter_mut() {
                        *component = -*component;
                    }
                }
            }
            for (c, column) in comps.iter_mut().enumerate() {
                column[k] = q[c];
            }
        }

        let mut q = [0.0; 4];
        for (c, column) in comps.iter().enumerate() {
            q[c] = LagrangeHelper::eval(&times, column, t);
        }

        let norm = q.iter().map(|v| v * v).sum::<f64>().sqrt();
        for component in q.iter_mut() {
            *component /= norm;
        }

        Ok(AttitudeSample { t, q })
    }
}

impl PositionSeries {
    /// Interpolated position (and velocity, when the series carries it) at
    /// `t`. No sign handling: position components are plain scalars.
    pub fn position_at(&self, t: f64) -> ConditionResult<PositionSample> {
        self.metrics.record_query();
        let window = match node_window(self.samples.len(), |i| self.samples[i].t, t) {
            Ok(window) => window,
            Err(err) => {
                self.metrics.record_refusal();
                return Err(err);
            }
        };

        let nodes = &self.samples[window];
        let times: Vec<f64> = nodes.iter().map(|s| s.t).collect();

        let mut pos = [0.0; 3];
        for (c, slot) in pos.iter_mut().enumerate() {
            let values: Vec<f64> = nodes.iter().map(|s| s.pos[c]).collect();
            *slot = LagrangeHelper::eval(&times, &values, t);
        }

        let vel = if self.has_velocity {
            let mut fitted = [0.0; 3];
            for (c, slot) in fitted.iter_mut().enumerate() {
                let values: Vec<f64> = nodes
                    .iter()
                    .map(|s| s.vel.map(|v| v[c]).unwrap_or_default())
                    .collect();
                *slot = LagrangeHelper::eval(&times, &values, t);
            }
            Some(fitted)
        } else {
            None
        };

        Ok(PositionSample { t, pos, vel })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::series::TimeWindow;
    use crate::prelude::ConditionError;

    fn slow_roll(t: f64) -> [f64; 4] {
        // Gentle rotation about the z axis, well below the sampling rate.
        let half = 0.01 * t;
        [0.0, 0.0, half.sin(), half.cos()]
    }

    fn attitude_series(n: usize) -> AttitudeSeries {
        let samples = (0..n)
            .map(|i| AttitudeSample {
                t: i as f64,
                q: slow_roll(i as f64),
            })
            .collect();
        AttitudeSeries::from_samples(samples, &TimeWindow::new(0.0, n as f64))
    }

    #[test]
    fn attitude_at_node_returns_stored_quaternion() {
        let series = attitude_series(25);
        let fix = series.attitude_at(12.0).unwrap();
        let stored = slow_roll(12.0);
        for c in 0..4 {
            assert!((fix.q[c] - stored[c]).abs() < 1e-9);
        }
    }

    #[test]
    fn attitude_between_nodes_stays_unit_and_smooth() {
        let series = attitude_series(25);
        let fix = series.attitude_at(12.4).unwrap();
        let norm: f64 = fix.q.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);

        let expected = slow_roll(12.4);
        for c in 0..4 {
            assert!((fix.q[c] - expected[c]).abs() < 1e-6);
        }
    }

    #[test]
    fn sign_flipped_node_is_corrected_away() {
        let clean = attitude_series(25);
        let mut flipped_samples: Vec<AttitudeSample> = (0..25)
            .map(|i| AttitudeSample {
                t: i as f64,
                q: slow_roll(i as f64),
            })
            .collect();
        for component in flipped_samples[12].q.iter_mut() {
            *component = -*component;
        }
        let flipped =
            AttitudeSeries::from_samples(flipped_samples, &TimeWindow::new(0.0, 25.0));

        let a = clean.attitude_at(12.3).unwrap();
        let b = flipped.attitude_at(12.3).unwrap();
        for c in 0..4 {
            assert!((a.q[c] - b.q[c]).abs() < 1e-12);
        }
    }

    #[test]
    fn queries_outside_node_margin_are_refused() {
        let series = attitude_series(25);
        // Valid span is [t(9), t(16)] for 25 one-second samples.
        for t in [0.0, 8.9, 16.1, 30.0] {
            let err = series.attitude_at(t).unwrap_err();
            assert!(matches!(err, ConditionError::OutOfWindow { .. }));
        }
        assert!(series.attitude_at(9.0).is_ok());
        assert!(series.attitude_at(16.0).is_ok());
        assert_eq!(series.metrics().refusals, 4);
    }

    #[test]
    fn short_series_is_refused_with_its_own_error() {
        let series = attitude_series(18);
        let err = series.attitude_at(9.0).unwrap_err();
        assert!(matches!(
            err,
            ConditionError::SeriesTooShort { len: 18, needed: 19 }
        ));
    }

    #[test]
    fn position_interpolation_is_exact_for_cubic_motion() {
        let poly = |t: f64, a: f64| a * t * t * t - 2.0 * t * t + 3.0 * t + 100.0;
        let samples: Vec<PositionSample> = (0..25)
            .map(|i| {
                let t = i as f64;
                PositionSample {
                    t,
                    pos: [poly(t, 0.1), poly(t, -0.2), poly(t, 0.05)],
                    vel: None,
                }
            })
            .collect();
        let series = PositionSeries::from_samples(samples, &TimeWindow::new(0.0, 25.0));

        let fix = series.position_at(12.4).unwrap();
        let expected = [poly(12.4, 0.1), poly(12.4, -0.2), poly(12.4, 0.05)];
        for c in 0..3 {
            assert!((fix.pos[c] - expected[c]).abs() < 1e-6);
        }
        assert!(fix.vel.is_none());
    }

    #[test]
    fn velocity_columns_are_interpolated_when_present() {
        let samples: Vec<PositionSample> = (0..25)
            .map(|i| {
                let t = i as f64;
                PositionSample {
                    t,
                    pos: [7000.0 + 7.5 * t, 0.0, 0.0],
                    vel: Some([7.5, 0.0, -0.01 * t]),
                }
            })
            .collect();
        let series = PositionSeries::from_samples(samples, &TimeWindow::new(0.0, 25.0));

        let fix = series.position_at(10.5).unwrap();
        let vel = fix.vel.unwrap();
        assert!((fix.pos[0] - (7000.0 + 7.5 * 10.5)).abs() < 1e-6);
        assert!((vel[0] - 7.5).abs() < 1e-9);
        assert!((vel[2] + 0.105).abs() < 1e-9);
    }
}
