use crate::math::stats::RunningMoments;
use crate::obs_interface::{ObsEpoch, SatId};
use crate::prelude::{ConditionResult, EpochProcessor};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Melbourne-Wubbena wide-lane wavelength, in metres.
pub const MW_WAVELENGTH: f64 = 0.862;

const DEFAULT_MAX_WAVELENGTHS: f64 = 10.0;
const DEFAULT_MAX_GAP_SECS: f64 = 61.0;

/// Variance a freshly (re)started track is seeded with (0.25 m sigma).
const VARIANCE_SEED: f64 = 0.25 * 0.25;

/// Tuning knobs for the Melbourne-Wubbena slip detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Deviation limit before real statistics exist, in MW wavelengths.
    pub max_wavelengths: f64,
    /// Largest tolerated gap between successive epochs of one satellite.
    pub max_gap_secs: f64,
    /// Honor the receiver's loss-of-lock indicators.
    pub use_lli: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_wavelengths: DEFAULT_MAX_WAVELENGTHS,
            max_gap_secs: DEFAULT_MAX_GAP_SECS,
            use_lli: true,
        }
    }
}

impl DetectorConfig {
    /// Non-positive limits fall back to the defaults instead of erroring.
    fn sanitized(mut self) -> Self {
        if self.max_wavelengths <= 0.0 {
            self.max_wavelengths = DEFAULT_MAX_WAVELENGTHS;
        }
        if self.max_gap_secs <= 0.0 {
            self.max_gap_secs = DEFAULT_MAX_GAP_SECS;
        }
        self
    }
}

/// Running state for one satellite's MW combination stream.
#[derive(Debug, Clone)]
struct MwTrack {
    former_epoch: f64,
    window_size: u32,
    moments: RunningMoments,
}

impl MwTrack {
    fn new() -> Self {
        Self {
            // Sentinel far in the past so the first sample always trips the
            // gap test and restarts the track.
            former_epoch: f64::NEG_INFINITY,
            window_size: 0,
            moments: RunningMoments::seeded(0.0, VARIANCE_SEED),
        }
    }
}

/// Cycle-slip detector over the Melbourne-Wubbena combination.
///
/// Keeps one O(1) statistical track per satellite and classifies each new
/// sample as continuous or slipped. Input epochs must be time-monotone per
/// satellite.
pub struct MwSlipDetector {
    config: DetectorConfig,
    tracks: HashMap<SatId, MwTrack>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl MwSlipDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config: config.sanitized(),
            tracks: HashMap::new(),
            logger: LogManager::new("cycle-slip"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Number of satellites with live tracks.
    pub fn tracked(&self) -> usize {
        self.tracks.len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Classifies one MW sample. Returns `true` when the track restarted on a
    /// loss-of-lock hint, an epoch gap, or a statistical break.
    ///
    /// The first sample of any satellite restarts its track and therefore
    /// always reports `true`.
    pub fn detect(
        &mut self,
        sat: SatId,
        epoch: f64,
        mw: f64,
        lli1: Option<u8>,
        lli2: Option<u8>,
    ) -> bool {
        let track = self.tracks.entry(sat).or_insert_with(MwTrack::new);

        let delta_t = epoch - track.former_epoch;
        track.former_epoch = epoch;

        let bias = (mw - track.moments.mean()).abs();
        track.window_size += 1;

        let (unlock1, unlock2) = if self.config.use_lli {
            (is_unlock(lli1), is_unlock(lli2))
        } else {
            (false, false)
        };

        let mut slip = false;

        if unlock1 || unlock2 || delta_t > self.config.max_gap_secs {
            track.window_size = 1;
            slip = true;
        }

        // Until the window holds a second sample the deviation limit comes
        // from the configured wavelength count; after that the running
        // variance supplies a 4-sigma limit.
        let limit = if track.window_size > 1 {
            4.0 * track.moments.variance().sqrt()
        } else {
            self.config.max_wavelengths * MW_WAVELENGTH
        };
        if bias > limit {
            track.window_size = 1;
            slip = true;
        }

        if track.window_size < 2 {
            track.moments.reseed(mw, VARIANCE_SEED);
        } else {
            track.moments.update(mw, track.window_size);
        }

        slip
    }
}

impl EpochProcessor for MwSlipDetector {
    /// Runs the detector over every satellite of the epoch.
    ///
    /// Satellites without an MW value are removed from the epoch and their
    /// tracks stay untouched. Detected slips are OR-ed into the per-satellite
    /// flag so several detectors can be chained over the same epoch.
    fn process(&mut self, epoch: &mut ObsEpoch) -> ConditionResult<()> {
        let mut rejected: Vec<SatId> = Vec::new();

        for (sat, obs) in epoch.sats.iter_mut() {
            let mw = match obs.mw {
                Some(value) => value,
                None => {
                    rejected.push(*sat);
                    continue;
                }
            };

            let slip = self.detect(*sat, epoch.epoch, mw, obs.lli1, obs.lli2);
            self.metrics.record_satellite();
            if slip {
                self.metrics.record_slip();
                self.logger
                    .trace(&format!("slip on {} at {:.3}", sat, epoch.epoch));
            }
            obs.slip |= slip;
        }

        for sat in rejected {
            epoch.sats.remove(&sat);
        }

        Ok(())
    }
}

fn is_unlock(lli: Option<u8>) -> bool {
    matches!(lli, Some(1) | Some(3) | Some(5) | Some(7))
}
