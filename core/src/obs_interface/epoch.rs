use crate::obs_interface::SatId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-satellite record for one observation epoch.
///
/// The observation pipeline fills `mw` with the Melbourne-Wubbena combination
/// in metres when both frequencies were usable, and forwards the raw RINEX
/// loss-of-lock indicators when present. Conditioning passes fold their
/// verdicts into `slip`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SatObs {
    pub mw: Option<f64>,
    pub lli1: Option<u8>,
    pub lli2: Option<u8>,
    #[serde(default)]
    pub slip: bool,
}

impl SatObs {
    pub fn with_mw(mw: f64) -> Self {
        Self {
            mw: Some(mw),
            ..Self::default()
        }
    }
}

/// One epoch of observations keyed by satellite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsEpoch {
    /// Epoch timestamp in the caller's continuous-seconds time scale.
    pub epoch: f64,
    pub sats: HashMap<SatId, SatObs>,
}

impl ObsEpoch {
    pub fn new(epoch: f64) -> Self {
        Self {
            epoch,
            sats: HashMap::new(),
        }
    }

    pub fn insert(&mut self, sat: SatId, obs: SatObs) {
        self.sats.insert(sat, obs);
    }
}
