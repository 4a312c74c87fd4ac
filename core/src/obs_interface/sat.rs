use crate::prelude::ConditionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Constellation a satellite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GnssSystem {
    Gps,
    Glonass,
    Galileo,
    BeiDou,
}

impl GnssSystem {
    fn letter(self) -> char {
        match self {
            GnssSystem::Gps => 'G',
            GnssSystem::Glonass => 'R',
            GnssSystem::Galileo => 'E',
            GnssSystem::BeiDou => 'C',
        }
    }
}

/// Satellite identity used to key per-satellite conditioning state.
///
/// Only equality and hashing are meaningful to the conditioning stage. The
/// wire form is the RINEX-style designator (`G07`, `E21`), which also keeps
/// satellite-keyed maps serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatId {
    pub system: GnssSystem,
    pub prn: u8,
}

impl SatId {
    pub fn new(system: GnssSystem, prn: u8) -> Self {
        Self { system, prn }
    }
}

impl fmt::Display for SatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.system.letter(), self.prn)
    }
}

impl FromStr for SatId {
    type Err = ConditionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut chars = text.chars();
        let system = match chars.next() {
            Some('G') => GnssSystem::Gps,
            Some('R') => GnssSystem::Glonass,
            Some('E') => GnssSystem::Galileo,
            Some('C') => GnssSystem::BeiDou,
            _ => {
                return Err(ConditionError::CorruptTelemetry(format!(
                    "bad satellite designator '{}'",
                    text
                )))
            }
        };
        let prn = chars.as_str().parse::<u8>().map_err(|_| {
            ConditionError::CorruptTelemetry(format!("bad satellite designator '{}'", text))
        })?;
        Ok(SatId::new(system, prn))
    }
}

impl Serialize for SatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
