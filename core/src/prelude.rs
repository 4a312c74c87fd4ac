use crate::obs_interface::ObsEpoch;

/// Common error type for the conditioning stage.
#[derive(thiserror::Error, Debug)]
pub enum ConditionError {
    #[error("telemetry i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupted telemetry: {0}")]
    CorruptTelemetry(String),
    #[error("query time {query:.6} outside interpolation window [{lower:.6}, {upper:.6}]")]
    OutOfWindow { query: f64, lower: f64, upper: f64 },
    #[error("series holds {len} samples, interpolation needs at least {needed}")]
    SeriesTooShort { len: usize, needed: usize },
}

pub type ConditionResult<T> = Result<T, ConditionError>;

/// Trait for conditioning passes applied to one observation epoch at a time.
///
/// Passes mutate the epoch map in place so several of them can be chained
/// over the same epoch, each folding its verdicts into the per-satellite
/// records.
pub trait EpochProcessor {
    fn process(&mut self, epoch: &mut ObsEpoch) -> ConditionResult<()>;
}
