pub mod lever_arm;
pub mod query;
pub mod series;

pub use lever_arm::LeverArm;
pub use series::{AttitudeSample, AttitudeSeries, PositionSample, PositionSeries, TimeWindow};
