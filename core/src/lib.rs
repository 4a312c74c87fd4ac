//! Observation-conditioning core for the Rust-based LEO precise-orbit
//! platform.
//!
//! The crate sits between the raw dual-frequency observation stream and the
//! positioning solver: it flags carrier cycle slips per satellite from the
//! Melbourne-Wubbena combination and reconstructs platform attitude and
//! position at arbitrary epochs from sparse telemetry, including the rotated
//! antenna lever arm.

pub mod conditioning;
pub mod kinematics;
pub mod math;
pub mod obs_interface;
pub mod prelude;
pub mod telemetry;

pub use prelude::{ConditionError, ConditionResult, EpochProcessor};
