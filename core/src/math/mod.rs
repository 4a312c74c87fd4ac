pub mod lagrange;
pub mod rotation;
pub mod stats;

pub use lagrange::LagrangeHelper;
pub use rotation::RotationHelper;
pub use stats::RunningMoments;
