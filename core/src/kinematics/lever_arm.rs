use crate::kinematics::series::AttitudeSeries;
use crate::math::rotation::RotationHelper;
use crate::prelude::ConditionResult;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Fixed body-frame displacement between the platform reference point and a
/// sensor, rotated into an external frame through one or two attitudes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LeverArm {
    body_offset: [f64; 3],
}

impl LeverArm {
    pub fn new(body_offset: [f64; 3]) -> Self {
        Self { body_offset }
    }

    pub fn body_offset(&self) -> [f64; 3] {
        self.body_offset
    }

    /// Rotates the offset through two chained attitudes: `R = R_b * R_a`.
    pub fn resolve(&self, attitude_a: &[f64; 4], attitude_b: &[f64; 4]) -> [f64; 3] {
        let rot_a = RotationHelper::quat_to_matrix(attitude_a);
        let rot_b = RotationHelper::quat_to_matrix(attitude_b);
        let combined = rot_b.dot(&rot_a);
        RotationHelper::rotate(combined.view(), &self.body_offset)
    }

    /// Rotates the offset through one attitude chained with a caller-supplied
    /// frame transform: `R = c2t * R_a`.
    pub fn resolve_with_transform(
        &self,
        attitude_a: &[f64; 4],
        c2t: ArrayView2<f64>,
    ) -> [f64; 3] {
        let rot_a = RotationHelper::quat_to_matrix(attitude_a);
        let combined = c2t.dot(&rot_a);
        RotationHelper::rotate(combined.view(), &self.body_offset)
    }

    /// Interpolates both attitude series at `t` and resolves the offset.
    pub fn resolve_at(
        &self,
        t: f64,
        series_a: &AttitudeSeries,
        series_b: &AttitudeSeries,
    ) -> ConditionResult<[f64; 3]> {
        let fix_a = series_a.attitude_at(t)?;
        let fix_b = series_b.attitude_at(t)?;
        Ok(self.resolve(&fix_a.q, &fix_b.q))
    }

    /// Interpolates one attitude series at `t` and resolves the offset with a
    /// frame transform.
    pub fn resolve_at_with_transform(
        &self,
        t: f64,
        series_a: &AttitudeSeries,
        c2t: ArrayView2<f64>,
    ) -> ConditionResult<[f64; 3]> {
        let fix_a = series_a.attitude_at(t)?;
        Ok(self.resolve_with_transform(&fix_a.q, c2t))
    }
}
