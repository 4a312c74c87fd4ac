use ndarray::{arr1, arr2, Array1, Array2, ArrayView2};

pub struct RotationHelper;

impl RotationHelper {
    /// Attitude matrix for a unit quaternion `[q1, q2, q3, q4]`, vector part
    /// first and scalar last.
    pub fn quat_to_matrix(q: &[f64; 4]) -> Array2<f64> {
        let [q1, q2, q3, q4] = *q;
        arr2(&[
            [
                q1 * q1 - q2 * q2 - q3 * q3 + q4 * q4,
                2.0 * (q1 * q2 + q3 * q4),
                2.0 * (q1 * q3 - q2 * q4),
            ],
            [
                2.0 * (q1 * q2 - q3 * q4),
                -q1 * q1 + q2 * q2 - q3 * q3 + q4 * q4,
                2.0 * (q2 * q3 + q1 * q4),
            ],
            [
                2.0 * (q1 * q3 + q2 * q4),
                2.0 * (q2 * q3 - q1 * q4),
                -q1 * q1 - q2 * q2 + q3 * q3 + q4 * q4,
            ],
        ])
    }

    /// Applies a 3x3 rotation to a body-frame vector.
    pub fn rotate(rotation: ArrayView2<f64>, vector: &[f64; 3]) -> [f64; 3] {
        let rotated: Array1<f64> = rotation.dot(&arr1(vector));
        [rotated[0], rotated[1], rotated[2]]
    }
}
