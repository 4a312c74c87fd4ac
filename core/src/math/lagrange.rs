pub struct LagrangeHelper;

impl LagrangeHelper {
    /// Evaluates the Lagrange polynomial through `(times[i], values[i])` at `t`.
    ///
    /// Node times must be pairwise distinct. Exact at every node and for any
    /// underlying polynomial of degree below the node count.
    pub fn eval(times: &[f64], values: &[f64], t: f64) -> f64 {
        debug_assert_eq!(times.len(), values.len());

        let mut acc = 0.0;
        for (i, &ti) in times.iter().enumerate() {
            let mut basis = 1.0;
            for (j, &tj) in times.iter().enumerate() {
                if i != j {
                    basis *= (t - tj) / (ti - tj);
                }
            }
            acc += basis * values[i];
        }
        acc
    }
}
