/// Single-pass mean/variance accumulator backing each slip-detection track.
#[derive(Debug, Clone, Copy)]
pub struct RunningMoments {
    mean: f64,
    variance: f64,
}

impl RunningMoments {
    pub fn seeded(value: f64, variance_seed: f64) -> Self {
        Self {
            mean: value,
            variance: variance_seed,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Folds the `n`-th sample into the running moments.
    ///
    /// The deviation is taken against the pre-update mean for both moments:
    /// `mean += d/n`, `var += (d^2 - var)/n`.
    pub fn update(&mut self, value: f64, n: u32) {
        let bias = value - self.mean;
        let size = f64::from(n);
        self.mean += bias / size;
        self.variance += (bias * bias - self.variance) / size;
    }

    /// Restarts the accumulator on `value` with a fresh variance seed.
    pub fn reseed(&mut self, value: f64, variance_seed: f64) {
        self.mean = value;
        self.variance = variance_seed;
    }
}
