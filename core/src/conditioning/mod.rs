pub mod cycle_slip;

pub use cycle_slip::{DetectorConfig, MwSlipDetector, MW_WAVELENGTH};
