pub mod epoch;
pub mod sat;

pub use epoch::{ObsEpoch, SatObs};
pub use sat::{GnssSystem, SatId};
