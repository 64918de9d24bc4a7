pub mod elitist;

pub use elitist::{elite_count, ElitistSelection};
