pub mod crossing;
pub mod deprojectifier;
pub mod histogram;
pub mod scan;

pub use crossing::crossing_arcs;
pub use deprojectifier::{find_candidates, nearest, Candidate, Deprojectifier, Window};
pub use histogram::Histogram;
