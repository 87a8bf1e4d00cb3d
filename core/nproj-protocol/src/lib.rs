pub mod ids;
pub mod morphology;

// Re-export core types for convenience
pub use ids::TokenId;
pub use morphology::*;

pub mod model;
pub use model::*;
