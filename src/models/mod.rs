//! Core data models for the festival tracker.

mod candidate;
mod ids;
mod programme;
mod registration;
mod result;
mod team;

pub use candidate::*;
pub use ids::*;
pub use programme::*;
pub use registration::*;
pub use result::*;
pub use team::*;
