//! Domain models for area matching.

mod area;
mod order;
mod suggestion;

pub use area::*;
pub use order::*;
pub use suggestion::*;
