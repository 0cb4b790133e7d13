//! Core domain layer: entities, the published tree snapshot, and the trait seams
//! to external collaborators.

pub mod entities;
pub mod repositories;
pub mod snapshot;
