// Entity Models
//
// Each entity has:
// - Identity (id) assigned at creation, never part of equality
// - Immutable values compared structurally
// - Registry for well-known sample records

pub mod person;
pub mod tsar_registry;

pub use person::{Lineage, Person};
pub use tsar_registry::TsarRegistry;
