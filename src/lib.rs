// Home Exercises - Core Library
// Number format validation (N(m.k)) and structural comparison of records

pub mod error;
pub mod number_validator;   // Fixed-point format N(m.k) validation
pub mod entities;           // Person records + sample registry
pub mod comparison;         // Field-wise equality of Person chains
pub mod equivalence;        // Generic equivalence with first-difference report

// Re-export commonly used types
pub use error::{ConfigurationError, Result};
pub use number_validator::{NumberFormat, NumberValidator, ParsedNumber, Rejection, Sign};
pub use entities::{Lineage, Person, TsarRegistry};
pub use comparison::are_equal;
pub use equivalence::{
    assert_equivalent, compare, compare_values, Difference, DifferenceKind, EquivalenceError,
    EquivalenceOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
