//! Declarative YAML configuration for the backward pass
//!
//! # Example
//!
//! ```yaml
//! seed: ones          # or `require` (default)
//! check_finite: true
//! max_depth: 10000
//! ```

mod load;
mod schema;
mod validate;


pub use load::load_options;
pub use schema::{BackwardOptions, SeedPolicy};
pub use validate::{validate_options, ValidationError};
