//! Configuration validation

use super::schema::BackwardOptions;

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid max depth: {0} (must be > 0)")]
    InvalidMaxDepth(usize),
}

/// Validate backward options
pub fn validate_options(options: &BackwardOptions) -> Result<(), ValidationError> {
    if let Some(max_depth) = options.max_depth {
        if max_depth == 0 {
            return Err(ValidationError::InvalidMaxDepth(max_depth));
        }
    }

    Ok(())
}
