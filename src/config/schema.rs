//! YAML schema for backward pass options

use serde::{Deserialize, Serialize};

/// What the backward pass does when the output gradient slot is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Fail with `UnseededGradient`; the caller seeds the output
    #[default]
    Require,
    /// Seed the output with ones of its shape
    Ones,
}

/// Options for a single backward pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackwardOptions {
    /// Output seeding behavior
    #[serde(default)]
    pub seed: SeedPolicy,

    /// Reject NaN and infinite gradients
    #[serde(default)]
    pub check_finite: bool,

    /// Upper bound on the number of creator edges walked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for BackwardOptions {
    fn default() -> Self {
        Self {
            seed: SeedPolicy::Require,
            check_finite: false,
            max_depth: None,
        }
    }
}

impl BackwardOptions {
    /// Options that seed an unseeded output with ones
    pub fn seed_ones() -> Self {
        Self {
            seed: SeedPolicy::Ones,
            ..Self::default()
        }
    }

    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
