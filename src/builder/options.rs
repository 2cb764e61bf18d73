use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ops::folding::DomainPolicy;

/// Options for graph construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Fold unary elementwise ops on literal operands into constants
    pub fold_constants: bool,
    /// Domain semantics used when folding `log` and `sqrt`
    pub domain_policy: DomainPolicy,
    /// Fail on shape mismatches instead of leaving the output shape unknown
    pub validate_shapes: bool,
    /// Prefix for names given to unnamed nodes (`None` leaves them unnamed)
    pub name_prefix: Option<String>,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            fold_constants: false,
            domain_policy: DomainPolicy::EngineSentinel,
            validate_shapes: true,
            name_prefix: None,
        }
    }
}

impl BuilderOptions {
    /// Create a new builder options object
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enable or disable constant folding
    pub fn enable_constant_folding(mut self, enable: bool) -> Self {
        self.fold_constants = enable;
        self
    }

    /// Set the domain policy for folded `log` and `sqrt`
    pub fn set_domain_policy(mut self, policy: DomainPolicy) -> Self {
        self.domain_policy = policy;
        self
    }

    /// Enable or disable shape validation
    pub fn enable_shape_validation(mut self, enable: bool) -> Self {
        self.validate_shapes = enable;
        self
    }

    /// Name unnamed nodes `<prefix><id>`
    pub fn set_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }
}
