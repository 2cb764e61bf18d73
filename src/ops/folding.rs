//! Folding of unary elementwise ops applied to literal operands.
//!
//! The engine clamps the domains of `log` and `sqrt` instead of producing
//! NaN or -inf. Folded constants follow whichever [`DomainPolicy`] the
//! builder is configured with, so a folded graph evaluates like an unfolded one.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::model::OpKind;

/// Smallest argument the engine feeds to `ln`; `ln(1e-37)` is about -85.1.
pub const LOG_FLOOR: f64 = 1e-37;

/// Semantics of `log` and `sqrt` outside their real domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    /// `log(x <= 0)` is `ln(1e-37)`, `sqrt(x < 0)` is zero
    #[default]
    EngineSentinel,
    /// NaN and -inf as produced by IEEE arithmetic
    Ieee,
}

/// Value of a unary elementwise op at `x`, or `None` if `kind` is not one.
pub fn apply_unary(kind: OpKind, x: f64, policy: DomainPolicy) -> Option<f64> {
    let value = match kind {
        OpKind::Identity => x,
        OpKind::Floor => x.floor(),
        OpKind::Ceil => x.ceil(),
        // half-up, unlike f64::round
        OpKind::Round => (x + 0.5).floor(),
        OpKind::Relu => x.max(0.0),
        OpKind::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        OpKind::Tanh => x.tanh(),
        OpKind::Exp => x.exp(),
        OpKind::Log => match policy {
            DomainPolicy::EngineSentinel => x.max(LOG_FLOOR).ln(),
            DomainPolicy::Ieee => x.ln(),
        },
        OpKind::Sqrt => match policy {
            DomainPolicy::EngineSentinel => x.max(0.0).sqrt(),
            DomainPolicy::Ieee => x.sqrt(),
        },
        OpKind::Square => x * x,
        OpKind::Abs => x.abs(),
        _ => return None,
    };
    Some(value)
}

/// Fold `kind` over a literal, or `None` if `kind` cannot be folded.
pub fn fold_unary(kind: OpKind, value: &ArrayD<f64>, policy: DomainPolicy) -> Option<ArrayD<f64>> {
    if !kind.is_unary_elementwise() {
        return None;
    }
    Some(value.mapv(|x| apply_unary(kind, x, policy).unwrap_or(x)))
}
