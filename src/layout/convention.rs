//! Translation between host and engine tensor conventions.
//!
//! The host side describes shapes outermost-first and counts axes from zero,
//! the way row-major arrays do. The engine stores tensors column-major, so it
//! lists dimensions innermost-first and counts axes from one. Every shape or
//! axis that crosses into a node descriptor goes through this module.

use std::fmt;
use std::str::FromStr;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A shape argument in host convention.
///
/// `Scalar` is a bare dimension (a vector of that many elements) and is never
/// reversed. `Dims` lists dimensions outermost-first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeArg {
    Scalar(usize),
    Dims(Vec<usize>),
}

impl ShapeArg {
    /// Parse a shape from a JSON value, rejecting anything that is neither a
    /// number nor an array of numbers.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|_| Error::InvalidShape(format!("expected a dimension or a list of dimensions, got {}", value)))
    }

    /// Host dimensions, outermost first. A scalar shape is a single dimension.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            ShapeArg::Scalar(n) => vec![*n],
            ShapeArg::Dims(dims) => dims.clone(),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            ShapeArg::Scalar(_) => 1,
            ShapeArg::Dims(dims) => dims.len(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ShapeArg::Scalar(_))
    }
}

impl From<usize> for ShapeArg {
    fn from(n: usize) -> Self {
        ShapeArg::Scalar(n)
    }
}

impl From<Vec<usize>> for ShapeArg {
    fn from(dims: Vec<usize>) -> Self {
        ShapeArg::Dims(dims)
    }
}

impl From<&[usize]> for ShapeArg {
    fn from(dims: &[usize]) -> Self {
        ShapeArg::Dims(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for ShapeArg {
    fn from(dims: [usize; N]) -> Self {
        ShapeArg::Dims(dims.to_vec())
    }
}

impl FromStr for ShapeArg {
    type Err = Error;

    /// Accepts `"5"`, `"(2, 3)"`, `"(3,)"`, `"[2,3]"` and `"2x3"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (inner, bracketed) = match (trimmed.chars().next(), trimmed.chars().last()) {
            (Some('('), Some(')')) | (Some('['), Some(']')) if trimmed.len() >= 2 => {
                (&trimmed[1..trimmed.len() - 1], true)
            }
            _ => (trimmed, false),
        };

        let parse_dim = |token: &str| {
            token
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::InvalidShape(format!("'{}' is not a dimension in shape '{}'", token.trim(), s)))
        };

        if !bracketed && !inner.contains(',') && !inner.contains('x') {
            return parse_dim(inner).map(ShapeArg::Scalar);
        }

        let separator = if inner.contains('x') && !inner.contains(',') { 'x' } else { ',' };
        let tokens: Vec<&str> = inner.split(separator).collect();
        let mut dims = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            // "(3,)" carries a trailing separator
            if token.trim().is_empty() && i == tokens.len() - 1 && i > 0 {
                continue;
            }
            dims.push(parse_dim(token)?);
        }

        if dims.is_empty() {
            return Err(Error::InvalidShape(format!("shape '{}' has no dimensions", s)));
        }

        Ok(ShapeArg::Dims(dims))
    }
}

impl fmt::Display for ShapeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeArg::Scalar(n) => write!(f, "{}", n),
            ShapeArg::Dims(dims) => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                if dims.len() == 1 {
                    write!(f, "({},)", parts[0])
                } else {
                    write!(f, "({})", parts.join(", "))
                }
            }
        }
    }
}

/// A shape as handed to the engine. Only produced by [`to_engine_shape`] and
/// [`translate_shape`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EngineShape(ShapeArg);

impl EngineShape {
    pub fn scalar(&self) -> Option<usize> {
        match &self.0 {
            ShapeArg::Scalar(n) => Some(*n),
            ShapeArg::Dims(_) => None,
        }
    }

    /// Engine dimensions, innermost first. `None` for a scalar shape.
    pub fn dims(&self) -> Option<&[usize]> {
        match &self.0 {
            ShapeArg::Scalar(_) => None,
            ShapeArg::Dims(dims) => Some(dims),
        }
    }

    pub fn rank(&self) -> usize {
        self.0.rank()
    }
}

impl fmt::Display for EngineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ShapeArg::Scalar(n) => write!(f, "{}", n),
            ShapeArg::Dims(dims) => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "{}", parts.join(":"))
            }
        }
    }
}

/// A one-based axis counted from the innermost engine dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EngineAxis(usize);

impl EngineAxis {
    pub fn get(self) -> usize {
        self.0
    }

    /// The zero-based host axis this engine axis was produced from.
    pub fn to_host_axis(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for EngineAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert a host shape to engine order.
///
/// Scalars pass through. Sequences come back reversed with their values
/// untouched; positivity is not checked here.
pub fn to_engine_shape(shape: &ShapeArg) -> EngineShape {
    let converted = match shape {
        ShapeArg::Scalar(n) => ShapeArg::Scalar(*n),
        ShapeArg::Dims(dims) => ShapeArg::Dims(dims.iter().rev().copied().collect()),
    };
    trace!("host shape {} -> engine shape {:?}", shape, converted);
    EngineShape(converted)
}

/// Inverse of [`to_engine_shape`].
pub fn to_host_shape(shape: &EngineShape) -> ShapeArg {
    match &shape.0 {
        ShapeArg::Scalar(n) => ShapeArg::Scalar(*n),
        ShapeArg::Dims(dims) => ShapeArg::Dims(dims.iter().rev().copied().collect()),
    }
}

/// Convert a zero-based host axis into the engine's one-based axis.
///
/// The engine numbering is counted against the reversed shape, so the offset
/// alone is enough; `rank` is only used to check `0 <= host_axis < rank`.
pub fn to_engine_axis(host_axis: i64, rank: usize) -> Result<EngineAxis> {
    if host_axis < 0 || host_axis as u64 >= rank as u64 {
        return Err(Error::AxisOutOfRange { axis: host_axis, rank });
    }
    Ok(EngineAxis(host_axis as usize + 1))
}

/// A shape and an axis into it, both in engine convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLayout {
    shape: EngineShape,
    axis: EngineAxis,
}

impl EngineLayout {
    pub fn shape(&self) -> &EngineShape {
        &self.shape
    }

    pub fn axis(&self) -> EngineAxis {
        self.axis
    }

    pub fn into_parts(self) -> (EngineShape, EngineAxis) {
        (self.shape, self.axis)
    }
}

/// Translate a shape and an axis into that shape in one step.
pub fn to_engine_layout(shape: &ShapeArg, host_axis: i64) -> Result<EngineLayout> {
    let axis = to_engine_axis(host_axis, shape.rank())?;
    Ok(EngineLayout {
        shape: to_engine_shape(shape),
        axis,
    })
}

/// The engine `outputRank` for a matrix product whose operands are swapped
/// on delegation.
pub fn times_output_rank(left_rank: usize, output_rank: usize) -> Result<usize> {
    if output_rank == 0 || output_rank > left_rank {
        return Err(Error::ValidationError(format!(
            "times output_rank must be in [1, {}] for a left operand of rank {}, got {}",
            left_rank, left_rank, output_rank
        )));
    }
    Ok(left_rank + 1 - output_rank)
}

/// What a shape argument describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRole {
    /// The layout of an existing tensor; reversed into engine order.
    Storage,
    /// The desired output layout; handed over as given.
    Target,
}

/// Translate a shape argument according to its role.
pub fn translate_shape(shape: &ShapeArg, role: ShapeRole) -> EngineShape {
    match role {
        ShapeRole::Storage => to_engine_shape(shape),
        ShapeRole::Target => EngineShape(shape.clone()),
    }
}
