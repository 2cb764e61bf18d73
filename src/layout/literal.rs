use ndarray::ArrayD;

use crate::error::{Error, Result};
use crate::layout::convention::{to_engine_shape, EngineShape, ShapeArg};

/// A parameter value encoded for the engine's literal initialiser.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineLiteral {
    /// Engine-order shape of the parameter
    pub shape: EngineShape,
    /// Rows and columns of the literal matrix
    pub rows: usize,
    pub cols: usize,
    /// Newline-terminated rows of space-separated values
    pub text: String,
}

/// Host shape of a value; 0-d arrays count as a single element.
pub fn value_shape(value: &ArrayD<f64>) -> Vec<usize> {
    if value.ndim() == 0 {
        vec![1]
    } else {
        value.shape().to_vec()
    }
}

/// Encode a value as a column-major literal matrix.
///
/// With engine shape `p`, the matrix is `p[0] x product(p[1..])`. Reading the
/// value in host (row-major) order and filling the matrix column by column
/// gives the layout the engine reads back into `p`.
pub fn encode_literal(value: &ArrayD<f64>) -> Result<EngineLiteral> {
    let host_shape = value_shape(value);
    if host_shape.iter().any(|&d| d == 0) {
        return Err(Error::ValidationError(format!(
            "cannot encode an empty value of shape {:?}",
            host_shape
        )));
    }

    let shape = to_engine_shape(&ShapeArg::Dims(host_shape.clone()));
    let engine_dims = shape.dims().unwrap_or(&[]);
    let rows = engine_dims.first().copied().unwrap_or(1);
    let cols = engine_dims
        .iter()
        .skip(1)
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| Error::ValidationError(format!("value of shape {:?} is too large to encode", host_shape)))?;

    let flat: Vec<f64> = value.iter().copied().collect();

    let mut text = String::new();
    for row in 0..rows {
        let line: Vec<String> = (0..cols)
            .map(|col| format!("{:.4}", flat[row + col * rows]))
            .collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }

    Ok(EngineLiteral { shape, rows, cols, text })
}
