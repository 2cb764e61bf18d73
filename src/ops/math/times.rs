use log::warn;

use crate::builder::GraphBuilder;
use crate::error::{Error, Result};
use crate::layout::times_output_rank;
use crate::model::{Attribute, NodeId, OpKind};
use crate::ops::operand::Operand;
use crate::ops::registry::NodeRequest;

/// Host shape of `left x right`.
///
/// The trailing `rank(left) - output_rank` axes of `left` are contracted with
/// the same number of leading axes of `right`; `output_rank = rank(left)`
/// contracts nothing and gives an outer product.
pub fn times_shape(left: &[usize], right: &[usize], output_rank: usize) -> Result<Vec<usize>> {
    if output_rank == 0 || output_rank > left.len() {
        return Err(Error::ValidationError(format!(
            "times output_rank must be in [1, {}], got {}",
            left.len(),
            output_rank
        )));
    }

    let contracted = left.len() - output_rank;
    if contracted > right.len() {
        return Err(Error::ValidationError(format!(
            "times cannot contract {} axes of {:?} with {:?}",
            contracted, left, right
        )));
    }

    if left[output_rank..] != right[..contracted] {
        return Err(Error::ValidationError(format!(
            "times operands {:?} and {:?} do not agree on the contracted axes",
            left, right
        )));
    }

    let mut shape = left[..output_rank].to_vec();
    shape.extend_from_slice(&right[contracted..]);
    Ok(shape)
}

impl GraphBuilder {
    /// Matrix product `left x right`.
    ///
    /// The engine is column-major, so it receives the operands swapped
    /// (`right`, `left`) and `outputRank = rank(left) + 1 - output_rank`.
    pub fn times(
        &mut self,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
        output_rank: usize,
        name: Option<&str>,
    ) -> Result<NodeId> {
        let left = self.operand(left.into())?;
        let right = self.operand(right.into())?;

        let left_shape = self.require_shape(left, OpKind::Times)?;
        let engine_output_rank = times_output_rank(left_shape.len(), output_rank)?;

        let host_shape = match &self.node(right)?.host_shape {
            Some(right_shape) => match times_shape(&left_shape, right_shape, output_rank) {
                Ok(shape) => Some(shape),
                Err(e) if !self.options().validate_shapes => {
                    warn!("leaving output shape of Times unknown: {}", e);
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };

        self.add(
            NodeRequest::new(OpKind::Times)
                .inputs(&[right, left])
                .attribute("outputRank", Attribute::Int(engine_output_rank as i64))
                .name(name)
                .host_shape(host_shape),
        )
    }
}
