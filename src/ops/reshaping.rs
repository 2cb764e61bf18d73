use log::warn;

use crate::builder::GraphBuilder;
use crate::error::{Error, Result};
use crate::layout::{to_engine_axis, to_engine_layout, translate_shape, ShapeArg, ShapeRole};
use crate::model::{Attribute, NodeId, OpKind};
use crate::ops::operand::Operand;
use crate::ops::registry::NodeRequest;

fn element_count(mut dims: impl Iterator<Item = usize>) -> Option<usize> {
    dims.try_fold(1usize, |acc, d| acc.checked_mul(d))
}

/// Host output shape of a reshape. A single 0 in `target` is inferred from
/// the element count of `input`.
pub fn reshape_shape(input: Option<&[usize]>, target: &[usize]) -> Result<Option<Vec<usize>>> {
    let inferred: Vec<usize> = target
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(i, _)| i)
        .collect();
    if inferred.len() > 1 {
        return Err(Error::ValidationError(format!(
            "reshape target {:?} may leave at most one dimension to be inferred",
            target
        )));
    }

    let input = match input {
        Some(input) => input,
        None if inferred.is_empty() => return Ok(Some(target.to_vec())),
        None => return Ok(None),
    };

    let total = element_count(input.iter().copied())
        .ok_or_else(|| Error::ValidationError(format!("element count of {:?} overflows", input)))?;
    let known = element_count(target.iter().copied().filter(|&d| d != 0))
        .ok_or_else(|| Error::ValidationError(format!("element count of reshape target {:?} overflows", target)))?;

    let mut shape = target.to_vec();
    match inferred.first() {
        Some(&i) => {
            if known == 0 || total % known != 0 {
                return Err(Error::ValidationError(format!(
                    "cannot reshape {:?} into {:?}",
                    input, target
                )));
            }
            shape[i] = total / known;
        }
        None if known != total => {
            return Err(Error::ValidationError(format!(
                "cannot reshape {:?} ({} elements) into {:?} ({} elements)",
                input, total, target, known
            )));
        }
        None => {}
    }

    Ok(Some(shape))
}

impl GraphBuilder {
    /// Reinterpret `x` with a new shape; one dimension may be 0 and is inferred.
    ///
    /// `shape` is the desired output layout and goes to the engine as given,
    /// not reversed like shapes of existing tensors.
    pub fn reshape(&mut self, x: impl Into<Operand>, shape: impl Into<ShapeArg>, name: Option<&str>) -> Result<NodeId> {
        let target = shape.into();
        let x = self.operand(x.into())?;

        let host_shape = match reshape_shape(self.node(x)?.host_shape.as_deref(), &target.dims()) {
            Ok(shape) => shape,
            Err(e) if !self.options().validate_shapes => {
                warn!("leaving output shape of reshape unknown: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        self.add(
            NodeRequest::new(OpKind::Reshape)
                .inputs(&[x])
                .attribute("shape", Attribute::Shape(translate_shape(&target, ShapeRole::Target)))
                .attribute("beginDim", Attribute::Int(0))
                .attribute("endDim", Attribute::Int(0))
                .name(name)
                .host_shape(host_shape),
        )
    }

    /// Swap two axes of `x`. Axes are zero-based.
    pub fn transpose_dimensions(
        &mut self,
        x: impl Into<Operand>,
        axis1: i64,
        axis2: i64,
        name: Option<&str>,
    ) -> Result<NodeId> {
        let x = self.operand(x.into())?;
        let shape = self.require_shape(x, OpKind::TransposeDimensions)?;

        let layout = to_engine_layout(&ShapeArg::Dims(shape.clone()), axis1)?;
        let engine_axis2 = to_engine_axis(axis2, layout.shape().rank())?;

        let mut host_shape = shape;
        host_shape.swap(axis1 as usize, axis2 as usize);

        self.add(
            NodeRequest::new(OpKind::TransposeDimensions)
                .inputs(&[x])
                .attribute("axis1", Attribute::Axis(layout.axis()))
                .attribute("axis2", Attribute::Axis(engine_axis2))
                .name(name)
                .host_shape(Some(host_shape)),
        )
    }

    /// Elements `begin_index..end_index` of `x` along the zero-based `axis`.
    pub fn slice(
        &mut self,
        x: impl Into<Operand>,
        begin_index: i64,
        end_index: i64,
        axis: i64,
        name: Option<&str>,
    ) -> Result<NodeId> {
        let x = self.operand(x.into())?;
        let shape = self.require_shape(x, OpKind::Slice)?;

        let layout = to_engine_layout(&ShapeArg::Dims(shape.clone()), axis)?;
        let extent = shape[axis as usize] as i64;
        if begin_index < 0 || begin_index >= end_index || end_index > extent {
            return Err(Error::ValidationError(format!(
                "slice [{}, {}) is not a non-empty range within axis {} of extent {}",
                begin_index, end_index, axis, extent
            )));
        }

        let mut host_shape = shape;
        host_shape[axis as usize] = (end_index - begin_index) as usize;

        self.add(
            NodeRequest::new(OpKind::Slice)
                .inputs(&[x])
                .attribute("beginIndex", Attribute::Int(begin_index))
                .attribute("endIndex", Attribute::Int(end_index))
                .attribute("axis", Attribute::Axis(layout.axis()))
                .name(name)
                .host_shape(Some(host_shape)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderOptions;

    #[test]
    fn test_reshape_shape() {
        assert_eq!(reshape_shape(Some(&[3, 2]), &[2, 3]).unwrap(), Some(vec![2, 3]));
        assert_eq!(reshape_shape(Some(&[3, 4]), &[0, 2]).unwrap(), Some(vec![6, 2]));
        assert_eq!(reshape_shape(None, &[2, 3]).unwrap(), Some(vec![2, 3]));
        assert_eq!(reshape_shape(None, &[0, 3]).unwrap(), None);

        assert!(reshape_shape(Some(&[3, 2]), &[4, 2]).is_err());
        assert!(reshape_shape(Some(&[3, 2]), &[0, 4]).is_err());
        assert!(reshape_shape(Some(&[3, 2]), &[0, 0]).is_err());
    }

    #[test]
    fn test_reshape_shape_overflow() {
        assert!(matches!(
            reshape_shape(Some(&[usize::MAX, 2]), &[0, 2]),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            reshape_shape(Some(&[4]), &[usize::MAX, 2]),
            Err(Error::ValidationError(_))
        ));

        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![usize::MAX, 2], None, None).unwrap();
        assert!(builder.reshape(x, vec![0usize, 2], None).is_err());
    }

    #[test]
    fn test_reshape_attributes() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![3usize, 2], None, None).unwrap();
        let id = builder.reshape(x, vec![2usize, 3], None).unwrap();
        let node = builder.node(id).unwrap();

        assert_eq!(node.engine_name(), "NewReshape");
        assert_eq!(node.attribute("beginDim").and_then(|a| a.as_int()), Some(0));
        assert_eq!(node.attribute("endDim").and_then(|a| a.as_int()), Some(0));
        assert_eq!(node.host_shape, Some(vec![2, 3]));
    }

    #[test]
    fn test_reshape_mismatch() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![3usize, 2], None, None).unwrap();
        assert!(builder.reshape(x, vec![5usize], None).is_err());

        let mut lenient = GraphBuilder::with_options(BuilderOptions::new().enable_shape_validation(false));
        let x = lenient.input(vec![3usize, 2], None, None).unwrap();
        let id = lenient.reshape(x, vec![5usize], None).unwrap();
        assert_eq!(lenient.node(id).unwrap().host_shape, None);
    }

    #[test]
    fn test_transpose_offsets_axes() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![1usize, 3, 2], None, None).unwrap();
        let id = builder.transpose_dimensions(x, 1, 2, None).unwrap();
        let node = builder.node(id).unwrap();

        assert_eq!(node.attribute("axis1").and_then(|a| a.as_axis()).map(|a| a.get()), Some(2));
        assert_eq!(node.attribute("axis2").and_then(|a| a.as_axis()).map(|a| a.get()), Some(3));
        assert_eq!(node.host_shape, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_transpose_axis_out_of_range() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![3usize, 2], None, None).unwrap();
        assert!(matches!(
            builder.transpose_dimensions(x, 0, 2, None),
            Err(Error::AxisOutOfRange { axis: 2, rank: 2 })
        ));
        assert!(matches!(
            builder.transpose_dimensions(x, -1, 1, None),
            Err(Error::AxisOutOfRange { axis: -1, rank: 2 })
        ));
    }

    #[test]
    fn test_slice() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![2usize, 3], None, None).unwrap();

        let first_row = builder.slice(x, 1, 2, 0, None).unwrap();
        let node = builder.node(first_row).unwrap();
        assert_eq!(node.attribute("axis").and_then(|a| a.as_axis()).map(|a| a.get()), Some(1));
        assert_eq!(node.attribute("beginIndex").and_then(|a| a.as_int()), Some(1));
        assert_eq!(node.attribute("endIndex").and_then(|a| a.as_int()), Some(2));
        assert_eq!(node.host_shape, Some(vec![1, 3]));

        let first_col = builder.slice(x, 0, 1, 1, None).unwrap();
        let node = builder.node(first_col).unwrap();
        assert_eq!(node.attribute("axis").and_then(|a| a.as_axis()).map(|a| a.get()), Some(2));
        assert_eq!(node.host_shape, Some(vec![2, 1]));
    }

    #[test]
    fn test_slice_bounds() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![2usize, 3], None, None).unwrap();

        assert!(matches!(builder.slice(x, 0, 1, 2, None), Err(Error::AxisOutOfRange { .. })));
        assert!(matches!(builder.slice(x, 2, 2, 1, None), Err(Error::ValidationError(_))));
        assert!(matches!(builder.slice(x, 0, 4, 1, None), Err(Error::ValidationError(_))));
        assert!(matches!(builder.slice(x, -1, 1, 1, None), Err(Error::ValidationError(_))));
    }
}
