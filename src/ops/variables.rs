use std::path::PathBuf;

use ndarray::ArrayD;

use crate::builder::GraphBuilder;
use crate::error::{Error, Result};
use crate::layout::literal::value_shape;
use crate::layout::{encode_literal, translate_shape, ShapeArg, ShapeRole};
use crate::model::{Attribute, NodeId, OpKind, ParameterInit};
use crate::ops::operand::Operand;
use crate::ops::registry::NodeRequest;

/// Arguments of [`GraphBuilder::parameter`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    /// Host shape; ignored in favour of the value's shape when a value is given
    pub shape: Option<ShapeArg>,
    /// Initial value; uniform random initialisation when absent
    pub value: Option<ArrayD<f64>>,
    pub learning_rate_multiplier: f64,
    /// File holding the initial value, used only without `value`
    pub init_from_file_path: Option<PathBuf>,
    pub name: Option<String>,
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            shape: None,
            value: None,
            learning_rate_multiplier: 1.0,
            init_from_file_path: None,
            name: None,
        }
    }
}

impl ParameterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(shape: impl Into<ShapeArg>) -> Self {
        Self {
            shape: Some(shape.into()),
            ..Self::default()
        }
    }

    pub fn with_value(value: ArrayD<f64>) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn learning_rate_multiplier(mut self, multiplier: f64) -> Self {
        self.learning_rate_multiplier = multiplier;
        self
    }

    pub fn init_from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.init_from_file_path = Some(path.into());
        self
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(str::to_string);
        self
    }
}

impl GraphBuilder {
    /// Declare an input fed by a separate reader
    pub fn input(
        &mut self,
        shape: impl Into<ShapeArg>,
        dynamic_axis: Option<NodeId>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.declare_input(OpKind::Input, shape.into(), dynamic_axis, name)
    }

    /// Declare an input whose shape is that of one sample in `value`.
    ///
    /// `value` holds samples along its first axis; with a dynamic axis each
    /// sample is a sequence and its second axis is dropped as well.
    pub fn input_for_samples(
        &mut self,
        value: &ArrayD<f64>,
        dynamic_axis: Option<NodeId>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        let skip = if dynamic_axis.is_some() { 2 } else { 1 };
        if value.ndim() <= skip || value.shape()[0] == 0 {
            return Err(Error::ValidationError(format!(
                "value of shape {:?} is not an array of input samples",
                value.shape()
            )));
        }

        let sample_shape = value.shape()[skip..].to_vec();
        self.declare_input(OpKind::Input, ShapeArg::Dims(sample_shape), dynamic_axis, name)
    }

    /// Declare a sparse input fed by a separate reader
    pub fn sparse_input(
        &mut self,
        shape: impl Into<ShapeArg>,
        dynamic_axis: Option<NodeId>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.declare_input(OpKind::SparseInput, shape.into(), dynamic_axis, name)
    }

    fn declare_input(
        &mut self,
        kind: OpKind,
        shape: ShapeArg,
        dynamic_axis: Option<NodeId>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        let mut request = NodeRequest::new(kind)
            .attribute("shape", Attribute::Shape(translate_shape(&shape, ShapeRole::Storage)))
            .name(name)
            .host_shape(Some(shape.dims()));

        if let Some(axis) = dynamic_axis {
            let axis_node = self.node(axis)?;
            if axis_node.kind != OpKind::DynamicAxis {
                return Err(Error::ValidationError(format!(
                    "{} is a {} node, not a dynamic axis",
                    axis_node.display_name(),
                    axis_node.engine_name()
                )));
            }
            request = request.attribute("dynamicAxis", Attribute::Node(axis));
        }

        self.add(request)
    }

    /// Declare a learnable parameter tensor
    pub fn parameter(&mut self, spec: ParameterSpec) -> Result<NodeId> {
        let ParameterSpec {
            shape,
            value,
            learning_rate_multiplier,
            init_from_file_path,
            name,
        } = spec;

        let request = NodeRequest::new(OpKind::Parameter)
            .attribute("learningRateMultiplier", Attribute::Float(learning_rate_multiplier))
            .name(name.as_deref());

        let request = match value {
            None => {
                let shape = shape.ok_or_else(|| {
                    Error::ValidationError("parameter requires a shape or a value".to_string())
                })?;
                let request = request
                    .attribute("shape", Attribute::Shape(translate_shape(&shape, ShapeRole::Storage)))
                    .host_shape(Some(shape.dims()));

                match init_from_file_path {
                    Some(path) => request
                        .attribute("init", Attribute::Str(ParameterInit::FromFile.engine_name().to_string()))
                        .attribute("initFromFilePath", Attribute::Path(path)),
                    None => request.attribute("init", Attribute::Str(ParameterInit::Uniform.engine_name().to_string())),
                }
            }
            Some(value) => {
                let host_shape = value_shape(&value);
                if let Some(shape) = &shape {
                    if shape.dims() != host_shape {
                        return Err(Error::ValidationError(format!(
                            "parameter shape {} does not match its value of shape {:?}",
                            shape, host_shape
                        )));
                    }
                }
                if init_from_file_path.is_some() {
                    return Err(Error::ValidationError(
                        "parameter cannot be initialised from both a value and a file".to_string(),
                    ));
                }

                let literal = encode_literal(&value)?;
                request
                    .attribute("shape", Attribute::Shape(literal.shape))
                    .attribute("init", Attribute::Str(ParameterInit::FromLiteral.engine_name().to_string()))
                    .attribute("initFromLiteral", Attribute::Literal(literal.text))
                    .host_shape(Some(host_shape))
            }
        };

        self.add(request)
    }

    /// A parameter that is never updated by training
    pub fn constant(&mut self, value: ArrayD<f64>, name: Option<&str>) -> Result<NodeId> {
        self.parameter(ParameterSpec::with_value(value).learning_rate_multiplier(0.0).name(name))
    }

    /// A dynamic axis that inputs can be attached to, for sequences of varying length
    pub fn dynamic_axis(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.add(NodeRequest::new(OpKind::DynamicAxis).name(name))
    }

    /// Give `data_input` the dynamic axis layout of `layout_input`
    pub fn reconcile_dynamic_axis(
        &mut self,
        data_input: impl Into<Operand>,
        layout_input: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(OpKind::ReconcileDynamicAxis, vec![data_input.into(), layout_input.into()], name)
    }
}
