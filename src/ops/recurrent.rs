use crate::builder::GraphBuilder;
use crate::error::{Error, Result};
use crate::layout::{translate_shape, ShapeArg, ShapeRole};
use crate::model::{Attribute, NodeId, OpKind};
use crate::ops::operand::Operand;
use crate::ops::registry::NodeRequest;

pub const DEFAULT_TIME_STEP: usize = 1;
pub const DEFAULT_HIDDEN_ACTIVATION: f64 = 0.1;

impl GraphBuilder {
    /// The sample `time_step` steps ahead of `x` along its dynamic axis,
    /// or `default_hidden_activation` past the end of the sequence.
    pub fn future_value(
        &mut self,
        dims: impl Into<ShapeArg>,
        x: impl Into<Operand>,
        time_step: usize,
        default_hidden_activation: f64,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.delayed_value(OpKind::FutureValue, dims.into(), x.into(), time_step, default_hidden_activation, name)
    }

    /// The sample `time_step` steps behind `x` along its dynamic axis,
    /// or `default_hidden_activation` before the start of the sequence.
    pub fn past_value(
        &mut self,
        dims: impl Into<ShapeArg>,
        x: impl Into<Operand>,
        time_step: usize,
        default_hidden_activation: f64,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.delayed_value(OpKind::PastValue, dims.into(), x.into(), time_step, default_hidden_activation, name)
    }

    fn delayed_value(
        &mut self,
        kind: OpKind,
        dims: ShapeArg,
        x: Operand,
        time_step: usize,
        default_hidden_activation: f64,
        name: Option<&str>,
    ) -> Result<NodeId> {
        if time_step == 0 {
            return Err(Error::ValidationError(format!("{} requires time_step >= 1", kind)));
        }

        let x = self.operand(x)?;

        // dims describes x's storage layout
        self.add(
            NodeRequest::new(kind)
                .inputs(&[x])
                .attribute("dims", Attribute::Shape(translate_shape(&dims, ShapeRole::Storage)))
                .attribute("timeStep", Attribute::Int(time_step as i64))
                .attribute("defaultHiddenActivation", Attribute::Float(default_hidden_activation))
                .name(name),
        )
    }
}
