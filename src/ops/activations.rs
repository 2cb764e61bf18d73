use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::model::{NodeId, OpKind};
use crate::ops::operand::Operand;

impl GraphBuilder {
    /// `min(max(x, min_value), max_value)`, same shape as `x`
    pub fn clip(
        &mut self,
        x: impl Into<Operand>,
        min_value: impl Into<Operand>,
        max_value: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(OpKind::Clip, vec![x.into(), min_value.into(), max_value.into()], name)
    }

    pub fn relu(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Relu, x.into(), name)
    }

    pub fn sigmoid(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Sigmoid, x.into(), name)
    }

    pub fn tanh(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Tanh, x.into(), name)
    }

    pub fn softmax(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Softmax, x.into(), name)
    }

    pub fn exp(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Exp, x.into(), name)
    }

    /// Natural logarithm. The engine returns `ln(1e-37)` (about -85.1) for
    /// non-positive inputs rather than NaN or -inf.
    pub fn log(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Log, x.into(), name)
    }

    /// Square root. The engine returns 0 for negative inputs.
    pub fn sqrt(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Sqrt, x.into(), name)
    }

    pub fn square(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Square, x.into(), name)
    }

    pub fn abs(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Abs, x.into(), name)
    }

    /// `value_if_true` where `flag != 0`, `value_if_false` elsewhere
    pub fn cond(
        &mut self,
        flag: impl Into<Operand>,
        value_if_true: impl Into<Operand>,
        value_if_false: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(
            OpKind::Cond,
            vec![flag.into(), value_if_true.into(), value_if_false.into()],
            name,
        )
    }
}
