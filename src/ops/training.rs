use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::model::{NodeId, OpKind};
use crate::ops::operand::Operand;

impl GraphBuilder {
    /// Randomly zeroes elements of `x` during training; the rate is set on the engine side.
    pub fn dropout(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.nary(OpKind::Dropout, vec![x.into()], name)
    }
}
