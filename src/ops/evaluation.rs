use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::model::{NodeId, OpKind};
use crate::ops::operand::Operand;

impl GraphBuilder {
    /// Cross entropy over the softmax of unscaled `output_vector`
    pub fn cross_entropy_with_softmax(
        &mut self,
        target_vector: impl Into<Operand>,
        output_vector: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(
            OpKind::CrossEntropyWithSoftmax,
            vec![target_vector.into(), output_vector.into()],
            name,
        )
    }

    pub fn square_error(
        &mut self,
        target_matrix: impl Into<Operand>,
        output_matrix: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(OpKind::SquareError, vec![target_matrix.into(), output_matrix.into()], name)
    }

    /// 0 when the argmax of `output_vector` hits the hot bit of `target_vector`, 1 otherwise.
    /// Not differentiable, so only usable as an evaluation criterion.
    pub fn error_prediction(
        &mut self,
        target_vector: impl Into<Operand>,
        output_vector: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(OpKind::ErrorPrediction, vec![target_vector.into(), output_vector.into()], name)
    }
}
