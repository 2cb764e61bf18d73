use ndarray::{arr0, Array1, ArrayD};

use crate::model::NodeId;

/// An operator argument: an existing node or a literal that becomes a constant
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Node(NodeId),
    Literal(ArrayD<f64>),
}

impl From<NodeId> for Operand {
    fn from(id: NodeId) -> Self {
        Operand::Node(id)
    }
}

impl From<&NodeId> for Operand {
    fn from(id: &NodeId) -> Self {
        Operand::Node(*id)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Literal(arr0(value).into_dyn())
    }
}

impl From<Vec<f64>> for Operand {
    fn from(values: Vec<f64>) -> Self {
        Operand::Literal(Array1::from(values).into_dyn())
    }
}

impl From<&[f64]> for Operand {
    fn from(values: &[f64]) -> Self {
        Operand::from(values.to_vec())
    }
}

impl From<ArrayD<f64>> for Operand {
    fn from(value: ArrayD<f64>) -> Self {
        Operand::Literal(value)
    }
}
