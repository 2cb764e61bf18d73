use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::layout::{EngineAxis, EngineShape};

/// Unique identifier for a node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The engine node set an operator is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EngineLibrary {
    /// Legacy network-description nodes
    V1,
    /// Tensor nodes
    V2,
}

/// Operator tags. `Display` yields the engine node type name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum OpKind {
    // evaluation
    CrossEntropyWithSoftmax,
    SquareError,
    ErrorPrediction,

    // comparison
    Less,
    Equal,
    Greater,
    GreaterEqual,
    NotEqual,
    LessEqual,

    // linear
    Plus,
    Minus,
    ElementTimes,
    ElementDivide,
    Times,
    Identity,

    // non-diff
    Floor,
    Ceil,
    Round,

    // non-linear
    Clip,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
    Exp,
    Log,
    Sqrt,
    Square,
    Abs,
    #[strum(serialize = "If")]
    Cond,

    // recurrent
    FutureValue,
    PastValue,

    // reshaping
    #[strum(serialize = "NewReshape")]
    Reshape,
    TransposeDimensions,
    Slice,

    // training
    Dropout,

    // variables and parameters
    Input,
    SparseInput,
    #[strum(serialize = "ParameterTensor")]
    Parameter,
    DynamicAxis,
    ReconcileDynamicAxis,
}

impl OpKind {
    /// Engine node type name
    pub fn engine_name(self) -> &'static str {
        self.into()
    }

    pub fn library(self) -> EngineLibrary {
        match self {
            OpKind::CrossEntropyWithSoftmax
            | OpKind::SquareError
            | OpKind::Cond
            | OpKind::FutureValue
            | OpKind::PastValue
            | OpKind::Reshape
            | OpKind::Input
            | OpKind::SparseInput
            | OpKind::Parameter
            | OpKind::ReconcileDynamicAxis => EngineLibrary::V1,
            _ => EngineLibrary::V2,
        }
    }

    /// Elementwise ops with a single tensor operand
    pub fn is_unary_elementwise(self) -> bool {
        matches!(
            self,
            OpKind::Identity
                | OpKind::Floor
                | OpKind::Ceil
                | OpKind::Round
                | OpKind::Relu
                | OpKind::Sigmoid
                | OpKind::Tanh
                | OpKind::Exp
                | OpKind::Log
                | OpKind::Sqrt
                | OpKind::Square
                | OpKind::Abs
        )
    }
}

/// How a parameter tensor gets its initial value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterInit {
    Uniform,
    FromFile,
    FromLiteral,
}

impl ParameterInit {
    pub fn engine_name(self) -> &'static str {
        match self {
            ParameterInit::Uniform => "uniform",
            ParameterInit::FromFile => "fromFile",
            ParameterInit::FromLiteral => "fromLiteral",
        }
    }
}

/// Node attribute, already in engine convention
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Attribute {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Shape(EngineShape),
    Axis(EngineAxis),
    Node(NodeId),
    Path(PathBuf),
    Literal(String),
}

impl Attribute {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Attribute::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Attribute::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attribute::Str(v) | Attribute::Literal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&EngineShape> {
        match self {
            Attribute::Shape(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_axis(&self) -> Option<EngineAxis> {
        match self {
            Attribute::Axis(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Attribute::Node(v) => Some(*v),
            _ => None,
        }
    }
}

/// A graph-node descriptor handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub kind: OpKind,
    /// Operands in engine argument order
    pub inputs: Vec<NodeId>,
    pub attributes: BTreeMap<String, Attribute>,
    /// Output shape in host convention, when it can be determined
    pub host_shape: Option<Vec<usize>>,
}

impl Node {
    pub fn engine_name(&self) -> &'static str {
        self.kind.engine_name()
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("node_{}", self.id),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    pub fn rank(&self) -> Option<usize> {
        self.host_shape.as_ref().map(|s| s.len())
    }
}
