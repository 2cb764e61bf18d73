use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use log::warn;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::model::{Attribute, Node, NodeId, OpKind};

/// Everything a builder knows about a node before it is added to the graph
#[derive(Debug, Clone)]
pub struct NodeRequest {
    pub kind: OpKind,
    pub inputs: Vec<NodeId>,
    pub attributes: BTreeMap<String, Attribute>,
    pub name: Option<String>,
    /// Host-convention output shape computed by the builder, if any
    pub host_shape: Option<Vec<usize>>,
}

impl NodeRequest {
    pub fn new(kind: OpKind) -> Self {
        Self {
            kind,
            inputs: Vec::new(),
            attributes: BTreeMap::new(),
            name: None,
            host_shape: None,
        }
    }

    pub fn inputs(mut self, inputs: &[NodeId]) -> Self {
        self.inputs.extend_from_slice(inputs);
        self
    }

    pub fn attribute(mut self, key: &str, value: Attribute) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(str::to_string);
        self
    }

    pub fn host_shape(mut self, shape: Option<Vec<usize>>) -> Self {
        self.host_shape = shape;
        self
    }
}

/// How the host output shape of a node follows from its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRule {
    /// Same shape as the first operand
    Preserve,
    /// Broadcast of all operands
    Broadcast,
    /// A single value
    Scalar,
    /// Supplied by the builder
    Declared,
}

/// Trait implemented by every node constructor in the registry
pub trait Operator: Send + Sync + Debug {
    fn kind(&self) -> OpKind;

    /// Number of operands
    fn arity(&self) -> usize;

    /// Check operand count and attributes of a request
    fn validate(&self, request: &NodeRequest) -> Result<()>;

    /// Infer the host output shape from the operand shapes
    fn infer_shape(&self, request: &NodeRequest, input_shapes: &[Option<&[usize]>]) -> Result<Option<Vec<usize>>>;
}

/// Operator described by its arity, required attributes and shape rule
#[derive(Debug, Clone)]
pub struct StandardOperator {
    kind: OpKind,
    arity: usize,
    required_attributes: &'static [&'static str],
    shape_rule: ShapeRule,
}

impl StandardOperator {
    pub const fn new(
        kind: OpKind,
        arity: usize,
        required_attributes: &'static [&'static str],
        shape_rule: ShapeRule,
    ) -> Self {
        Self { kind, arity, required_attributes, shape_rule }
    }

    pub fn shape_rule(&self) -> ShapeRule {
        self.shape_rule
    }
}

impl Operator for StandardOperator {
    fn kind(&self) -> OpKind {
        self.kind
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn validate(&self, request: &NodeRequest) -> Result<()> {
        if request.kind != self.kind {
            return Err(Error::InvalidOperator(format!(
                "{} cannot build a {} node",
                self.kind, request.kind
            )));
        }

        if request.inputs.len() != self.arity {
            return Err(Error::ValidationError(format!(
                "{} requires {} inputs, got {}",
                self.kind,
                self.arity,
                request.inputs.len()
            )));
        }

        for key in self.required_attributes {
            if !request.attributes.contains_key(*key) {
                return Err(Error::MissingField(format!("{} requires attribute '{}'", self.kind, key)));
            }
        }

        Ok(())
    }

    fn infer_shape(&self, request: &NodeRequest, input_shapes: &[Option<&[usize]>]) -> Result<Option<Vec<usize>>> {
        if request.host_shape.is_some() {
            return Ok(request.host_shape.clone());
        }

        match self.shape_rule {
            ShapeRule::Preserve => Ok(input_shapes.first().copied().flatten().map(<[usize]>::to_vec)),
            ShapeRule::Scalar => Ok(Some(vec![1])),
            ShapeRule::Declared => Ok(None),
            ShapeRule::Broadcast => {
                let mut result: Vec<usize> = Vec::new();
                for shape in input_shapes {
                    match shape {
                        Some(shape) => result = broadcast_shapes(&result, shape)?,
                        None => return Ok(None),
                    }
                }
                Ok(Some(result))
            }
        }
    }
}

/// NumPy-style broadcast of two host shapes
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut result = vec![0; rank];

    for i in 0..rank {
        let da = if i < rank - a.len() { 1 } else { a[i - (rank - a.len())] };
        let db = if i < rank - b.len() { 1 } else { b[i - (rank - b.len())] };

        result[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => {
                return Err(Error::ValidationError(format!(
                    "shapes {:?} and {:?} cannot be broadcast together",
                    a, b
                )))
            }
        };
    }

    Ok(result)
}

const STANDARD_OPERATORS: &[StandardOperator] = &[
    // evaluation
    StandardOperator::new(OpKind::CrossEntropyWithSoftmax, 2, &[], ShapeRule::Scalar),
    StandardOperator::new(OpKind::SquareError, 2, &[], ShapeRule::Scalar),
    StandardOperator::new(OpKind::ErrorPrediction, 2, &[], ShapeRule::Scalar),
    // comparison
    StandardOperator::new(OpKind::Less, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::Equal, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::Greater, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::GreaterEqual, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::NotEqual, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::LessEqual, 2, &[], ShapeRule::Broadcast),
    // linear
    StandardOperator::new(OpKind::Plus, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::Minus, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::ElementTimes, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::ElementDivide, 2, &[], ShapeRule::Broadcast),
    StandardOperator::new(OpKind::Times, 2, &["outputRank"], ShapeRule::Declared),
    StandardOperator::new(OpKind::Identity, 1, &[], ShapeRule::Preserve),
    // non-diff
    StandardOperator::new(OpKind::Floor, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Ceil, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Round, 1, &[], ShapeRule::Preserve),
    // non-linear
    StandardOperator::new(OpKind::Clip, 3, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Relu, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Sigmoid, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Tanh, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Softmax, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Exp, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Log, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Sqrt, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Square, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Abs, 1, &[], ShapeRule::Preserve),
    StandardOperator::new(OpKind::Cond, 3, &[], ShapeRule::Broadcast),
    // recurrent
    StandardOperator::new(
        OpKind::FutureValue,
        1,
        &["dims", "timeStep", "defaultHiddenActivation"],
        ShapeRule::Preserve,
    ),
    StandardOperator::new(
        OpKind::PastValue,
        1,
        &["dims", "timeStep", "defaultHiddenActivation"],
        ShapeRule::Preserve,
    ),
    // reshaping
    StandardOperator::new(OpKind::Reshape, 1, &["shape", "beginDim", "endDim"], ShapeRule::Declared),
    StandardOperator::new(OpKind::TransposeDimensions, 1, &["axis1", "axis2"], ShapeRule::Declared),
    StandardOperator::new(OpKind::Slice, 1, &["beginIndex", "endIndex", "axis"], ShapeRule::Declared),
    // training
    StandardOperator::new(OpKind::Dropout, 1, &[], ShapeRule::Preserve),
    // variables and parameters
    StandardOperator::new(OpKind::Input, 0, &["shape"], ShapeRule::Declared),
    StandardOperator::new(OpKind::SparseInput, 0, &["shape"], ShapeRule::Declared),
    StandardOperator::new(
        OpKind::Parameter,
        0,
        &["shape", "learningRateMultiplier", "init"],
        ShapeRule::Declared,
    ),
    StandardOperator::new(OpKind::DynamicAxis, 0, &[], ShapeRule::Declared),
    StandardOperator::new(OpKind::ReconcileDynamicAxis, 2, &[], ShapeRule::Preserve),
];

/// Registry mapping operator tags to node constructors
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    operators: HashMap<OpKind, Box<dyn Operator>>,
}

impl OperatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Register an operator under its tag
    pub fn register_operator(&mut self, op: Box<dyn Operator>) -> Result<()> {
        let kind = op.kind();
        if self.operators.contains_key(&kind) {
            return Err(Error::InvalidOperator(format!("Operator {} is already registered", kind)));
        }

        self.operators.insert(kind, op);
        Ok(())
    }

    pub fn get_operator(&self, kind: OpKind) -> Option<&dyn Operator> {
        self.operators.get(&kind).map(|op| op.as_ref())
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Registry holding every standard operator
    pub fn initialize_standard_operators() -> Self {
        let mut registry = Self::new();
        for op in STANDARD_OPERATORS {
            registry.operators.insert(op.kind, Box::new(op.clone()));
        }
        registry
    }

    /// Validate a request, resolve its host shape and append the node.
    ///
    /// With `strict` unset, a shape that cannot be inferred is logged and left
    /// unknown instead of failing the request.
    pub fn create_node(&self, graph: &mut Graph, request: NodeRequest, strict: bool) -> Result<NodeId> {
        let op = self.get_operator(request.kind).ok_or_else(|| {
            Error::UnsupportedFeature(format!("Operator {} not found in registry", request.kind))
        })?;

        op.validate(&request)?;

        let mut input_shapes = Vec::with_capacity(request.inputs.len());
        for input in &request.inputs {
            input_shapes.push(graph.get(*input)?.host_shape.as_deref());
        }

        let host_shape = match op.infer_shape(&request, &input_shapes) {
            Ok(shape) => shape,
            Err(e) if !strict => {
                warn!("leaving output shape of {} unknown: {}", request.kind, e);
                None
            }
            Err(e) => return Err(e),
        };

        let node = Node {
            id: graph.next_id(),
            name: request.name,
            kind: request.kind,
            inputs: request.inputs,
            attributes: request.attributes,
            host_shape,
        };

        graph.push(node)
    }
}
