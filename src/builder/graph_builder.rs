use log::debug;

use crate::builder::options::BuilderOptions;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::model::{Node, NodeId, OpKind};
use crate::ops::folding::fold_unary;
use crate::ops::operand::Operand;
use crate::ops::registry::{NodeRequest, OperatorRegistry};

/// Builds a graph of node descriptors.
///
/// Operator families live in `crate::ops` as `impl GraphBuilder` blocks; they
/// translate host arguments and hand a [`NodeRequest`] to the registry.
#[derive(Debug)]
pub struct GraphBuilder {
    graph: Graph,
    registry: OperatorRegistry,
    options: BuilderOptions,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self::with_registry(OperatorRegistry::initialize_standard_operators(), options)
    }

    pub fn with_registry(registry: OperatorRegistry, options: BuilderOptions) -> Self {
        Self {
            graph: Graph::new(),
            registry,
            options,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.graph.get(id)
    }

    /// Append a node through the registry
    pub fn add(&mut self, mut request: NodeRequest) -> Result<NodeId> {
        if request.name.is_none() {
            if let Some(prefix) = &self.options.name_prefix {
                // skip suffixes the caller already claimed
                let mut suffix = self.graph.next_id().index();
                let mut name = format!("{}{}", prefix, suffix);
                while self.graph.find_by_name(&name).is_some() {
                    suffix += 1;
                    name = format!("{}{}", prefix, suffix);
                }
                request.name = Some(name);
            }
        }
        self.registry
            .create_node(&mut self.graph, request, self.options.validate_shapes)
    }

    /// Resolve an operand to a node, turning literals into constants
    pub(crate) fn operand(&mut self, operand: Operand) -> Result<NodeId> {
        match operand {
            Operand::Node(id) => {
                self.graph.get(id)?;
                Ok(id)
            }
            Operand::Literal(value) => self.constant(value, None),
        }
    }

    /// Host shape of a node, required by the caller
    pub(crate) fn require_shape(&self, id: NodeId, op: OpKind) -> Result<Vec<usize>> {
        let node = self.graph.get(id)?;
        node.host_shape.clone().ok_or_else(|| {
            Error::ValidationError(format!(
                "{} needs the rank of {}, which is unknown",
                op,
                node.display_name()
            ))
        })
    }

    /// A node with a single tensor operand
    pub(crate) fn unary(&mut self, kind: OpKind, x: Operand, name: Option<&str>) -> Result<NodeId> {
        if self.options.fold_constants {
            if let Operand::Literal(value) = &x {
                if let Some(folded) = fold_unary(kind, value, self.options.domain_policy) {
                    debug!("folded {} over a literal of shape {:?}", kind, value.shape());
                    return self.constant(folded, name);
                }
            }
        }

        let x = self.operand(x)?;
        self.add(NodeRequest::new(kind).inputs(&[x]).name(name))
    }

    /// A node whose operands are passed to the engine in the given order
    pub(crate) fn nary(&mut self, kind: OpKind, operands: Vec<Operand>, name: Option<&str>) -> Result<NodeId> {
        let mut inputs = Vec::with_capacity(operands.len());
        for operand in operands {
            inputs.push(self.operand(operand)?);
        }
        self.add(NodeRequest::new(kind).inputs(&inputs).name(name))
    }
}
