use std::collections::HashMap;

use log::debug;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Node, NodeId};

/// Arena of node descriptors
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    #[serde(skip)]
    names: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.node(id)
            .ok_or_else(|| Error::InvalidGraph(format!("node {} does not exist", id)))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.names.get(name).and_then(|id| self.node(*id))
    }

    /// The id the next appended node will get
    pub(crate) fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// Append a node. Its id must be [`Graph::next_id`], its inputs must exist
    /// and its name must be unused.
    pub(crate) fn push(&mut self, node: Node) -> Result<NodeId> {
        let id = self.next_id();
        if node.id != id {
            return Err(Error::InvalidGraph(format!(
                "node id {} does not match the next slot {}",
                node.id, id
            )));
        }

        for input in &node.inputs {
            if input.0 >= self.nodes.len() {
                return Err(Error::InvalidGraph(format!(
                    "node {} refers to missing input {}",
                    node.display_name(),
                    input
                )));
            }
        }

        if let Some(name) = &node.name {
            if self.names.contains_key(name) {
                return Err(Error::InvalidGraph(format!("node name '{}' is already in use", name)));
            }
            self.names.insert(name.clone(), id);
        }

        debug!(
            "added {} node {} with inputs {:?}",
            node.engine_name(),
            node.display_name(),
            node.inputs
        );
        self.nodes.push(node);
        Ok(id)
    }

    fn to_petgraph(&self) -> DiGraph<NodeId, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.nodes.len());
        let indices: Vec<NodeIndex> = self.nodes.iter().map(|n| graph.add_node(n.id)).collect();
        for node in &self.nodes {
            for input in &node.inputs {
                graph.add_edge(indices[input.0], indices[node.id.0], ());
            }
        }
        graph
    }

    /// Node ids ordered so that every node follows its inputs
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let graph = self.to_petgraph();
        let order = toposort(&graph, None).map_err(|cycle| {
            Error::InvalidGraph(format!("graph contains a cycle through node {}", graph[cycle.node_id()]))
        })?;
        Ok(order.into_iter().map(|i| graph[i]).collect())
    }

    /// Nodes whose output no other node consumes
    pub fn outputs(&self) -> Vec<NodeId> {
        let mut consumed = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for input in &node.inputs {
                consumed[input.0] = true;
            }
        }
        self.nodes
            .iter()
            .filter(|n| !consumed[n.id.0])
            .map(|n| n.id)
            .collect()
    }

    /// JSON description of the descriptors, for inspection
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OpKind;
    use std::collections::BTreeMap;

    fn node(id: usize, kind: OpKind, inputs: &[usize], name: Option<&str>) -> Node {
        Node {
            id: NodeId(id),
            name: name.map(str::to_string),
            kind,
            inputs: inputs.iter().map(|&i| NodeId(i)).collect(),
            attributes: BTreeMap::new(),
            host_shape: None,
        }
    }

    #[test]
    fn test_push_and_lookup() {
        let mut graph = Graph::new();
        graph.push(node(0, OpKind::Input, &[], Some("x"))).unwrap();
        graph.push(node(1, OpKind::Relu, &[0], None)).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.find_by_name("x").unwrap().id, NodeId(0));
        assert_eq!(graph.get(NodeId(1)).unwrap().display_name(), "node_1");
        assert!(graph.get(NodeId(2)).is_err());
    }

    #[test]
    fn test_push_rejects_bad_nodes() {
        let mut graph = Graph::new();
        graph.push(node(0, OpKind::Input, &[], Some("x"))).unwrap();

        assert!(matches!(
            graph.push(node(1, OpKind::Input, &[], Some("x"))),
            Err(Error::InvalidGraph(_))
        ));
        assert!(matches!(
            graph.push(node(1, OpKind::Relu, &[5], None)),
            Err(Error::InvalidGraph(_))
        ));
        assert!(matches!(
            graph.push(node(7, OpKind::Relu, &[0], None)),
            Err(Error::InvalidGraph(_))
        ));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_topological_order_and_outputs() {
        let mut graph = Graph::new();
        graph.push(node(0, OpKind::Input, &[], None)).unwrap();
        graph.push(node(1, OpKind::Parameter, &[], None)).unwrap();
        graph.push(node(2, OpKind::Times, &[1, 0], None)).unwrap();
        graph.push(node(3, OpKind::Relu, &[2], None)).unwrap();

        let order = graph.topological_order().unwrap();
        let position = |id: usize| order.iter().position(|n| *n == NodeId(id)).unwrap();
        assert!(position(0) < position(2));
        assert!(position(1) < position(2));
        assert!(position(2) < position(3));

        assert_eq!(graph.outputs(), vec![NodeId(3)]);
    }

    #[test]
    fn test_json_description() {
        let mut graph = Graph::new();
        graph.push(node(0, OpKind::Input, &[], Some("features"))).unwrap();
        let json = graph.to_json().unwrap();
        assert!(json.contains("\"features\""));
        assert!(json.contains("\"Input\""));
    }
}
