// SPDX-License-Identifier: MIT OR Apache-2.0
//! Circuit data structure containing nodes and connections.

use crate::connection::{Connection, ConnectionId};
use crate::evaluation::EvaluationResult;
use crate::node::{GateKind, Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A logic circuit: placed nodes plus the wires between them.
///
/// All mutations validate synchronously and leave the circuit untouched
/// when rejected, so the UI can surface the error and carry on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Circuit {
    /// Nodes in the circuit
    nodes: IndexMap<NodeId, Node>,
    /// Wires between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Circuit {
    /// Create a new empty circuit
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Place a new node of the given kind, returning its id
    pub fn add_node(&mut self, kind: GateKind) -> NodeId {
        let node = Node::new(kind);
        let id = node.id;
        tracing::debug!("placed {:?} node {:?}", kind, id);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and, atomically, every wire touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node, GraphError> {
        let node = self
            .nodes
            .swap_remove(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        self.connections.retain(|_, c| !c.involves_node(node_id));
        tracing::debug!("removed node {:?}", node_id);
        Ok(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Wire `source`'s output to input port `target_port` of `target`
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        target_port: usize,
    ) -> Result<ConnectionId, GraphError> {
        let source_node = self
            .nodes
            .get(&source)
            .ok_or(ConnectionError::NodeNotFound(source))?;
        let target_node = self
            .nodes
            .get(&target)
            .ok_or(ConnectionError::NodeNotFound(target))?;

        if source == target {
            return Err(ConnectionError::SelfLoop.into());
        }

        if !source_node.kind.is_source() {
            return Err(ConnectionError::OutputAsSource(source).into());
        }

        let arity = target_node.kind.input_arity();
        if target_port >= arity {
            return Err(ConnectionError::PortOutOfRange {
                kind: target_node.kind,
                arity,
                port: target_port,
            }
            .into());
        }

        // One wire per input port; output ports fan out freely.
        if self
            .connections
            .values()
            .any(|c| c.feeds_port(target, target_port))
        {
            return Err(ConnectionError::PortAlreadyConnected {
                node: target,
                port: target_port,
            }
            .into());
        }

        let connection = Connection::new(source, target, target_port);
        let id = connection.id;
        tracing::debug!(
            "wired {:?} -> {:?} port {}",
            source,
            target,
            target_port
        );
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Remove the wire from `source` to `target`.
    ///
    /// When one output feeds several input ports of the same target, the
    /// earliest-created wire is removed.
    pub fn disconnect(
        &mut self,
        source: NodeId,
        target: NodeId,
    ) -> Result<Connection, GraphError> {
        let id = self
            .connections
            .values()
            .find(|c| c.source == source && c.target == target)
            .map(|c| c.id)
            .ok_or(GraphError::ConnectionNotFound { source_node: source, target })?;
        tracing::debug!("unwired {:?} -> {:?}", source, target);
        self.connections
            .shift_remove(&id)
            .ok_or(GraphError::ConnectionNotFound { source_node: source, target })
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .values()
            .filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Flip the stored value of a constant source, returning the new value
    pub fn toggle_constant(&mut self, node_id: NodeId) -> Result<bool, GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        if !node.kind.is_constant() {
            return Err(GraphError::InvalidOperation(node.kind));
        }
        node.stored_value = !node.stored_value;
        tracing::debug!("toggled {:?} to {}", node_id, node.stored_value);
        Ok(node.stored_value)
    }

    /// Take an immutable copy of the current node and connection sets.
    ///
    /// The copy keeps an evaluation isolated from later mutations, which
    /// also makes the mutate/evaluate boundary safe off the UI thread.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Evaluate the circuit as it currently stands
    pub fn evaluate(&self) -> EvaluationResult {
        crate::evaluation::evaluate(&self.snapshot())
    }
}

/// An immutable view of a circuit's nodes and connections, taken at the
/// start of an evaluation
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: IndexMap<NodeId, Node>,
    connections: IndexMap<ConnectionId, Connection>,
}

impl Snapshot {
    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all node IDs, in placement order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Error from a circuit mutation
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// No such wire between the two nodes
    #[error("no connection from {source_node:?} to {target:?}")]
    ConnectionNotFound {
        /// Driving node of the missing wire
        source_node: NodeId,
        /// Receiving node of the missing wire
        target: NodeId,
    },

    /// A wiring rule was violated
    #[error("invalid connection: {0}")]
    InvalidConnection(#[from] ConnectionError),

    /// Operation not applicable to the node's kind
    #[error("operation not supported for {0:?} nodes")]
    InvalidOperation(GateKind),
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Self-loop not allowed
    #[error("a node cannot be wired to itself")]
    SelfLoop,

    /// Output sinks terminate a signal path
    #[error("output node {0:?} cannot drive other nodes")]
    OutputAsSource(NodeId),

    /// Port index exceeds the target kind's declared arity
    #[error("{kind:?} nodes declare {arity} input port(s), got index {port}")]
    PortOutOfRange {
        /// Kind of the receiving node
        kind: GateKind,
        /// Declared input arity of that kind
        arity: usize,
        /// Rejected port index
        port: usize,
    },

    /// Input port already has an incoming wire
    #[error("input port {port} of node {node:?} is already connected")]
    PortAlreadyConnected {
        /// Receiving node
        node: NodeId,
        /// Occupied port index
        port: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_then_disconnect() {
        let mut circuit = Circuit::new();
        let one = circuit.add_node(GateKind::Const1);
        let not = circuit.add_node(GateKind::Not);

        let id = circuit.connect(one, not, 0).unwrap();
        assert_eq!(circuit.connection_count(), 1);
        assert!(circuit.connection(id).is_some());

        let removed = circuit.disconnect(one, not).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(circuit.connection_count(), 0);

        let err = circuit.disconnect(one, not).unwrap_err();
        assert!(matches!(err, GraphError::ConnectionNotFound { .. }));
    }

    #[test]
    fn rejects_self_loops() {
        let mut circuit = Circuit::new();
        let not = circuit.add_node(GateKind::Not);
        let err = circuit.connect(not, not, 0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::SelfLoop)
        ));
    }

    #[test]
    fn rejects_output_as_source() {
        let mut circuit = Circuit::new();
        let out = circuit.add_node(GateKind::Output);
        let not = circuit.add_node(GateKind::Not);
        let err = circuit.connect(out, not, 0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::OutputAsSource(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_ports() {
        let mut circuit = Circuit::new();
        let one = circuit.add_node(GateKind::Const1);
        let not = circuit.add_node(GateKind::Not);
        let err = circuit.connect(one, not, 1).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::PortOutOfRange { .. })
        ));

        // Constants declare no input ports at all.
        let zero = circuit.add_node(GateKind::Const0);
        let err = circuit.connect(one, zero, 0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::PortOutOfRange { arity: 0, .. })
        ));
    }

    #[test]
    fn rejects_a_second_wire_into_an_occupied_port() {
        let mut circuit = Circuit::new();
        let a = circuit.add_node(GateKind::Const1);
        let b = circuit.add_node(GateKind::Const0);
        let and = circuit.add_node(GateKind::And);

        circuit.connect(a, and, 0).unwrap();
        let err = circuit.connect(b, and, 0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::PortAlreadyConnected { port: 0, .. })
        ));

        // The other port is still free.
        circuit.connect(b, and, 1).unwrap();
        assert_eq!(circuit.connection_count(), 2);
    }

    #[test]
    fn rejects_unknown_endpoints() {
        let mut circuit = Circuit::new();
        let not = circuit.add_node(GateKind::Not);
        let ghost = NodeId::new();

        let err = circuit.connect(ghost, not, 0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::NodeNotFound(id)) if id == ghost
        ));
        let err = circuit.connect(not, ghost, 0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidConnection(ConnectionError::NodeNotFound(_))
        ));
        let err = circuit.remove_node(ghost).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(_)));
    }

    #[test]
    fn one_output_fans_out_to_many_ports() {
        let mut circuit = Circuit::new();
        let one = circuit.add_node(GateKind::Const1);
        let and = circuit.add_node(GateKind::And);
        let not = circuit.add_node(GateKind::Not);

        circuit.connect(one, and, 0).unwrap();
        circuit.connect(one, and, 1).unwrap();
        circuit.connect(one, not, 0).unwrap();
        assert_eq!(circuit.connection_count(), 3);
    }

    #[test]
    fn removing_a_node_removes_every_incident_wire() {
        let mut circuit = Circuit::new();
        let a = circuit.add_node(GateKind::Const1);
        let b = circuit.add_node(GateKind::Const1);
        let and = circuit.add_node(GateKind::And);
        let out = circuit.add_node(GateKind::Output);

        circuit.connect(a, and, 0).unwrap();
        circuit.connect(b, and, 1).unwrap();
        circuit.connect(and, out, 0).unwrap();
        assert_eq!(circuit.connection_count(), 3);

        circuit.remove_node(and).unwrap();
        assert_eq!(circuit.node_count(), 3);
        assert_eq!(circuit.connection_count(), 0);
    }

    #[test]
    fn toggling_applies_to_constants_only() {
        let mut circuit = Circuit::new();
        let one = circuit.add_node(GateKind::Const1);
        let and = circuit.add_node(GateKind::And);

        assert!(!circuit.toggle_constant(one).unwrap());
        assert!(!circuit.node(one).unwrap().stored_value);
        assert!(circuit.toggle_constant(one).unwrap());

        let err = circuit.toggle_constant(and).unwrap_err();
        assert!(matches!(err, GraphError::InvalidOperation(GateKind::And)));

        let err = circuit.toggle_constant(NodeId::new()).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(_)));
    }

    #[test]
    fn rejected_mutations_leave_the_circuit_unchanged() {
        let mut circuit = Circuit::new();
        let one = circuit.add_node(GateKind::Const1);
        let not = circuit.add_node(GateKind::Not);
        circuit.connect(one, not, 0).unwrap();

        let zero = circuit.add_node(GateKind::Const0);
        assert!(circuit.connect(zero, not, 0).is_err());
        assert!(circuit.connect(zero, not, 5).is_err());
        assert!(circuit.remove_node(NodeId::new()).is_err());

        assert_eq!(circuit.node_count(), 3);
        assert_eq!(circuit.connection_count(), 1);
    }

    #[test]
    fn serialization() {
        let mut circuit = Circuit::new();
        let one = circuit.add_node(GateKind::Const1);
        let not = circuit.add_node(GateKind::Not);
        circuit.connect(one, not, 0).unwrap();

        let ron_str =
            ron::ser::to_string_pretty(&circuit, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Circuit = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.connection_count(), 1);
        assert_eq!(loaded.evaluate(), circuit.evaluate());
    }
}
