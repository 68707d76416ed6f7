// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (wire) definitions for the circuit.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed wire from a node's output to another node's input port.
///
/// Every non-sink node has exactly one output port, so the source side
/// needs no port index; the target side is addressed positionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Driving node
    pub source: NodeId,
    /// Receiving node
    pub target: NodeId,
    /// Input port index on the receiving node
    pub target_port: usize,
}

impl Connection {
    /// Create a new connection
    pub fn new(source: NodeId, target: NodeId, target_port: usize) -> Self {
        Self {
            id: ConnectionId::new(),
            source,
            target,
            target_port,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Check if this connection terminates at the given input port
    pub fn feeds_port(&self, node_id: NodeId, port: usize) -> bool {
        self.target == node_id && self.target_port == port
    }
}
