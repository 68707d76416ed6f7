// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the circuit model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Palette category a kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindCategory {
    /// Toggleable constant sources
    Input,
    /// Logic gates
    Gate,
    /// Terminal display sinks
    Output,
}

/// The kind of a circuit element, fixing its input arity and truth function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    /// Constant source, initially 0
    Const0,
    /// Constant source, initially 1
    Const1,
    /// Negation of the single input
    Not,
    /// Conjunction of both inputs
    And,
    /// Disjunction of both inputs
    Or,
    /// Negated conjunction
    Nand,
    /// Negated disjunction
    Nor,
    /// Inequality of both inputs
    Xor,
    /// Equality of both inputs
    Xnor,
    /// Terminal sink, displays its single input
    Output,
}

impl GateKind {
    /// Every kind, in palette order
    pub const ALL: [GateKind; 10] = [
        GateKind::Const0,
        GateKind::Const1,
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Not,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::Output,
    ];

    /// Number of declared input ports
    pub fn input_arity(&self) -> usize {
        match self {
            Self::Const0 | Self::Const1 => 0,
            Self::Not | Self::Output => 1,
            Self::And | Self::Or | Self::Nand | Self::Nor | Self::Xor | Self::Xnor => 2,
        }
    }

    /// Whether this kind is a user-toggleable constant source
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Const0 | Self::Const1)
    }

    /// Whether this kind produces a signal other nodes may consume.
    ///
    /// Output sinks terminate a path and can never be a connection source.
    pub fn is_source(&self) -> bool {
        !matches!(self, Self::Output)
    }

    /// Stored value a freshly placed node of this kind starts with
    pub fn initial_value(&self) -> bool {
        matches!(self, Self::Const1)
    }

    /// Apply this kind's truth function.
    ///
    /// `inputs` must hold exactly [`Self::input_arity`] values, ordered by
    /// port index. Constants ignore it and yield their nominal value.
    pub fn apply(&self, inputs: &[bool]) -> bool {
        match self {
            Self::Const0 => false,
            Self::Const1 => true,
            Self::Not => !inputs[0],
            Self::And => inputs[0] && inputs[1],
            Self::Or => inputs[0] || inputs[1],
            Self::Nand => !(inputs[0] && inputs[1]),
            Self::Nor => !(inputs[0] || inputs[1]),
            Self::Xor => inputs[0] != inputs[1],
            Self::Xnor => inputs[0] == inputs[1],
            Self::Output => inputs[0],
        }
    }

    /// Palette category
    pub fn category(&self) -> KindCategory {
        match self {
            Self::Const0 | Self::Const1 => KindCategory::Input,
            Self::Output => KindCategory::Output,
            _ => KindCategory::Gate,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Const0 => "0",
            Self::Const1 => "1",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Xnor => "XNOR",
            Self::Output => "OUT",
        }
    }

    /// Block color for the UI layer
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Const0 => [127, 140, 141],
            Self::Const1 => [22, 160, 133],
            Self::Not => [46, 204, 113],
            Self::And => [41, 128, 185],
            Self::Or => [230, 126, 34],
            Self::Nand => [211, 84, 0],
            Self::Nor => [142, 68, 173],
            Self::Xor => [243, 156, 18],
            Self::Xnor => [192, 57, 43],
            Self::Output => [189, 195, 199],
        }
    }
}

/// A placed circuit element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Element kind
    pub kind: GateKind,
    /// Current value of a constant source; unused for other kinds
    pub stored_value: bool,
}

impl Node {
    /// Create a new node of the given kind
    pub fn new(kind: GateKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            stored_value: kind.initial_value(),
        }
    }
}
