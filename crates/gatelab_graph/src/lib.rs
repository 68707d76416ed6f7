// SPDX-License-Identifier: MIT OR Apache-2.0
//! Circuit graph model and evaluation engine for `GateLab`.
//!
//! This crate is the logic core behind the visual gate builder. The UI layer
//! places blocks, drags wires between them, and renders whatever an
//! evaluation reports back; none of that lives here. The core holds:
//! - plain-data nodes and connections with stable ids
//! - a mutable [`Circuit`] that rejects invalid wiring synchronously
//! - a pure evaluation pass producing a per-node boolean (or marking the
//!   node unresolved when its inputs are missing or cyclic)
//!
//! ## Architecture
//!
//! Evaluation is memoized recursive resolution over an immutable
//! [`Snapshot`], so a source fanning out to many targets is computed once
//! and feedback loops terminate instead of recursing forever.

pub mod node;
pub mod connection;
pub mod graph;
pub mod evaluation;

pub use node::{GateKind, KindCategory, Node, NodeId};
pub use connection::{Connection, ConnectionId};
pub use graph::{Circuit, ConnectionError, GraphError, Snapshot};
pub use evaluation::{evaluate, EvaluationResult};
