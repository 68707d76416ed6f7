// SPDX-License-Identifier: MIT OR Apache-2.0
//! Circuit evaluation.
//!
//! Values are resolved recursively with memoization: a node is computed at
//! most once per pass no matter how widely its output fans out. An
//! in-progress set guards the descent, so feedback wiring terminates and
//! surfaces as unresolved nodes instead of unbounded recursion.

use crate::graph::Snapshot;
use crate::node::NodeId;
use std::collections::{HashMap, HashSet};

/// Result of evaluating a circuit snapshot.
///
/// Every node of the snapshot ends up either resolved to a boolean or in
/// the unresolved set, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    values: HashMap<NodeId, bool>,
    unresolved: HashSet<NodeId>,
}

impl EvaluationResult {
    /// Resolved value of a node, if it has one
    pub fn value(&self, node_id: NodeId) -> Option<bool> {
        self.values.get(&node_id).copied()
    }

    /// Whether the node could not be resolved this pass
    pub fn is_unresolved(&self, node_id: NodeId) -> bool {
        self.unresolved.contains(&node_id)
    }

    /// All resolved values by node id
    pub fn values(&self) -> &HashMap<NodeId, bool> {
        &self.values
    }

    /// Nodes with no resolvable value: a required input port is unwired,
    /// or the node sits on (or depends only on) a dependency cycle
    pub fn unresolved(&self) -> &HashSet<NodeId> {
        &self.unresolved
    }
}

/// Evaluate every node of a snapshot.
///
/// Pure with respect to the snapshot: the same input always yields the
/// same result, and nothing is carried over between passes.
pub fn evaluate(snapshot: &Snapshot) -> EvaluationResult {
    let mut ctx = EvaluationContext::new(snapshot);
    for node_id in snapshot.node_ids() {
        ctx.resolve(node_id);
    }
    tracing::debug!(
        "evaluated {} node(s), {} unresolved",
        snapshot.node_count(),
        ctx.unresolved.len()
    );
    EvaluationResult {
        values: ctx.resolved,
        unresolved: ctx.unresolved,
    }
}

/// Working state for one evaluation pass
struct EvaluationContext<'a> {
    snapshot: &'a Snapshot,
    /// Source node driving each (target, input port), indexed up front
    sources: HashMap<(NodeId, usize), NodeId>,
    resolved: HashMap<NodeId, bool>,
    unresolved: HashSet<NodeId>,
    in_progress: HashSet<NodeId>,
}

impl<'a> EvaluationContext<'a> {
    fn new(snapshot: &'a Snapshot) -> Self {
        let sources = snapshot
            .connections()
            .map(|c| ((c.target, c.target_port), c.source))
            .collect();
        Self {
            snapshot,
            sources,
            resolved: HashMap::new(),
            unresolved: HashSet::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Resolve one node, memoized; `None` marks it unresolved
    fn resolve(&mut self, node_id: NodeId) -> Option<bool> {
        if let Some(&value) = self.resolved.get(&node_id) {
            return Some(value);
        }
        if self.unresolved.contains(&node_id) {
            return None;
        }
        if !self.in_progress.insert(node_id) {
            // Recursed back into a node still being computed: the node is
            // on a dependency cycle and can never settle.
            self.unresolved.insert(node_id);
            return None;
        }

        let value = self.compute(node_id);

        self.in_progress.remove(&node_id);
        match value {
            Some(v) => {
                self.resolved.insert(node_id, v);
            }
            None => {
                self.unresolved.insert(node_id);
            }
        }
        value
    }

    fn compute(&mut self, node_id: NodeId) -> Option<bool> {
        let node = self.snapshot.node(node_id)?;
        let kind = node.kind;
        if kind.is_constant() {
            return Some(node.stored_value);
        }

        // Inputs are read positionally by port index; an unwired port
        // leaves the node unresolved rather than defaulting to 0.
        let arity = kind.input_arity();
        let mut inputs = Vec::with_capacity(arity);
        for port in 0..arity {
            let source = *self.sources.get(&(node_id, port))?;
            inputs.push(self.resolve(source)?);
        }
        Some(kind.apply(&inputs))
    }
}
