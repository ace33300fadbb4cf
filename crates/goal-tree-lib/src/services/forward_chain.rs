//! Forward chaining: the closure of a fact set under the graph's rules.
//!
//! A node is derived as soon as every member of one of its AND-sets is
//! known. Passes over the whole graph repeat until one adds nothing, so the
//! result does not depend on node order (only the number of passes does).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{AndSet, GoalGraph, NodeId};

/// A single derived proposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    pub label: String,
    /// 1-based pass in which the node was derived
    pub pass: usize,
    /// Labels of the AND-set that fired
    pub via: Vec<String>,
}

/// Derivation record of one forward-chaining run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainTrace {
    pub inferred: Vec<Inference>,
    pub passes: usize,
}

impl ChainTrace {
    pub fn labels(&self) -> BTreeSet<String> {
        self.inferred.iter().map(|i| i.label.clone()).collect()
    }
}

pub struct ForwardChainer;

impl ForwardChainer {
    /// Labels derivable from `facts` that are not themselves in `facts`.
    ///
    /// Labels in `facts` that name no node are accepted and ignored.
    pub fn chain(graph: &GoalGraph, facts: &BTreeSet<String>) -> BTreeSet<String> {
        let mut inferred = BTreeSet::new();
        run(graph, facts, |id, _, _| {
            inferred.insert(graph.label(id).to_string());
        });
        inferred
    }

    /// `facts` together with everything derivable from them
    pub fn closure(graph: &GoalGraph, facts: &BTreeSet<String>) -> BTreeSet<String> {
        let mut all = facts.clone();
        all.extend(Self::chain(graph, facts));
        all
    }

    /// Same result as [`chain`](Self::chain), with the pass and AND-set
    /// behind each inference
    pub fn chain_traced(graph: &GoalGraph, facts: &BTreeSet<String>) -> ChainTrace {
        let mut inferred = Vec::new();
        let passes = run(graph, facts, |id, pass, and_set| {
            inferred.push(Inference {
                label: graph.label(id).to_string(),
                pass,
                via: and_set.iter().map(|m| graph.label(*m).to_string()).collect(),
            });
        });
        ChainTrace { inferred, passes }
    }
}

/// Core fixpoint loop. Calls `on_infer` once per derived node and returns
/// the number of passes made (the last one adds nothing).
fn run<F>(graph: &GoalGraph, facts: &BTreeSet<String>, mut on_infer: F) -> usize
where
    F: FnMut(NodeId, usize, &AndSet),
{
    let mut known = vec![false; graph.len()];
    for label in facts {
        if let Some(id) = graph.id_of(label) {
            known[id.index()] = true;
        }
    }

    let mut pass = 0;
    loop {
        pass += 1;
        let mut applied = false;
        for (id, node) in graph.nodes() {
            if known[id.index()] {
                continue;
            }
            let fired = node
                .or_set()
                .iter()
                .find(|and_set| and_set.iter().all(|m| known[m.index()]));
            if let Some(and_set) = fired {
                known[id.index()] = true;
                applied = true;
                on_infer(id, pass, and_set);
            }
        }
        if !applied {
            break;
        }
    }

    tracing::trace!(facts = facts.len(), passes = pass, "forward chain reached fixpoint");
    pass
}
