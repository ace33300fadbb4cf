use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{GoalTreeError, GoalTreeResult};
use crate::models::{GoalGraph, NodeId};

/// Every fact that appears in any derivation of `label`.
///
/// This is the union over all alternative AND-sets, not the facts of one
/// proof: it answers which facts could ever matter to the node. A fact is
/// its own only requirement.
pub fn required_facts(graph: &GoalGraph, label: &str) -> GoalTreeResult<BTreeSet<String>> {
    let root = graph.require(label)?;
    let mut collector = Collector {
        graph,
        visiting: HashSet::new(),
        memo: HashMap::new(),
    };
    let ids = collector.collect(root)?;
    Ok(ids.iter().map(|id| graph.label(*id).to_string()).collect())
}

struct Collector<'a> {
    graph: &'a GoalGraph,
    /// Nodes on the current descent path
    visiting: HashSet<NodeId>,
    /// Finished sub-results, shared between AND-sets and alternatives
    memo: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl Collector<'_> {
    fn collect(&mut self, id: NodeId) -> GoalTreeResult<BTreeSet<NodeId>> {
        if let Some(done) = self.memo.get(&id) {
            return Ok(done.clone());
        }
        let node = self.graph.node(id);
        if node.is_fact() {
            return Ok(BTreeSet::from([id]));
        }
        if !self.visiting.insert(id) {
            return Err(GoalTreeError::CyclicDerivation(node.label().to_string()));
        }

        let mut facts = BTreeSet::new();
        for member in node.or_set().iter().flatten() {
            facts.extend(self.collect(*member)?);
        }

        self.visiting.remove(&id);
        self.memo.insert(id, facts.clone());
        Ok(facts)
    }
}
