//! Read-only views of a goal graph for display and external tools.

use serde::{Deserialize, Serialize};

use crate::models::{GoalGraph, NodeId, NodeKind};

/// One node as exported: labels instead of ids so the output stands alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExport {
    pub label: String,
    pub kind: NodeKind,
    /// Alternative AND-sets, each a sorted list of labels
    pub or_set: Vec<Vec<String>>,
    pub parents: Vec<String>,
}

/// Serializable snapshot of a whole graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub facts: usize,
    pub hypotheses: usize,
    pub rules: usize,
}

impl GraphExport {
    pub fn from_graph(graph: &GoalGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|(_, node)| NodeExport {
                label: node.label().to_string(),
                kind: node.kind(),
                or_set: node
                    .or_set()
                    .iter()
                    .map(|and_set| sorted_labels(graph, and_set))
                    .collect(),
                parents: sorted_labels(graph, node.parents()),
            })
            .collect();

        Self {
            nodes,
            facts: graph.facts().count(),
            hypotheses: graph.hypotheses().count(),
            rules: graph.rule_nodes().count(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn sorted_labels<'a>(graph: &GoalGraph, ids: impl IntoIterator<Item = &'a NodeId>) -> Vec<String> {
    let mut labels: Vec<String> = ids.into_iter().map(|id| graph.label(*id).to_string()).collect();
    labels.sort();
    labels
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Graphviz rendering, antecedents on the left.
///
/// An AND-set with one member is a direct edge. Larger AND-sets meet in a
/// small junction node so alternatives stay visually separate.
pub fn to_dot(graph: &GoalGraph) -> String {
    let mut lines = vec![
        "digraph goals {".to_string(),
        "    rankdir=LR;".to_string(),
        "    node [fontname=\"Helvetica\"];".to_string(),
    ];

    for (id, node) in graph.nodes() {
        let shape = match node.kind() {
            NodeKind::Fact => "ellipse",
            NodeKind::Rule => "box",
            NodeKind::Hypothesis => "doubleoctagon",
        };
        lines.push(format!(
            "    n{} [label=\"{}\", shape={}];",
            id.index(),
            escape(node.label()),
            shape
        ));
    }

    for (id, node) in graph.nodes() {
        for (alt, and_set) in node.or_set().iter().enumerate() {
            if and_set.len() == 1 {
                for member in and_set {
                    lines.push(format!("    n{} -> n{};", member.index(), id.index()));
                }
                continue;
            }
            let junction = format!("and{}_{}", id.index(), alt);
            lines.push(format!(
                "    {} [label=\"AND\", shape=circle, width=0.3, fontsize=8];",
                junction
            ));
            for member in and_set {
                lines.push(format!("    n{} -> {} [arrowhead=none];", member.index(), junction));
            }
            lines.push(format!("    {} -> n{};", junction, id.index()));
        }
    }

    lines.push("}".to_string());
    lines.join("\n") + "\n"
}

/// Plain listing grouped by kind, one derivation per line
pub fn display(graph: &GoalGraph) -> String {
    let sections = [
        (NodeKind::Hypothesis, "Hypotheses"),
        (NodeKind::Rule, "Intermediate conclusions"),
        (NodeKind::Fact, "Facts"),
    ];

    let mut lines = Vec::new();
    for (kind, title) in sections {
        let mut ids: Vec<_> = graph.of_kind(kind).collect();
        ids.sort_by_key(|id| graph.label(*id));
        lines.push(format!("{} ({}):", title, ids.len()));
        for id in ids {
            let node = graph.node(id);
            lines.push(format!("  {}", node.label()));
            for and_set in node.or_set() {
                let members: Vec<&str> = and_set.iter().map(|m| graph.label(*m)).collect();
                lines.push(format!("    <- {}", members.join(" AND ")));
            }
        }
        lines.push(String::new());
    }
    lines.join("\n") + "\n"
}
