use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{GoalTreeError, GoalTreeResult};
use super::rule::{clause_label, RuleSource};

/// Dense index of a node inside its [`GoalGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One conjunctive set of antecedents
pub type AndSet = BTreeSet<NodeId>;

/// How a node takes part in the graph. Derived from its edges, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// No antecedents: a primitive, askable fact
    Fact,
    /// Has antecedents and nothing depends on it: a final classification
    Hypothesis,
    /// Has antecedents and feeds other nodes: an intermediate conclusion
    Rule,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Fact => write!(f, "fact"),
            NodeKind::Hypothesis => write!(f, "hypothesis"),
            NodeKind::Rule => write!(f, "rule"),
        }
    }
}

/// A proposition in the goal graph
#[derive(Debug, Clone)]
pub struct Node {
    label: String,
    /// Alternative derivations, in the order their rules were added
    or_set: Vec<AndSet>,
    /// Nodes with an AND-set that contains this node
    parents: BTreeSet<NodeId>,
}

impl Node {
    fn new(label: String) -> Self {
        Self {
            label,
            or_set: Vec::new(),
            parents: BTreeSet::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn or_set(&self) -> &[AndSet] {
        &self.or_set
    }

    pub fn parents(&self) -> &BTreeSet<NodeId> {
        &self.parents
    }

    pub fn is_fact(&self) -> bool {
        self.or_set.is_empty()
    }

    pub fn kind(&self) -> NodeKind {
        if self.or_set.is_empty() {
            NodeKind::Fact
        } else if self.parents.is_empty() {
            NodeKind::Hypothesis
        } else {
            NodeKind::Rule
        }
    }

    /// Every node appearing in any AND-set
    pub fn children(&self) -> BTreeSet<NodeId> {
        self.or_set.iter().flatten().copied().collect()
    }
}

/// The proposition graph. Immutable once built; see [`GoalGraphBuilder`].
#[derive(Debug, Clone, Default)]
pub struct GoalGraph {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl GoalGraph {
    /// Build a graph from raw rules. Either every rule is accepted or no
    /// graph is returned.
    pub fn from_rules<R: RuleSource>(rules: &[R]) -> GoalTreeResult<Self> {
        let mut builder = GoalGraphBuilder::new();
        for (index, rule) in rules.iter().enumerate() {
            let consequent = clause_label(rule.consequent()).ok_or_else(|| {
                GoalTreeError::InvalidRule {
                    index,
                    reason: format!("empty consequent clause '{}'", rule.consequent()),
                }
            })?;
            let antecedents = rule
                .antecedents()
                .iter()
                .map(|clause| {
                    clause_label(clause).ok_or_else(|| GoalTreeError::InvalidRule {
                        index,
                        reason: format!("empty antecedent clause '{}'", clause),
                    })
                })
                .collect::<GoalTreeResult<Vec<_>>>()?;
            builder.add_rule(antecedents.as_slice(), &consequent)?;
        }
        let graph = builder.build();
        tracing::debug!(nodes = graph.len(), rules = rules.len(), "goal graph built");
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id_of(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Like [`id_of`](Self::id_of) but fails with `UnknownProposition`
    pub fn require(&self, label: &str) -> GoalTreeResult<NodeId> {
        self.id_of(label)
            .ok_or_else(|| GoalTreeError::UnknownProposition(label.to_string()))
    }

    /// Ids are only ever handed out by this graph, so indexing cannot miss.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.id_of(label).map(|id| self.node(id))
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id.0].label
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(move |&id| self.kind(id) == kind)
    }

    pub fn facts(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.of_kind(NodeKind::Fact)
    }

    pub fn hypotheses(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.of_kind(NodeKind::Hypothesis)
    }

    pub fn rule_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.of_kind(NodeKind::Rule)
    }

    /// Verify that `parents` is exactly the inverse of the AND-set edges.
    /// Returns a description of the first broken edge.
    pub fn check_integrity(&self) -> Result<(), String> {
        for (id, node) in self.nodes() {
            for member in node.or_set.iter().flatten() {
                if !self.node(*member).parents.contains(&id) {
                    return Err(format!(
                        "'{}' is an antecedent of '{}' but does not list it as a parent",
                        self.label(*member),
                        node.label
                    ));
                }
            }
            for parent in &node.parents {
                let referenced = self
                    .node(*parent)
                    .or_set
                    .iter()
                    .any(|and_set| and_set.contains(&id));
                if !referenced {
                    return Err(format!(
                        "'{}' lists '{}' as a parent but is not one of its antecedents",
                        node.label,
                        self.label(*parent)
                    ));
                }
            }
        }
        Ok(())
    }

    /// Depth-first search below `start` for a node that is reachable from
    /// itself. Returns the first node found on such a cycle.
    pub fn find_cycle_from(&self, start: NodeId) -> Option<NodeId> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.nodes.len()];
        // (node, its children, next child to visit)
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> = Vec::new();

        marks[start.0] = Mark::OnPath;
        stack.push((start, self.node(start).children().into_iter().collect(), 0));

        while let Some((node, children, next)) = stack.last_mut() {
            if *next == children.len() {
                marks[node.0] = Mark::Done;
                stack.pop();
                continue;
            }
            let child = children[*next];
            *next += 1;
            match marks[child.0] {
                Mark::OnPath => return Some(child),
                Mark::Done => {}
                Mark::Unseen => {
                    marks[child.0] = Mark::OnPath;
                    let grandchildren = self.node(child).children().into_iter().collect();
                    stack.push((child, grandchildren, 0));
                }
            }
        }

        None
    }
}

/// Mutable side of [`GoalGraph`]. All edge updates happen here, in both
/// directions at once.
#[derive(Debug, Default)]
pub struct GoalGraphBuilder {
    graph: GoalGraph,
    rules_added: usize,
}

impl GoalGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `antecedents -> consequent` as one AND-set of the consequent.
    ///
    /// Labels are used verbatim. Adding the same rule twice changes nothing.
    /// A rejected rule leaves the builder untouched.
    pub fn add_rule<S: AsRef<str>>(
        &mut self,
        antecedents: &[S],
        consequent: &str,
    ) -> GoalTreeResult<()> {
        let index = self.rules_added;
        if consequent.trim().is_empty() {
            return Err(GoalTreeError::InvalidRule {
                index,
                reason: "empty consequent".to_string(),
            });
        }
        if antecedents.is_empty() {
            return Err(GoalTreeError::InvalidRule {
                index,
                reason: format!("'{}' has no antecedents", consequent),
            });
        }
        if antecedents.iter().any(|a| a.as_ref().trim().is_empty()) {
            return Err(GoalTreeError::InvalidRule {
                index,
                reason: format!("'{}' has an empty antecedent", consequent),
            });
        }

        let consequent_id = self.intern(consequent);
        let and_set: AndSet = antecedents.iter().map(|a| self.intern(a.as_ref())).collect();

        for member in &and_set {
            self.graph.nodes[member.0].parents.insert(consequent_id);
        }
        let or_set = &mut self.graph.nodes[consequent_id.0].or_set;
        if !or_set.contains(&and_set) {
            or_set.push(and_set);
        }

        self.rules_added += 1;
        Ok(())
    }

    pub fn build(self) -> GoalGraph {
        self.graph
    }

    fn intern(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.graph.index.get(label) {
            return id;
        }
        let id = NodeId(self.graph.nodes.len());
        self.graph.nodes.push(Node::new(label.to_string()));
        self.graph.index.insert(label.to_string(), id);
        id
    }
}
