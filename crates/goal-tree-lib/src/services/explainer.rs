//! Backward explanation of a hypothesis.
//!
//! Walks from the hypothesis towards the facts and numbers every derived
//! proposition it meets. A proposition reached a second time is referenced
//! by its existing number instead of being expanded again, so shared
//! sub-derivations appear once. Nothing is checked against a fact set: the
//! trace shows the structure of the rules, not whether they fire.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use crate::error::{GoalTreeError, GoalTreeResult};
use crate::models::{render_text, GoalGraph, NodeId, Operand, Step};

pub struct BackwardExplainer;

impl BackwardExplainer {
    /// Numbered steps explaining `label`, ordered by step index. The
    /// hypothesis itself is step 1; a primitive fact yields no steps.
    pub fn explain(graph: &GoalGraph, label: &str) -> GoalTreeResult<Vec<Step>> {
        let root = graph.require(label)?;
        if let Some(on_cycle) = graph.find_cycle_from(root) {
            return Err(GoalTreeError::CyclicDerivation(graph.label(on_cycle).to_string()));
        }
        if graph.node(root).is_fact() {
            return Ok(Vec::new());
        }

        let mut assigned: HashMap<NodeId, usize> = HashMap::new();
        let mut expanded: HashSet<NodeId> = HashSet::new();
        let mut next_index = 1;
        let mut steps = Vec::new();

        assigned.insert(root, next_index);
        next_index += 1;
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !expanded.insert(id) {
                continue;
            }
            let node = graph.node(id);
            let mut alternatives = Vec::with_capacity(node.or_set().len());
            let mut discovered = Vec::new();

            for and_set in node.or_set() {
                let mut operands = Vec::with_capacity(and_set.len());
                for &member in and_set {
                    let member_label = graph.label(member).to_string();
                    if graph.node(member).is_fact() {
                        operands.push(Operand::Literal { label: member_label });
                        continue;
                    }
                    let index = *assigned.entry(member).or_insert_with(|| {
                        let index = next_index;
                        next_index += 1;
                        index
                    });
                    if !expanded.contains(&member) {
                        discovered.push(member);
                    }
                    operands.push(Operand::Step { index, label: member_label });
                }
                alternatives.push(operands);
            }

            // Reverse so the first-discovered child is expanded first
            stack.extend(discovered.into_iter().rev());
            steps.push(Step::new(assigned[&id], node.label().to_string(), alternatives));
        }

        steps.sort_by_key(|s| s.index);
        tracing::debug!(hypothesis = label, steps = steps.len(), "explanation built");
        Ok(steps)
    }
}

/// Receives a finished explanation for display
pub trait ExplanationSink {
    fn receive(&mut self, hypothesis: &str, steps: &[Step]) -> io::Result<()>;
}

/// Writes the plain-text rendering to any writer
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ExplanationSink for TextSink<W> {
    fn receive(&mut self, hypothesis: &str, steps: &[Step]) -> io::Result<()> {
        if steps.is_empty() {
            writeln!(self.out, "'{}' is a primitive fact; nothing to derive.", hypothesis)
        } else {
            writeln!(self.out, "{}", render_text(steps))
        }
    }
}
