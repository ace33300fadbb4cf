use serde::{Deserialize, Serialize};
use std::fmt;

/// How the direct antecedents of a step combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combinator {
    /// A single derivation: all operands are needed
    And,
    /// Several alternative derivations: any one suffices
    Or,
}

/// Word placed after an operand when a step is read out as a flat list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Joiner {
    And,
    Or,
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Joiner::And => write!(f, "and"),
            Joiner::Or => write!(f, "or"),
        }
    }
}

/// One antecedent inside a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operand {
    /// A primitive fact, referenced by label only
    Literal { label: String },
    /// A derived proposition, explained by the step with this index
    Step { index: usize, label: String },
}

impl Operand {
    pub fn label(&self) -> &str {
        match self {
            Operand::Literal { label } => label,
            Operand::Step { label, .. } => label,
        }
    }

    pub fn step_index(&self) -> Option<usize> {
        match self {
            Operand::Literal { .. } => None,
            Operand::Step { index, .. } => Some(*index),
        }
    }

    pub fn display_string(&self) -> String {
        match self {
            Operand::Literal { label } => label.clone(),
            Operand::Step { index, label } => format!("{} ({})", label, index),
        }
    }
}

/// One numbered step of a backward explanation: a derived proposition and
/// the alternative AND-sets that establish it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub label: String,
    pub combinator: Combinator,
    /// One entry per AND-set, in rule order
    pub alternatives: Vec<Vec<Operand>>,
}

impl Step {
    pub fn new(index: usize, label: String, alternatives: Vec<Vec<Operand>>) -> Self {
        let combinator = if alternatives.len() > 1 {
            Combinator::Or
        } else {
            Combinator::And
        };
        Self {
            index,
            label,
            combinator,
            alternatives,
        }
    }

    /// Operands as a flat list, each paired with the word that follows it:
    /// `and` inside an AND-set, `or` between AND-sets, nothing after the last.
    pub fn children(&self) -> Vec<(&Operand, Option<Joiner>)> {
        let mut out = Vec::new();
        let alt_count = self.alternatives.len();
        for (alt_idx, and_set) in self.alternatives.iter().enumerate() {
            for (i, operand) in and_set.iter().enumerate() {
                let joiner = if i + 1 < and_set.len() {
                    Some(Joiner::And)
                } else if alt_idx + 1 < alt_count {
                    Some(Joiner::Or)
                } else {
                    None
                };
                out.push((operand, joiner));
            }
        }
        out
    }

    /// Indices of the steps this one refers to
    pub fn referenced_steps(&self) -> Vec<usize> {
        let mut refs: Vec<usize> = self
            .alternatives
            .iter()
            .flatten()
            .filter_map(Operand::step_index)
            .collect();
        refs.sort_unstable();
        refs.dedup();
        refs
    }
}

/// Plain-text rendering of an explanation trace
pub fn render_text(steps: &[Step]) -> String {
    let mut lines = Vec::new();
    for step in steps {
        lines.push(format!("({}) {}", step.index, step.label));
        for (alt_idx, and_set) in step.alternatives.iter().enumerate() {
            if alt_idx > 0 {
                lines.push("  or".to_string());
            }
            let parts: Vec<String> = and_set.iter().map(Operand::display_string).collect();
            lines.push(format!("  - {}", parts.join(" and ")));
        }
    }
    lines.join("\n")
}
