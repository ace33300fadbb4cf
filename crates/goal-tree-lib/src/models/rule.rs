use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GoalTreeError, GoalTreeResult};
use super::graph::GoalGraph;

/// Anything that can be read as one IF/THEN rule.
///
/// Clauses are raw strings of the form `"<quantifier> <proposition>"`,
/// e.g. `"(?x) has hair"`.
pub trait RuleSource {
    /// The single consequent clause
    fn consequent(&self) -> &str;
    /// The antecedent clauses, all of which must hold together
    fn antecedents(&self) -> &[String];
}

/// A plain IF (antecedents) THEN (consequent) rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub antecedents: Vec<String>,
    pub consequent: String,
}

impl Rule {
    pub fn new(antecedents: &[&str], consequent: &str) -> Self {
        Self {
            antecedents: antecedents.iter().map(|a| a.to_string()).collect(),
            consequent: consequent.to_string(),
        }
    }
}

impl RuleSource for Rule {
    fn consequent(&self) -> &str {
        &self.consequent
    }

    fn antecedents(&self) -> &[String] {
        &self.antecedents
    }
}

/// Turn a raw clause into a proposition label by dropping the leading
/// quantifier token. Remaining tokens are re-joined with single spaces.
///
/// Returns `None` when nothing is left after the quantifier.
pub fn clause_label(clause: &str) -> Option<String> {
    let rest: Vec<&str> = clause.split_whitespace().skip(1).collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

/// A named collection of rules together with the groups of facts that
/// exclude each other. Groups hold labels, not raw clauses; at most one
/// member of a group holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub name: String,
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub exclusive_groups: Vec<Vec<String>>,
}

impl RuleSet {
    pub fn from_json_str(json: &str) -> GoalTreeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GoalTreeError::RuleFile(format!("invalid rule set JSON: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> GoalTreeResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            GoalTreeError::RuleFile(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut set = Self::from_json_str(&json)?;
        if set.name.is_empty() {
            set.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(set)
    }

    /// Build the goal graph for these rules
    pub fn graph(&self) -> GoalTreeResult<GoalGraph> {
        GoalGraph::from_rules(&self.rules)
    }
}
