use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::graph::{GoalGraph, NodeKind};

/// Label sets tracked during one question session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Facts confirmed by the oracle. Only grows.
    pub known_facts: BTreeSet<String>,
    /// Facts that have been asked about, whatever the answer
    pub asked_facts: BTreeSet<String>,
    /// Facts still worth asking about. Only shrinks.
    pub possible_facts: BTreeSet<String>,
    /// Hypotheses not yet ruled out. Only shrinks.
    pub possible_hypotheses: BTreeSet<String>,
    /// Intermediate conclusions still reachable
    pub possible_rules: BTreeSet<String>,
    /// Every hypothesis ruled out so far
    pub eliminated_hypotheses: BTreeSet<String>,
}

impl SessionState {
    /// Partition every node of the graph by kind
    pub fn from_graph(graph: &GoalGraph) -> Self {
        let mut state = Self::default();
        for (_, node) in graph.nodes() {
            let label = node.label().to_string();
            match node.kind() {
                NodeKind::Fact => state.possible_facts.insert(label),
                NodeKind::Hypothesis => state.possible_hypotheses.insert(label),
                NodeKind::Rule => state.possible_rules.insert(label),
            };
        }
        state
    }

    /// Asked facts that were not confirmed
    pub fn refuted_facts(&self) -> BTreeSet<String> {
        self.asked_facts.difference(&self.known_facts).cloned().collect()
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The known facts derive this hypothesis
    Solved { hypothesis: String },
    /// Nothing left to ask and no hypothesis derived
    Inconclusive,
}

impl Outcome {
    pub fn hypothesis(&self) -> Option<&str> {
        match self {
            Outcome::Solved { hypothesis } => Some(hypothesis),
            Outcome::Inconclusive => None,
        }
    }
}

/// An answer as recorded in a session transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Answer {
    Yes,
    No,
    Chose { fact: String },
}

/// One question of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub number: usize,
    /// The fact asked about, or every member of a choose-one group
    pub facts: Vec<String>,
    pub answer: Answer,
    pub asked_at: DateTime<Utc>,
}

/// Observable steps of a session, in the order they happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    FactAsked { fact: String, confirmed: bool },
    GroupAsked { group: Vec<String>, chosen: String },
    /// Every derivation of this node is blocked by a refuted fact
    NodeRefuted { label: String },
    HypothesisEliminated { hypothesis: String },
    /// The fact only mattered to eliminated hypotheses
    FactIrrelevant { fact: String },
    /// The fact's parent stays derivable without it
    FactRedundant { fact: String },
    RulesRecomputed { count: usize },
    Solved { hypothesis: String },
    Inconclusive,
}

/// Summary of a finished (or abandoned) session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcome: Option<Outcome>,
    pub questions: Vec<QuestionRecord>,
    pub known_facts: BTreeSet<String>,
    pub eliminated_hypotheses: BTreeSet<String>,
    pub remaining_hypotheses: BTreeSet<String>,
}

impl SessionReport {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            outcome: None,
            questions: Vec::new(),
            known_facts: BTreeSet::new(),
            eliminated_hypotheses: BTreeSet::new(),
            remaining_hypotheses: BTreeSet::new(),
        }
    }

    pub fn record_question(&mut self, facts: Vec<String>, answer: Answer) {
        self.questions.push(QuestionRecord {
            number: self.questions.len() + 1,
            facts,
            answer,
            asked_at: Utc::now(),
        });
    }

    pub fn finish(&mut self, outcome: Outcome, state: &SessionState) {
        self.outcome = Some(outcome);
        self.finished_at = Some(Utc::now());
        self.known_facts = state.known_facts.clone();
        self.eliminated_hypotheses = state.eliminated_hypotheses.clone();
        self.remaining_hypotheses = state.possible_hypotheses.clone();
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.finished_at.map(|end| {
            (end - self.started_at).num_milliseconds() as f64 / 1000.0
        })
    }
}

impl Default for SessionReport {
    fn default() -> Self {
        Self::new()
    }
}
