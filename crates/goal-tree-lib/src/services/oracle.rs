use std::collections::{BTreeSet, VecDeque};

use crate::error::{GoalTreeError, GoalTreeResult};

/// A yes/no question about one fact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YesNoQuestion {
    pub fact: String,
    /// Phrased text shown to a human
    pub prompt: String,
}

/// A choose-one question over a group of mutually exclusive facts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceQuestion {
    pub prompt: String,
    pub options: Vec<String>,
}

/// The party answering the questions.
///
/// An `Err` means the oracle cannot answer any more and ends the session.
pub trait Oracle {
    fn ask_yes_no(&mut self, question: &YesNoQuestion) -> GoalTreeResult<bool>;

    /// 0-based index into `question.options`. Out-of-range answers are
    /// asked again by the caller.
    fn ask_choice(&mut self, question: &ChoiceQuestion) -> GoalTreeResult<usize>;
}

/// Answers from a fixed set of facts that hold.
///
/// Yes/no questions are answered by membership. A choice picks the first
/// option that holds, or the first option when none does.
#[derive(Debug, Clone, Default)]
pub struct TruthOracle {
    truths: BTreeSet<String>,
    asked: usize,
}

impl TruthOracle {
    pub fn new<I, S>(truths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            truths: truths.into_iter().map(Into::into).collect(),
            asked: 0,
        }
    }

    /// Questions answered so far
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Oracle for TruthOracle {
    fn ask_yes_no(&mut self, question: &YesNoQuestion) -> GoalTreeResult<bool> {
        self.asked += 1;
        Ok(self.truths.contains(&question.fact))
    }

    fn ask_choice(&mut self, question: &ChoiceQuestion) -> GoalTreeResult<usize> {
        self.asked += 1;
        Ok(question
            .options
            .iter()
            .position(|o| self.truths.contains(o))
            .unwrap_or(0))
    }
}

/// A pre-recorded answer for [`ScriptedOracle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    YesNo(bool),
    Choice(usize),
}

/// Replays answers in order; runs dry with `OracleUnavailable`
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    answers: VecDeque<Scripted>,
    /// Every question seen, rendered as its prompt
    pub transcript: Vec<String>,
}

impl ScriptedOracle {
    pub fn new(answers: Vec<Scripted>) -> Self {
        Self {
            answers: answers.into(),
            transcript: Vec::new(),
        }
    }

    fn next(&mut self) -> GoalTreeResult<Scripted> {
        self.answers
            .pop_front()
            .ok_or_else(|| GoalTreeError::OracleUnavailable("script exhausted".to_string()))
    }
}

impl Oracle for ScriptedOracle {
    fn ask_yes_no(&mut self, question: &YesNoQuestion) -> GoalTreeResult<bool> {
        self.transcript.push(question.prompt.clone());
        match self.next()? {
            Scripted::YesNo(answer) => Ok(answer),
            Scripted::Choice(_) => Err(GoalTreeError::OracleUnavailable(format!(
                "expected a yes/no answer for '{}'",
                question.fact
            ))),
        }
    }

    fn ask_choice(&mut self, question: &ChoiceQuestion) -> GoalTreeResult<usize> {
        self.transcript.push(question.prompt.clone());
        match self.next()? {
            Scripted::Choice(index) => Ok(index),
            Scripted::YesNo(_) => Err(GoalTreeError::OracleUnavailable(
                "expected a choice answer".to_string(),
            )),
        }
    }
}
