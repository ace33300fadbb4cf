//! Adaptive question session ("akinator").
//!
//! Each round asks about one fact (or one group of mutually exclusive
//! facts), stops if the known facts now derive a surviving hypothesis, and
//! otherwise narrows the pool of facts still worth asking about:
//!
//! 1. refuted facts propagate upwards: a node whose every AND-set holds a
//!    refuted member is refuted too;
//! 2. refuted hypotheses are eliminated;
//! 3. facts that only feed eliminated hypotheses are dropped;
//! 4. facts whose parent is derivable without them are dropped.
//!
//! Every round removes at least one fact from the pool, so a session ends
//! after at most as many rounds as the graph has facts.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::GoalTreeResult;
use crate::models::{
    Answer, GoalGraph, NodeKind, Outcome, SessionEvent, SessionReport, SessionState,
};
use super::forward_chain::ForwardChainer;
use super::listener::{SessionListener, TracingListener};
use super::oracle::{ChoiceQuestion, Oracle, YesNoQuestion};
use super::phraser::{IdentityPhraser, TextPhraser};
use super::policy::{QuestionPolicy, RandomPolicy};
use super::required_facts::required_facts;

const CHOICE_PROMPT: &str = "Which of these is true?";

/// One interactive session over a goal graph
pub struct QuestionEngine<'g, L = TracingListener> {
    graph: &'g GoalGraph,
    exclusive_groups: Vec<Vec<String>>,
    policy: Box<dyn QuestionPolicy>,
    phraser: Box<dyn TextPhraser>,
    listener: L,
    state: SessionState,
    report: SessionReport,
    outcome: Option<Outcome>,
}

impl<'g> QuestionEngine<'g> {
    /// A fresh session with random question order, unphrased prompts and
    /// tracing output
    pub fn new(graph: &'g GoalGraph, exclusive_groups: Vec<Vec<String>>) -> Self {
        Self {
            graph,
            exclusive_groups,
            policy: Box::new(RandomPolicy::from_entropy()),
            phraser: Box::new(IdentityPhraser),
            listener: TracingListener,
            state: SessionState::from_graph(graph),
            report: SessionReport::new(),
            outcome: None,
        }
    }
}

impl<'g, L: SessionListener> QuestionEngine<'g, L> {
    pub fn with_policy(mut self, policy: impl QuestionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_phraser(mut self, phraser: impl TextPhraser + 'static) -> Self {
        self.phraser = Box::new(phraser);
        self
    }

    pub fn with_listener<M: SessionListener>(self, listener: M) -> QuestionEngine<'g, M> {
        QuestionEngine {
            graph: self.graph,
            exclusive_groups: self.exclusive_groups,
            policy: self.policy,
            phraser: self.phraser,
            listener,
            state: self.state,
            report: self.report,
            outcome: self.outcome,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    pub fn into_report(self) -> SessionReport {
        self.report
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// `Some` once the session has ended
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Ask questions until a hypothesis is derived or nothing is left to ask
    pub fn run(&mut self, oracle: &mut dyn Oracle) -> GoalTreeResult<Outcome> {
        loop {
            if let Some(outcome) = self.step(oracle)? {
                return Ok(outcome);
            }
        }
    }

    /// One round: ask, check, narrow. Returns the outcome once the session
    /// is over (and keeps returning it on later calls).
    pub fn step(&mut self, oracle: &mut dyn Oracle) -> GoalTreeResult<Option<Outcome>> {
        if let Some(outcome) = &self.outcome {
            return Ok(Some(outcome.clone()));
        }
        if self.state.possible_facts.is_empty() {
            return Ok(Some(self.finish(Outcome::Inconclusive)));
        }

        self.choose_question(oracle)?;

        if let Some(hypothesis) = self.derived_hypothesis() {
            return Ok(Some(self.finish(Outcome::Solved { hypothesis })));
        }

        self.narrow()?;

        if self.state.possible_facts.is_empty() {
            return Ok(Some(self.finish(Outcome::Inconclusive)));
        }
        Ok(None)
    }

    /// Ask about one fact picked by the policy, or about its whole group if
    /// the group is still untouched
    pub fn choose_question(&mut self, oracle: &mut dyn Oracle) -> GoalTreeResult<()> {
        let fact = match self.policy.choose(&self.state.possible_facts) {
            Some(fact) if self.state.possible_facts.contains(&fact) => fact,
            pick => {
                let Some(first) = self.state.possible_facts.iter().next() else {
                    return Ok(());
                };
                match &pick {
                    Some(stray) => tracing::warn!(fact = %stray, "policy chose a fact outside the pool"),
                    None => tracing::warn!("policy chose nothing from a non-empty pool"),
                }
                first.clone()
            }
        };

        let group = self
            .exclusive_groups
            .iter()
            .find(|group| group.contains(&fact))
            .filter(|group| group.iter().all(|m| self.state.possible_facts.contains(m)))
            .cloned();

        match group {
            Some(group) => self.ask_group(group, oracle),
            None => self.ask_fact(fact, oracle),
        }
    }

    fn ask_fact(&mut self, fact: String, oracle: &mut dyn Oracle) -> GoalTreeResult<()> {
        let question = YesNoQuestion {
            prompt: self.phraser.phrase(&format!("Does it {}?", fact)),
            fact: fact.clone(),
        };
        let confirmed = oracle.ask_yes_no(&question)?;

        self.state.possible_facts.remove(&fact);
        self.state.asked_facts.insert(fact.clone());
        if confirmed {
            self.state.known_facts.insert(fact.clone());
        }

        let answer = if confirmed { Answer::Yes } else { Answer::No };
        self.report.record_question(vec![fact.clone()], answer);
        self.listener.on_event(&SessionEvent::FactAsked { fact, confirmed });
        Ok(())
    }

    fn ask_group(&mut self, group: Vec<String>, oracle: &mut dyn Oracle) -> GoalTreeResult<()> {
        let question = ChoiceQuestion {
            prompt: self.phraser.phrase(CHOICE_PROMPT),
            options: group.clone(),
        };
        let index = loop {
            let index = oracle.ask_choice(&question)?;
            if index < group.len() {
                break index;
            }
            tracing::warn!(index, options = group.len(), "choice out of range, asking again");
        };

        let chosen = group[index].clone();
        self.state.known_facts.insert(chosen.clone());
        for member in &group {
            self.state.asked_facts.insert(member.clone());
            self.state.possible_facts.remove(member);
        }

        self.report
            .record_question(group.clone(), Answer::Chose { fact: chosen.clone() });
        self.listener.on_event(&SessionEvent::GroupAsked { group, chosen });
        Ok(())
    }

    /// A surviving hypothesis derivable from the known facts, if any
    fn derived_hypothesis(&self) -> Option<String> {
        ForwardChainer::chain(self.graph, &self.state.known_facts)
            .into_iter()
            .find(|label| self.state.possible_hypotheses.contains(label))
    }

    /// Shrink the question pool after an answer
    pub fn narrow(&mut self) -> GoalTreeResult<()> {
        let not_possible = self.propagate_refutations();
        let removed = self.eliminate_hypotheses(&not_possible);
        self.drop_irrelevant_facts(&removed)?;
        self.recompute_possible_rules();
        self.drop_redundant_facts()?;

        tracing::debug!(
            possible_facts = self.state.possible_facts.len(),
            possible_hypotheses = self.state.possible_hypotheses.len(),
            "narrowed"
        );
        Ok(())
    }

    /// Refuted facts plus every node all of whose derivations contain one
    fn propagate_refutations(&mut self) -> BTreeSet<String> {
        let mut not_possible = self.state.refuted_facts();
        loop {
            let mut changed = false;
            for (_, node) in self.graph.nodes() {
                if node.is_fact() || not_possible.contains(node.label()) {
                    continue;
                }
                let blocked = node.or_set().iter().all(|and_set| {
                    and_set
                        .iter()
                        .any(|m| not_possible.contains(self.graph.label(*m)))
                });
                if blocked {
                    not_possible.insert(node.label().to_string());
                    self.listener.on_event(&SessionEvent::NodeRefuted {
                        label: node.label().to_string(),
                    });
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        not_possible
    }

    /// Remove refuted hypotheses; returns the ones removed this round
    fn eliminate_hypotheses(&mut self, not_possible: &BTreeSet<String>) -> BTreeSet<String> {
        let removed: BTreeSet<String> = self
            .state
            .possible_hypotheses
            .intersection(not_possible)
            .cloned()
            .collect();
        for hypothesis in &removed {
            self.state.possible_hypotheses.remove(hypothesis);
            self.state.eliminated_hypotheses.insert(hypothesis.clone());
            self.listener.on_event(&SessionEvent::HypothesisEliminated {
                hypothesis: hypothesis.clone(),
            });
        }
        removed
    }

    /// Drop facts that only matter to hypotheses eliminated this round
    fn drop_irrelevant_facts(&mut self, removed: &BTreeSet<String>) -> GoalTreeResult<()> {
        if removed.is_empty() {
            return Ok(());
        }
        let still_needed = self.union_required(&self.state.possible_hypotheses)?;
        let only_removed = self.union_required(removed)?;

        for fact in only_removed.difference(&still_needed) {
            if self.state.possible_facts.remove(fact) {
                self.listener.on_event(&SessionEvent::FactIrrelevant { fact: fact.clone() });
            }
        }
        Ok(())
    }

    fn recompute_possible_rules(&mut self) {
        let reachable: BTreeSet<String> = self
            .state
            .possible_facts
            .union(&self.state.known_facts)
            .cloned()
            .collect();
        self.state.possible_rules = ForwardChainer::chain(self.graph, &reachable)
            .into_iter()
            .filter(|label| {
                self.graph
                    .id_of(label)
                    .is_some_and(|id| self.graph.kind(id) == NodeKind::Rule)
            })
            .collect();
        self.listener.on_event(&SessionEvent::RulesRecomputed {
            count: self.state.possible_rules.len(),
        });
    }

    /// Counterfactual test: unknown facts feeding an already-derivable node
    /// are grouped by the parent they support. If the parent stays
    /// derivable from the remaining pool without the group, the group adds
    /// nothing and is dropped.
    fn drop_redundant_facts(&mut self) -> GoalTreeResult<()> {
        let deducible = ForwardChainer::chain(self.graph, &self.state.known_facts);

        let mut potential = BTreeSet::new();
        for label in &deducible {
            for fact in required_facts(self.graph, label)? {
                if !self.state.known_facts.contains(&fact) {
                    potential.insert(fact);
                }
            }
        }
        if potential.is_empty() {
            return Ok(());
        }

        let mut buckets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for fact in &potential {
            let id = self.graph.require(fact)?;
            for parent in self.graph.node(id).parents() {
                buckets
                    .entry(self.graph.label(*parent).to_string())
                    .or_default()
                    .insert(fact.clone());
            }
        }

        let pool: BTreeSet<String> = self
            .state
            .possible_facts
            .union(&self.state.known_facts)
            .cloned()
            .collect();
        let mut retained = BTreeSet::new();
        for (parent, bucket) in &buckets {
            let without: BTreeSet<String> = pool.difference(bucket).cloned().collect();
            if !ForwardChainer::chain(self.graph, &without).contains(parent) {
                retained.extend(bucket.iter().cloned());
            }
        }

        for fact in potential.difference(&retained) {
            if self.state.possible_facts.remove(fact) {
                self.listener.on_event(&SessionEvent::FactRedundant { fact: fact.clone() });
            }
        }
        Ok(())
    }

    fn union_required(&self, hypotheses: &BTreeSet<String>) -> GoalTreeResult<BTreeSet<String>> {
        let mut facts = BTreeSet::new();
        for hypothesis in hypotheses {
            facts.extend(required_facts(self.graph, hypothesis)?);
        }
        Ok(facts)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        let event = match &outcome {
            Outcome::Solved { hypothesis } => SessionEvent::Solved {
                hypothesis: hypothesis.clone(),
            },
            Outcome::Inconclusive => SessionEvent::Inconclusive,
        };
        self.listener.on_event(&event);
        self.report.finish(outcome.clone(), &self.state);
        self.outcome = Some(outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{catalog, GoalGraphBuilder, RuleSet};
    use crate::services::listener::RecordingListener;
    use crate::services::oracle::{Scripted, ScriptedOracle, TruthOracle};
    use crate::services::policy::FirstPolicy;

    /// Prefers the listed facts in order, then falls back to the smallest
    struct PreferPolicy(Vec<String>);

    impl PreferPolicy {
        fn new(prefer: &[&str]) -> Self {
            Self(prefer.iter().map(|s| s.to_string()).collect())
        }
    }

    impl QuestionPolicy for PreferPolicy {
        fn choose(&mut self, candidates: &BTreeSet<String>) -> Option<String> {
            self.0
                .iter()
                .find(|f| candidates.contains(*f))
                .or_else(|| candidates.iter().next())
                .cloned()
        }
    }

    const PENGUIN: [&str; 4] = ["has feathers", "does not fly", "swims", "has black and white color"];

    fn engine<'g>(set: &RuleSet, graph: &'g GoalGraph, seed: u64) -> QuestionEngine<'g, RecordingListener> {
        QuestionEngine::new(graph, set.exclusive_groups.clone())
            .with_policy(RandomPolicy::seeded(seed))
            .with_listener(RecordingListener::new())
    }

    #[test]
    fn test_penguin_is_found_for_any_seed() {
        let set = catalog::zookeeper();
        let graph = set.graph().unwrap();
        for seed in 0..20 {
            let mut session = engine(&set, &graph, seed);
            let mut oracle = TruthOracle::new(PENGUIN);
            let outcome = session.run(&mut oracle).unwrap();
            assert_eq!(
                outcome,
                Outcome::Solved { hypothesis: "is a penguin".to_string() },
                "seed {}",
                seed
            );
        }
    }

    #[test]
    fn test_loonie_is_found_for_any_seed() {
        let set = catalog::tourist();
        let graph = set.graph().unwrap();
        for seed in 0..20 {
            let mut session = engine(&set, &graph, seed);
            let mut oracle =
                TruthOracle::new(["wears clothing that stands out", "wears muted, utilitarian clothing"]);
            let outcome = session.run(&mut oracle).unwrap();
            assert_eq!(outcome.hypothesis(), Some("is a Loonie"), "seed {}", seed);
        }
    }

    #[test]
    fn test_all_no_is_inconclusive_and_bounded() {
        let set = catalog::zookeeper();
        let graph = set.graph().unwrap();
        let initial_facts = graph.facts().count();
        for seed in 0..10 {
            let mut session = engine(&set, &graph, seed);
            let mut oracle = TruthOracle::default();
            let outcome = session.run(&mut oracle).unwrap();
            assert_eq!(outcome, Outcome::Inconclusive);
            assert!(session.report().question_count() <= initial_facts);
            assert!(session.state().possible_facts.is_empty());
            assert_eq!(session.listener().events.last(), Some(&SessionEvent::Inconclusive));
        }
    }

    #[test]
    fn test_each_round_shrinks_the_pool() {
        let set = catalog::tourist();
        let graph = set.graph().unwrap();
        let mut session = engine(&set, &graph, 3);
        let mut oracle = TruthOracle::new(["takes frequent photos", "takes selfies at landmarks"]);
        let mut rounds = 0;
        loop {
            let before = session.state().possible_facts.len();
            let outcome = session.step(&mut oracle).unwrap();
            rounds += 1;
            assert!(session.state().possible_facts.len() < before || outcome.is_some());
            if outcome.is_some() {
                break;
            }
        }
        assert!(rounds <= graph.facts().count());
    }

    struct NonePolicy;

    impl QuestionPolicy for NonePolicy {
        fn choose(&mut self, _candidates: &BTreeSet<String>) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_empty_policy_pick_still_asks() {
        let mut builder = GoalGraphBuilder::new();
        builder.add_rule(&["a"], "top").unwrap();
        builder.add_rule(&["b", "c"], "other").unwrap();
        let graph = builder.build();
        let mut session = QuestionEngine::new(&graph, Vec::new()).with_policy(NonePolicy);
        let mut oracle = TruthOracle::new(["a"]);

        let mut rounds = 0;
        loop {
            let before = session.state().possible_facts.len();
            let outcome = session.step(&mut oracle).unwrap();
            rounds += 1;
            assert!(session.state().possible_facts.len() < before || outcome.is_some());
            if let Some(outcome) = outcome {
                assert_eq!(outcome.hypothesis(), Some("top"));
                break;
            }
            assert!(rounds <= 3);
        }
        // Falls back to the smallest label: "a" first
        assert_eq!(oracle.asked(), 1);
    }

    #[test]
    fn test_known_grows_and_hypotheses_shrink() {
        let cases = [
            (catalog::zookeeper(), vec!["has hair", "eats meat", "has tawny color", "has dark spots"]),
            (catalog::zookeeper(), vec!["has feathers", "is a good flyer"]),
            (catalog::tourist(), vec!["walks slowly", "takes photos while walking", "wears business attire"]),
            (catalog::tourist(), Vec::new()),
        ];
        for (set, truths) in &cases {
            let graph = set.graph().unwrap();
            for seed in 0..6 {
                let mut session = engine(set, &graph, seed);
                let mut oracle = TruthOracle::new(truths.iter().copied());
                let mut prev = session.state().clone();
                loop {
                    let outcome = session.step(&mut oracle).unwrap();
                    let cur = session.state();
                    assert!(prev.known_facts.is_subset(&cur.known_facts), "seed {}", seed);
                    assert!(cur.possible_hypotheses.is_subset(&prev.possible_hypotheses), "seed {}", seed);
                    assert!(cur.possible_facts.is_subset(&prev.possible_facts), "seed {}", seed);
                    prev = cur.clone();
                    if outcome.is_some() {
                        break;
                    }
                }
            }
        }
    }

    #[test]
    fn test_exclusive_group_asked_as_one_question() {
        let set = catalog::tourist();
        let graph = set.graph().unwrap();
        for chosen in ["wears bright flashy clothing", "wears muted, utilitarian clothing"] {
            let mut session = QuestionEngine::new(&graph, set.exclusive_groups.clone())
                .with_policy(PreferPolicy::new(&[chosen]))
                .with_listener(RecordingListener::new());
            let mut oracle = TruthOracle::new([chosen]);
            session.choose_question(&mut oracle).unwrap();

            let state = session.state();
            assert!(!state.possible_facts.contains("wears bright flashy clothing"));
            assert!(!state.possible_facts.contains("wears muted, utilitarian clothing"));
            assert!(state.asked_facts.contains("wears bright flashy clothing"));
            assert!(state.asked_facts.contains("wears muted, utilitarian clothing"));
            assert_eq!(state.known_facts.len(), 1);
            assert!(state.known_facts.contains(chosen));
            assert_eq!(oracle.asked(), 1);
            assert_eq!(
                session.listener().events[0],
                SessionEvent::GroupAsked {
                    group: vec![
                        "wears bright flashy clothing".to_string(),
                        "wears muted, utilitarian clothing".to_string(),
                    ],
                    chosen: chosen.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_broken_group_falls_back_to_yes_no() {
        let set = catalog::tourist();
        let graph = set.graph().unwrap();
        let mut session = QuestionEngine::new(&graph, set.exclusive_groups.clone())
            .with_policy(PreferPolicy::new(&[
                "wears bright flashy clothing",
                "wears muted, utilitarian clothing",
            ]))
            .with_listener(RecordingListener::new());
        let mut oracle = ScriptedOracle::new(vec![Scripted::Choice(0), Scripted::YesNo(false)]);

        // First question takes the whole group out of the pool
        session.choose_question(&mut oracle).unwrap();
        // Re-insert one member to simulate a partially asked group
        session.state.possible_facts.insert("wears muted, utilitarian clothing".to_string());
        session.choose_question(&mut oracle).unwrap();

        assert!(matches!(
            session.listener().events[1],
            SessionEvent::FactAsked { confirmed: false, .. }
        ));
        assert_eq!(oracle.transcript[1], "Does it wears muted, utilitarian clothing?");
    }

    #[test]
    fn test_out_of_range_choice_is_asked_again() {
        let set = catalog::tourist();
        let graph = set.graph().unwrap();
        let mut session = QuestionEngine::new(&graph, set.exclusive_groups.clone())
            .with_policy(PreferPolicy::new(&["frequently checks for directions"]));
        let mut oracle = ScriptedOracle::new(vec![
            Scripted::Choice(5),
            Scripted::Choice(2),
            Scripted::Choice(1),
        ]);
        session.choose_question(&mut oracle).unwrap();
        assert_eq!(oracle.transcript.len(), 3);
        assert!(session.state().known_facts.contains("uses tech to navigate efficiently"));
    }

    #[test]
    fn test_oracle_failure_ends_session_with_error() {
        let set = catalog::zookeeper();
        let graph = set.graph().unwrap();
        let mut session = QuestionEngine::new(&graph, Vec::new()).with_policy(FirstPolicy);
        let mut oracle = ScriptedOracle::new(vec![Scripted::YesNo(false)]);
        assert!(session.run(&mut oracle).is_err());
        assert!(session.outcome().is_none());
    }

    #[test]
    fn test_refutation_eliminates_hypotheses_and_irrelevant_facts() {
        let set = catalog::zookeeper();
        let graph = set.graph().unwrap();
        let mut session = QuestionEngine::new(&graph, Vec::new())
            .with_policy(PreferPolicy::new(&["has hair", "gives milk"]))
            .with_listener(RecordingListener::new());
        let mut oracle = TruthOracle::default();
        session.step(&mut oracle).unwrap();
        session.step(&mut oracle).unwrap();

        let state = session.state();
        for gone in ["is a cheetah", "is a tiger", "is a giraffe", "is a zebra"] {
            assert!(!state.possible_hypotheses.contains(gone));
            assert!(state.eliminated_hypotheses.contains(gone));
        }
        for kept in ["is an ostrich", "is a penguin", "is an albatross"] {
            assert!(state.possible_hypotheses.contains(kept));
        }
        // Mammal-only facts are gone; facts shared with birds stay
        for gone in ["eats meat", "has hoofs", "chews cud", "has tawny color", "has claws"] {
            assert!(!state.possible_facts.contains(gone), "{} should be dropped", gone);
        }
        for kept in ["has long legs", "has long neck", "has black and white color"] {
            assert!(state.possible_facts.contains(kept), "{} should stay", kept);
        }
        assert!(session
            .listener()
            .events
            .contains(&SessionEvent::NodeRefuted { label: "is a mammal".to_string() }));
    }

    #[test]
    fn test_redundant_alternative_dropped() {
        let set = catalog::zookeeper();
        let graph = set.graph().unwrap();
        let mut session = QuestionEngine::new(&graph, Vec::new())
            .with_policy(PreferPolicy::new(&["has feathers"]))
            .with_listener(RecordingListener::new());
        let mut oracle = TruthOracle::new(["has feathers"]);
        session.step(&mut oracle).unwrap();

        // "is a bird" already holds, so the flies + lays eggs route adds nothing
        let state = session.state();
        assert!(!state.possible_facts.contains("flies"));
        assert!(!state.possible_facts.contains("lays eggs"));
        assert!(state.possible_facts.contains("swims"));
        let events = &session.listener().events;
        assert!(events.contains(&SessionEvent::FactRedundant { fact: "flies".to_string() }));
        assert!(events.contains(&SessionEvent::FactRedundant { fact: "lays eggs".to_string() }));
    }

    #[test]
    fn test_needed_alternative_retained() {
        // top needs mid and z; mid comes from a, or from b and c
        let mut builder = GoalGraphBuilder::new();
        builder.add_rule(&["a"], "mid").unwrap();
        builder.add_rule(&["b", "c"], "mid").unwrap();
        builder.add_rule(&["mid", "z"], "top").unwrap();
        builder.add_rule(&["b", "y"], "other").unwrap();
        let graph = builder.build();

        let mut session = QuestionEngine::new(&graph, Vec::new())
            .with_policy(PreferPolicy::new(&["b", "c"]))
            .with_listener(RecordingListener::new());
        let mut oracle = TruthOracle::new(["b"]);
        session.step(&mut oracle).unwrap();

        // Nothing is derivable from {b} alone, so no counterfactual pruning yet
        assert!(session.state().possible_facts.contains("a"));
        assert!(session.state().possible_facts.contains("c"));

        session.step(&mut oracle).unwrap();
        // c refuted: {b, c} route blocked, "a" is now the only way to "mid"
        assert!(session.state().possible_facts.contains("a"));
        assert!(session.state().possible_facts.contains("z"));
    }

    #[test]
    fn test_narrow_never_drops_needed_facts_silently() {
        let sets = [
            (catalog::zookeeper(), vec!["has hair", "chews cud", "has white color"]),
            (catalog::zookeeper(), vec!["flies", "lays eggs"]),
            (catalog::tourist(), vec!["walks slowly", "takes photos while walking"]),
        ];
        for (set, truths) in &sets {
            let graph = set.graph().unwrap();
            for seed in 0..8 {
                let mut session = engine(set, &graph, seed);
                let mut oracle = TruthOracle::new(truths.iter().copied());
                while session.step(&mut oracle).unwrap().is_none() {
                    let state = session.state();
                    let mut needed = BTreeSet::new();
                    for h in &state.possible_hypotheses {
                        needed.extend(required_facts(&graph, h).unwrap());
                    }
                    let redundant: BTreeSet<&str> = session
                        .listener()
                        .events
                        .iter()
                        .filter_map(|e| match e {
                            SessionEvent::FactRedundant { fact } => Some(fact.as_str()),
                            _ => None,
                        })
                        .collect();
                    for fact in &needed {
                        let dropped = !state.possible_facts.contains(fact)
                            && !state.asked_facts.contains(fact);
                        if dropped {
                            assert!(
                                redundant.contains(fact.as_str()),
                                "'{}' dropped while still needed (seed {})",
                                fact,
                                seed
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_report_tracks_questions() {
        let set = catalog::zookeeper();
        let graph = set.graph().unwrap();
        let mut session = engine(&set, &graph, 11);
        let mut oracle = TruthOracle::new(PENGUIN);
        session.run(&mut oracle).unwrap();

        let questions = session.report().question_count();
        assert_eq!(questions, oracle.asked());
        let report = session.into_report();
        assert_eq!(report.outcome.as_ref().and_then(|o| o.hypothesis()), Some("is a penguin"));
        assert!(report.finished_at.is_some());
        assert!(report.known_facts.iter().all(|f| PENGUIN.contains(&f.as_str())));
    }

    #[test]
    fn test_step_after_finish_repeats_outcome() {
        let mut builder = GoalGraphBuilder::new();
        builder.add_rule(&["a"], "top").unwrap();
        let graph = builder.build();
        let mut session = QuestionEngine::new(&graph, Vec::new());
        let mut oracle = TruthOracle::new(["a"]);
        let first = session.run(&mut oracle).unwrap();
        assert_eq!(first.hypothesis(), Some("top"));
        assert_eq!(session.step(&mut oracle).unwrap(), Some(first));
        assert_eq!(oracle.asked(), 1);
    }

    #[test]
    fn test_phraser_shapes_prompts() {
        let mut builder = GoalGraphBuilder::new();
        builder.add_rule(&["has hair"], "top").unwrap();
        let graph = builder.build();
        let mut session = QuestionEngine::new(&graph, Vec::new())
            .with_phraser(|text: &str| text.replace("Does it has", "Does it have"));
        let mut oracle = ScriptedOracle::new(vec![Scripted::YesNo(true)]);
        session.run(&mut oracle).unwrap();
        assert_eq!(oracle.transcript, vec!["Does it have hair?".to_string()]);
    }
}
