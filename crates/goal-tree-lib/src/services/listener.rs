use crate::models::SessionEvent;

/// Passive observer of a question session. Must not influence it.
pub trait SessionListener {
    fn on_event(&mut self, event: &SessionEvent);
}

/// Forwards events to `tracing`: outcomes at info, everything else at debug
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl SessionListener for TracingListener {
    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::FactAsked { fact, confirmed } => {
                tracing::debug!(fact = %fact, confirmed, "fact asked");
            }
            SessionEvent::GroupAsked { group, chosen } => {
                tracing::debug!(options = group.len(), chosen = %chosen, "choice asked");
            }
            SessionEvent::NodeRefuted { label } => {
                tracing::debug!(label = %label, "every derivation blocked");
            }
            SessionEvent::HypothesisEliminated { hypothesis } => {
                tracing::debug!(hypothesis = %hypothesis, "hypothesis eliminated");
            }
            SessionEvent::FactIrrelevant { fact } => {
                tracing::debug!(fact = %fact, "removing fact: only supports eliminated hypotheses");
            }
            SessionEvent::FactRedundant { fact } => {
                tracing::debug!(fact = %fact, "removing fact: parent derivable without it");
            }
            SessionEvent::RulesRecomputed { count } => {
                tracing::trace!(count, "possible rules recomputed");
            }
            SessionEvent::Solved { hypothesis } => {
                tracing::info!(hypothesis = %hypothesis, "session solved");
            }
            SessionEvent::Inconclusive => {
                tracing::info!("session inconclusive");
            }
        }
    }
}

/// Keeps every event, for tests and transcripts
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub events: Vec<SessionEvent>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionListener for RecordingListener {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.push(event.clone());
    }
}

/// Fans every event out to several listeners
impl<A: SessionListener, B: SessionListener> SessionListener for (A, B) {
    fn on_event(&mut self, event: &SessionEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}
