pub mod forward_chain;
pub mod required_facts;
pub mod explainer;
pub mod oracle;
pub mod policy;
pub mod phraser;
pub mod listener;
pub mod question_engine;
pub mod export;

pub use forward_chain::{ChainTrace, ForwardChainer, Inference};
pub use required_facts::required_facts;
pub use explainer::{BackwardExplainer, ExplanationSink, TextSink};
pub use oracle::{ChoiceQuestion, Oracle, Scripted, ScriptedOracle, TruthOracle, YesNoQuestion};
pub use policy::{FirstPolicy, QuestionPolicy, RandomPolicy};
pub use phraser::{IdentityPhraser, TextPhraser};
pub use listener::{RecordingListener, SessionListener, TracingListener};
pub use question_engine::QuestionEngine;
pub use export::GraphExport;
