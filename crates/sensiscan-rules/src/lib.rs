//! Sensiscan Rule Management
//!
//! In-memory store of detection rules. Keyword rules feed the engine's
//! automaton: every mutation pushes the current enabled keyword list to the
//! attached [`KeywordSink`](sensiscan_core::KeywordSink).

pub mod defaults;
pub mod rule;
pub mod store;

pub use defaults::default_rules;
pub use rule::{Rule, RuleDraft, RuleStatus, RuleType};
pub use store::{InMemoryRuleStore, RuleStore};
