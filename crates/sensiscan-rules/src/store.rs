//! Rule storage
//!
//! Mutations are serialized by a writer lock that is held until the
//! resulting keyword list has been pushed to the sink, so the sink always
//! sees keyword sets in the same order the mutations were applied. Reads go
//! straight to the map and never wait on that lock.

use crate::defaults::default_rules;
use crate::rule::{Rule, RuleDraft, RuleStatus, RuleType};
use chrono::Utc;
use dashmap::DashMap;
use regex::Regex;
use sensiscan_core::{Error, KeywordSink, KeywordSource, Result, SensitiveCategory};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Rule lifecycle operations
pub trait RuleStore: KeywordSource {
    /// Store a new rule at version 1
    ///
    /// An id is generated as `CATEGORY_TYPE_<unix millis>` when the draft has
    /// none. Creating over an existing id is rejected.
    fn create(&self, draft: RuleDraft) -> Result<Rule>;

    /// Replace a rule's fields, bumping its version
    ///
    /// `created_at` is kept; the draft's own id is ignored.
    fn update(&self, id: &str, draft: RuleDraft) -> Result<Rule>;

    /// Remove a rule, returning it
    fn delete(&self, id: &str) -> Result<Rule>;

    fn get(&self, id: &str) -> Option<Rule>;

    /// Every rule in insertion order
    fn list(&self) -> Vec<Rule>;

    fn list_by_type(&self, rule_type: RuleType) -> Vec<Rule>;

    fn list_by_category(&self, category: SensitiveCategory) -> Vec<Rule>;

    fn list_by_status(&self, status: RuleStatus) -> Vec<Rule>;

    /// Mark a rule enabled; the version is not bumped
    fn enable(&self, id: &str) -> Result<Rule>;

    /// Mark a rule disabled; the version is not bumped
    fn disable(&self, id: &str) -> Result<Rule>;

    /// Update drafts whose id exists, create the rest
    ///
    /// Every draft is validated before any is applied. Results follow input
    /// order.
    fn batch_upsert(&self, drafts: Vec<RuleDraft>) -> Result<Vec<Rule>>;

    /// Push the current enabled keywords to the sink again
    ///
    /// Returns how many keywords were pushed.
    fn refresh(&self) -> usize;

    /// Content of every enabled regex rule, in insertion order
    fn enabled_regex_patterns(&self) -> Vec<String>;
}

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    rule: Rule,
}

/// Concurrent in-memory rule store
pub struct InMemoryRuleStore {
    rules: DashMap<String, Entry>,
    next_seq: AtomicU64,
    writer: Mutex<()>,
    sink: Option<Arc<dyn KeywordSink>>,
}

impl InMemoryRuleStore {
    /// Empty store without a sink
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
            next_seq: AtomicU64::new(0),
            writer: Mutex::new(()),
            sink: None,
        }
    }

    /// Store seeded with the built-in keyword rules
    pub fn with_defaults() -> Self {
        let store = Self::new();
        let now = Utc::now();
        for draft in default_rules() {
            let id = draft.id.clone().unwrap_or_default();
            store.insert(id, draft, now, now, 1);
        }
        store
    }

    /// Push enabled keywords to `sink` after every mutation
    ///
    /// Attaching does not push; call [`RuleStore::refresh`] to sync the sink
    /// with the current rules.
    pub fn with_sink(mut self, sink: Arc<dyn KeywordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(
        &self,
        id: String,
        draft: RuleDraft,
        created_at: chrono::DateTime<Utc>,
        updated_at: chrono::DateTime<Utc>,
        version: u64,
    ) -> Rule {
        let rule = Rule {
            id: id.clone(),
            name: draft.name,
            rule_type: draft.rule_type,
            content: draft.content,
            category: draft.category,
            risk_level: draft.risk_level,
            status: draft.status,
            created_at,
            updated_at,
            version,
        };

        let seq = self
            .rules
            .get(&id)
            .map(|existing| existing.seq)
            .unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::Relaxed));

        self.rules.insert(
            id,
            Entry {
                seq,
                rule: rule.clone(),
            },
        );
        rule
    }

    fn generate_id(&self, draft: &RuleDraft) -> String {
        let base = format!(
            "{}_{}_{}",
            draft.category.as_str(),
            draft.rule_type.as_str(),
            Utc::now().timestamp_millis()
        );
        if !self.rules.contains_key(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.rules.contains_key(candidate))
            .unwrap_or(base)
    }

    fn create_locked(&self, draft: RuleDraft) -> Result<Rule> {
        let id = match draft.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                if self.rules.contains_key(id) {
                    return Err(Error::InvalidRule(format!("Rule already exists: {id}")));
                }
                id.to_string()
            }
            _ => self.generate_id(&draft),
        };

        let now = Utc::now();
        let rule = self.insert(id, draft, now, now, 1);
        info!(rule_id = %rule.id, rule_type = rule.rule_type.as_str(), "Rule created");
        Ok(rule)
    }

    fn update_locked(&self, id: &str, draft: RuleDraft) -> Result<Rule> {
        let (created_at, version) = self
            .rules
            .get(id)
            .map(|entry| (entry.rule.created_at, entry.rule.version))
            .ok_or_else(|| Error::RuleNotFound(id.to_string()))?;

        let rule = self.insert(id.to_string(), draft, created_at, Utc::now(), version + 1);
        info!(rule_id = %rule.id, version = rule.version, "Rule updated");
        Ok(rule)
    }

    fn set_status(&self, id: &str, status: RuleStatus) -> Result<Rule> {
        let _guard = self.lock();
        let rule = {
            let mut entry = self
                .rules
                .get_mut(id)
                .ok_or_else(|| Error::RuleNotFound(id.to_string()))?;
            entry.rule.status = status;
            entry.rule.updated_at = Utc::now();
            entry.rule.clone()
        };

        info!(rule_id = %rule.id, status = ?status, "Rule status changed");
        self.publish();
        Ok(rule)
    }

    fn publish(&self) -> usize {
        let keywords = self.enabled_keywords();
        let count = keywords.len();
        if let Some(sink) = &self.sink {
            debug!(keywords = count, "Pushing enabled keywords");
            sink.replace_keywords(keywords);
        }
        count
    }

    fn collect(&self, predicate: impl Fn(&Rule) -> bool) -> Vec<Rule> {
        let mut entries: Vec<Entry> = self
            .rules
            .iter()
            .filter(|entry| predicate(&entry.rule))
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.rule).collect()
    }
}

impl Default for InMemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRuleStore")
            .field("rules", &self.rules.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

fn validate(draft: &RuleDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(Error::InvalidRule("Rule name must not be empty".to_string()));
    }
    if draft.content.trim().is_empty() {
        return Err(Error::InvalidRule("Rule content must not be empty".to_string()));
    }
    if draft.rule_type == RuleType::Regex {
        Regex::new(&draft.content)?;
    }
    Ok(())
}

impl KeywordSource for InMemoryRuleStore {
    fn enabled_keywords(&self) -> Vec<String> {
        self.collect(Rule::is_active_keyword)
            .into_iter()
            .map(|rule| rule.content)
            .collect()
    }
}

impl RuleStore for InMemoryRuleStore {
    fn create(&self, draft: RuleDraft) -> Result<Rule> {
        validate(&draft)?;
        let _guard = self.lock();
        let rule = self.create_locked(draft)?;
        self.publish();
        Ok(rule)
    }

    fn update(&self, id: &str, draft: RuleDraft) -> Result<Rule> {
        validate(&draft)?;
        let _guard = self.lock();
        let rule = self.update_locked(id, draft)?;
        self.publish();
        Ok(rule)
    }

    fn delete(&self, id: &str) -> Result<Rule> {
        let _guard = self.lock();
        let (_, entry) = self
            .rules
            .remove(id)
            .ok_or_else(|| Error::RuleNotFound(id.to_string()))?;

        info!(rule_id = %id, "Rule deleted");
        self.publish();
        Ok(entry.rule)
    }

    fn get(&self, id: &str) -> Option<Rule> {
        self.rules.get(id).map(|entry| entry.rule.clone())
    }

    fn list(&self) -> Vec<Rule> {
        self.collect(|_| true)
    }

    fn list_by_type(&self, rule_type: RuleType) -> Vec<Rule> {
        self.collect(|rule| rule.rule_type == rule_type)
    }

    fn list_by_category(&self, category: SensitiveCategory) -> Vec<Rule> {
        self.collect(|rule| rule.category == category)
    }

    fn list_by_status(&self, status: RuleStatus) -> Vec<Rule> {
        self.collect(|rule| rule.status == status)
    }

    fn enable(&self, id: &str) -> Result<Rule> {
        self.set_status(id, RuleStatus::Enabled)
    }

    fn disable(&self, id: &str) -> Result<Rule> {
        self.set_status(id, RuleStatus::Disabled)
    }

    fn batch_upsert(&self, drafts: Vec<RuleDraft>) -> Result<Vec<Rule>> {
        for draft in &drafts {
            validate(draft)?;
        }

        let _guard = self.lock();
        let mut applied = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let existing = draft
                .id
                .as_deref()
                .filter(|id| self.rules.contains_key(*id))
                .map(str::to_string);

            let rule = match existing {
                Some(id) => self.update_locked(&id, draft)?,
                None => self.create_locked(draft)?,
            };
            applied.push(rule);
        }

        info!(rules = applied.len(), "Batch upsert applied");
        self.publish();
        Ok(applied)
    }

    fn refresh(&self) -> usize {
        let _guard = self.lock();
        self.publish()
    }

    fn enabled_regex_patterns(&self) -> Vec<String> {
        self.collect(|rule| rule.is_enabled() && rule.rule_type == RuleType::Regex)
            .into_iter()
            .map(|rule| rule.content)
            .collect()
    }
}
