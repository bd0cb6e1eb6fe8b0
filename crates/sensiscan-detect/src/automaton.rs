//! Multi-pattern keyword matcher
//!
//! A classic Aho-Corasick automaton keyed by `char`. Nodes live in a flat
//! arena and refer to each other by index, so failure links are plain
//! integers with no ownership of their own. Output lists are merged along
//! failure links at build time: matching never walks the failure chain to
//! collect outputs.
//!
//! [`KeywordAutomaton`] owns the live snapshot behind an [`ArcSwap`]. A
//! rebuild constructs a complete new snapshot off to the side and publishes
//! it with a single atomic store; in-flight scans keep the snapshot they
//! loaded until they finish.

use arc_swap::ArcSwap;
use std::collections::{HashMap, HashSet, VecDeque};
use std::str::CharIndices;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, NodeId>,
    fail: NodeId,
    /// Indices into `AutomatonSnapshot::patterns`, own pattern first, then
    /// those inherited through the failure chain (longest first)
    outputs: Vec<u32>,
}

/// One keyword occurrence
///
/// Offsets are UTF-8 byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub pattern: Arc<str>,
    pub start: usize,
    pub end: usize,
}

/// Immutable, fully built automaton
#[derive(Debug)]
pub struct AutomatonSnapshot {
    nodes: Vec<Node>,
    patterns: Vec<Arc<str>>,
}

impl AutomatonSnapshot {
    /// Build an automaton over the given patterns
    ///
    /// Empty strings are skipped and duplicates collapse to their first
    /// occurrence.
    pub fn build<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let patterns: Vec<Arc<str>> = patterns
            .into_iter()
            .filter(|p| !p.as_ref().is_empty())
            .filter(|p| seen.insert(p.as_ref().to_string()))
            .map(|p| Arc::from(p.as_ref()))
            .collect();

        let mut nodes = vec![Node::default()];

        for (index, pattern) in patterns.iter().enumerate() {
            let mut current = ROOT;
            for c in pattern.chars() {
                current = match nodes[current as usize].children.get(&c) {
                    Some(&next) => next,
                    None => {
                        let next = nodes.len() as NodeId;
                        nodes.push(Node::default());
                        nodes[current as usize].children.insert(c, next);
                        next
                    }
                };
            }
            nodes[current as usize].outputs.push(index as u32);
        }

        Self::link_failures(&mut nodes);

        Self { nodes, patterns }
    }

    /// Breadth-first pass setting failure links and merging outputs
    ///
    /// A node's failure target is strictly shallower, so it is always
    /// finalized before the node itself is visited.
    fn link_failures(nodes: &mut [Node]) {
        let mut queue: VecDeque<NodeId> = nodes[ROOT as usize].children.values().copied().collect();
        for &child in &queue {
            nodes[child as usize].fail = ROOT;
        }

        while let Some(parent) = queue.pop_front() {
            let edges: Vec<(char, NodeId)> = nodes[parent as usize]
                .children
                .iter()
                .map(|(&c, &child)| (c, child))
                .collect();

            for (c, child) in edges {
                let mut fallback = nodes[parent as usize].fail;
                let fail = loop {
                    if let Some(&target) = nodes[fallback as usize].children.get(&c) {
                        break target;
                    }
                    if fallback == ROOT {
                        break ROOT;
                    }
                    fallback = nodes[fallback as usize].fail;
                };

                nodes[child as usize].fail = fail;

                let inherited = nodes[fail as usize].outputs.clone();
                let outputs = &mut nodes[child as usize].outputs;
                for pattern in inherited {
                    if !outputs.contains(&pattern) {
                        outputs.push(pattern);
                    }
                }

                queue.push_back(child);
            }
        }
    }

    /// Number of distinct patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Patterns in insertion order
    pub fn patterns(&self) -> &[Arc<str>] {
        &self.patterns
    }

    /// Lazily report every occurrence, overlapping ones included
    ///
    /// Matches come out in order of end offset; matches sharing an end come
    /// out longest first.
    pub fn find_iter<'a, 't>(&'a self, text: &'t str) -> Matches<'a, 't> {
        Matches {
            snapshot: self,
            chars: text.char_indices(),
            state: ROOT,
            pending: None,
        }
    }

    fn step(&self, mut state: NodeId, c: char) -> NodeId {
        loop {
            if let Some(&next) = self.nodes[state as usize].children.get(&c) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = self.nodes[state as usize].fail;
        }
    }
}

/// Iterator returned by [`AutomatonSnapshot::find_iter`]
pub struct Matches<'a, 't> {
    snapshot: &'a AutomatonSnapshot,
    chars: CharIndices<'t>,
    state: NodeId,
    /// Node whose outputs are being drained, the next output position and
    /// the byte offset just past the current char
    pending: Option<(NodeId, usize, usize)>,
}

impl Iterator for Matches<'_, '_> {
    type Item = KeywordMatch;

    fn next(&mut self) -> Option<KeywordMatch> {
        loop {
            if let Some((node, position, end)) = self.pending {
                let outputs = &self.snapshot.nodes[node as usize].outputs;
                if let Some(&index) = outputs.get(position) {
                    self.pending = Some((node, position + 1, end));
                    let pattern = &self.snapshot.patterns[index as usize];
                    return Some(KeywordMatch {
                        pattern: Arc::clone(pattern),
                        start: end - pattern.len(),
                        end,
                    });
                }
                self.pending = None;
            }

            let (offset, c) = self.chars.next()?;
            self.state = self.snapshot.step(self.state, c);
            if !self.snapshot.nodes[self.state as usize].outputs.is_empty() {
                self.pending = Some((self.state, 0, offset + c.len_utf8()));
            }
        }
    }
}

/// Hot-swappable keyword automaton
///
/// Readers never block. Rebuilds are serialized so that concurrent updates
/// publish in the order they acquired the writer lock.
pub struct KeywordAutomaton {
    current: ArcSwap<AutomatonSnapshot>,
    writer: Mutex<()>,
    version: AtomicU64,
}

impl KeywordAutomaton {
    /// Create an automaton serving the given patterns
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            current: ArcSwap::from_pointee(AutomatonSnapshot::build(patterns)),
            writer: Mutex::new(()),
            version: AtomicU64::new(1),
        }
    }

    /// The snapshot currently being served
    ///
    /// Holding the returned `Arc` pins that snapshot even across later
    /// updates.
    pub fn snapshot(&self) -> Arc<AutomatonSnapshot> {
        self.current.load_full()
    }

    /// Every occurrence in `text` against the current snapshot
    pub fn find_all(&self, text: &str) -> Vec<KeywordMatch> {
        self.current.load().find_iter(text).collect()
    }

    /// Rebuild from scratch and publish atomically
    ///
    /// Returns the number of distinct patterns now being served.
    pub fn update_patterns<I, S>(&self, patterns: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _guard = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let snapshot = AutomatonSnapshot::build(patterns);
        let count = snapshot.pattern_count();
        self.current.store(Arc::new(snapshot));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;

        debug!(patterns = count, version, "Keyword automaton swapped");
        count
    }

    /// Distinct patterns in the current snapshot
    pub fn pattern_count(&self) -> usize {
        self.current.load().pattern_count()
    }

    /// Number of snapshots published so far, starting at 1
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl Default for KeywordAutomaton {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl std::fmt::Debug for KeywordAutomaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordAutomaton")
            .field("patterns", &self.pattern_count())
            .field("version", &self.version())
            .finish()
    }
}
