//! Progress log for vocabulary and grammar practice
//!
//! A single JSON file maps module names to the entries recorded under them:
//!
//! ```json
//! { "Vocabulary": [ { "word": "...", "definition": "..." } ] }
//! ```
//!
//! Module order and key order inside each entry are preserved exactly
//! across read-modify-write cycles.

pub mod store;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use store::ProgressStore;

/// One recorded interaction, e.g. `{word, definition}`
pub type Entry = IndexMap<String, String>;

/// Build an entry from key/value pairs, keeping their order
pub fn entry<K, V, I>(pairs: I) -> Entry
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// All entries of one module
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub module: String,
    pub entries: Vec<Entry>,
}

/// Whole contents of the progress file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressLog {
    modules: IndexMap<String, Vec<Entry>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` under `module`, creating the module if absent
    pub fn append(&mut self, module: &str, entry: Entry) {
        self.modules.entry(module.to_string()).or_default().push(entry);
    }

    /// Entries recorded under `module`; an exact key wins over a case-insensitive match
    pub fn record(&self, module: &str) -> Option<ProgressRecord> {
        let (name, entries) = self.modules.get_key_value(module).or_else(|| {
            self.modules
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(module))
        })?;

        Some(ProgressRecord {
            module: name.clone(),
            entries: entries.clone(),
        })
    }

    /// All records in file order
    pub fn records(&self) -> Vec<ProgressRecord> {
        self.modules
            .iter()
            .map(|(module, entries)| ProgressRecord {
                module: module.clone(),
                entries: entries.clone(),
            })
            .collect()
    }

    /// Module names with entry counts, in file order
    pub fn summary(&self) -> Vec<(String, usize)> {
        self.modules
            .iter()
            .map(|(module, entries)| (module.clone(), entries.len()))
            .collect()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn entry_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
