use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A named attribute participating in matching (`firstname`, `birthdate`, ...).
///
/// Fields are opaque to the engine; they only carry the per-field parameters
/// keyed by them and the `"<field>:"` stem prepended to stored keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(String);

impl Field {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn firstname() -> Self {
        Self::new("firstname")
    }

    #[must_use]
    pub fn middlename() -> Self {
        Self::new("middlename")
    }

    #[must_use]
    pub fn surname() -> Self {
        Self::new("surname")
    }

    #[must_use]
    pub fn birthdate() -> Self {
        Self::new("birthdate")
    }

    #[must_use]
    pub fn customer_id() -> Self {
        Self::new("customer_id")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Field {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Similarity metric applied when re-scoring a matched field value against
/// the query value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    JaroWinkler,
    Levenshtein,
    /// Always reports 1.0; ranking is then driven purely by structural match.
    #[default]
    Identity,
}

/// Per-field normalized key of a record, keyed by field tag.
pub type RecordKey = BTreeMap<Field, String>;

/// What a source adapter hands the engine for one stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    pub key: RecordKey,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// A trie path that terminated at an end-of-string node within budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub text: String,
    pub edit_count: u32,
    pub depth: u32,
    pub ids: Vec<i64>,
}

/// A ranked search hit.
#[derive(Debug, Clone)]
pub struct Match<S> {
    pub score: f64,
    pub entry: S,
}

/// Search restrictions for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    /// Ceiling on cumulative depth cost (branch choices beyond the exact path).
    pub max_depth: u32,
    /// Ceiling on cumulative edits; 0 disables edits for the field.
    pub max_edits: u32,
    /// Contribution to the final score; callers keep the sum at 1.0.
    pub weight: f64,
    pub metric: Metric,
    /// Similarity floor applied in ranking and in best-first pruning.
    pub min_similarity: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_edits: 0,
            weight: 0.0,
            metric: Metric::Identity,
            min_similarity: 0.0,
        }
    }
}

/// Per-field search parameters for one query.
///
/// Lookups are permissive: a field with no declared parameters behaves as
/// zero budgets, zero weight, and the identity metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    fields: BTreeMap<Field, FieldParams>,
}

impl SearchParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, field: Field, params: FieldParams) -> Self {
        self.fields.insert(field, params);
        self
    }

    pub fn set(&mut self, field: Field, params: FieldParams) {
        self.fields.insert(field, params);
    }

    #[must_use]
    pub fn field(&self, field: &Field) -> FieldParams {
        self.fields.get(field).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldParams)> {
        self.fields.iter()
    }

    /// Advisory check that participating weights sum to 1.0.
    ///
    /// The engine treats any configuration as given; this exists for callers
    /// that want to validate adapter output up front.
    pub fn validate_weights(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Ok(());
        }
        let sum: f64 = self.fields.values().map(|p| p.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(LinkError::InvalidWeights(format!("weights sum to {sum}")));
        }
        Ok(())
    }
}

/// Engine-level knobs shared by every query against the index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineParams {
    pub correct_ocr_misreads: bool,
    pub use_expiration: bool,
    /// Cap on the summed edit count across all fields of one matched record.
    pub max_edits: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            correct_ocr_misreads: false,
            use_expiration: false,
            max_edits: 9999,
        }
    }
}

/// Contract between the engine and a record source.
///
/// `record_entry` returning `None` skips insertion (soft-deleted source rows).
pub trait RecordSource: Clone + Send + Sync {
    fn record_entry(&self) -> Option<RecordEntry>;
    fn search_params(&self) -> SearchParams;
}
