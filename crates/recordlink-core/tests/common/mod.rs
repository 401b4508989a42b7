// Shared fixtures; each integration test binary uses its own subset.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use recordlink_core::{Field, FieldParams, Metric, RecordEntry, RecordSource, SearchParams};

/// Event-membership record, the primary fixture shape.
///
/// Members with too-short names fall back to exact matching: every budget
/// zeroed and every similarity floor raised to 1.0.
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub firstname: String,
    pub surname: String,
    /// Compact `YYYYMMDD` form.
    pub birthdate: String,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_end_utc: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn new(id: i64, firstname: &str, surname: &str, birthdate: &str) -> Self {
        Self {
            id,
            firstname: firstname.to_string(),
            surname: surname.to_string(),
            birthdate: birthdate.to_string(),
            deleted_at: None,
            event_end_utc: None,
        }
    }

    pub fn deleted(mut self) -> Self {
        self.deleted_at = Some(Utc::now());
        self
    }

    pub fn with_event_end(mut self, event_end: DateTime<Utc>) -> Self {
        self.event_end_utc = Some(event_end);
        self
    }

    /// Names averaging 3.5 characters or less are too short to match fuzzily.
    pub fn is_valid(&self) -> bool {
        let firstname = self.firstname.trim().to_lowercase();
        let surname = self.surname.trim().to_lowercase();
        if firstname.is_empty() || surname.is_empty() || self.birthdate.is_empty() {
            return false;
        }
        let average_length = (firstname.len() + surname.len()) as f64 / 2.0;
        average_length > 3.5
    }
}

impl RecordSource for Membership {
    fn record_entry(&self) -> Option<RecordEntry> {
        if self.deleted_at.is_some() {
            return None;
        }
        let mut key = BTreeMap::new();
        key.insert(Field::firstname(), self.firstname.trim().to_lowercase());
        key.insert(Field::surname(), self.surname.trim().to_lowercase());
        key.insert(Field::birthdate(), self.birthdate.clone());
        Some(RecordEntry {
            key,
            id: self.id,
            expiry: self.event_end_utc.map(|end| end + Duration::hours(12)),
        })
    }

    fn search_params(&self) -> SearchParams {
        let (budgets, floors) = if self.is_valid() {
            ([6, 2, 2], [0.7, 0.9, 1.0])
        } else {
            // exact match only
            ([0, 0, 0], [1.0, 1.0, 1.0])
        };
        SearchParams::new()
            .with_field(
                Field::firstname(),
                FieldParams {
                    max_depth: budgets[0],
                    max_edits: budgets[0],
                    weight: 0.2,
                    metric: Metric::JaroWinkler,
                    min_similarity: floors[0],
                },
            )
            .with_field(
                Field::surname(),
                FieldParams {
                    max_depth: budgets[1],
                    max_edits: budgets[1],
                    weight: 0.4,
                    metric: Metric::JaroWinkler,
                    min_similarity: floors[1],
                },
            )
            .with_field(
                Field::birthdate(),
                FieldParams {
                    max_depth: budgets[2],
                    max_edits: budgets[2],
                    weight: 0.4,
                    metric: Metric::Identity,
                    min_similarity: floors[2],
                },
            )
    }
}

/// Patron record with a middle name and a customer scope, exercising the
/// Levenshtein metric on birthdates and identity-gated exact fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Patron {
    pub id: i64,
    pub firstname: String,
    pub middlename: String,
    pub surname: String,
    pub birthdate: String,
    pub customer_id: i64,
}

impl Patron {
    pub fn new(
        id: i64,
        firstname: &str,
        middlename: &str,
        surname: &str,
        birthdate: &str,
        customer_id: i64,
    ) -> Self {
        Self {
            id,
            firstname: firstname.to_string(),
            middlename: middlename.to_string(),
            surname: surname.to_string(),
            birthdate: birthdate.to_string(),
            customer_id,
        }
    }
}

impl RecordSource for Patron {
    fn record_entry(&self) -> Option<RecordEntry> {
        let first_token = |raw: &str| {
            raw.split_whitespace()
                .next()
                .unwrap_or("")
                .to_lowercase()
        };
        let mut key = BTreeMap::new();
        key.insert(Field::firstname(), first_token(&self.firstname));
        key.insert(Field::middlename(), first_token(&self.middlename));
        key.insert(Field::surname(), first_token(&self.surname));
        key.insert(Field::birthdate(), self.birthdate.trim().to_lowercase());
        key.insert(Field::customer_id(), self.customer_id.to_string());
        Some(RecordEntry {
            key,
            id: self.id,
            expiry: Some(Utc::now() + Duration::hours(24)),
        })
    }

    fn search_params(&self) -> SearchParams {
        SearchParams::new()
            .with_field(
                Field::firstname(),
                FieldParams {
                    max_depth: 2,
                    max_edits: 2,
                    weight: 0.30,
                    metric: Metric::JaroWinkler,
                    min_similarity: 0.85,
                },
            )
            .with_field(
                Field::middlename(),
                FieldParams {
                    max_depth: 2,
                    max_edits: 2,
                    weight: 0.0,
                    metric: Metric::JaroWinkler,
                    min_similarity: 0.0,
                },
            )
            .with_field(
                Field::surname(),
                FieldParams {
                    max_depth: 2,
                    max_edits: 2,
                    weight: 0.30,
                    metric: Metric::JaroWinkler,
                    min_similarity: 0.85,
                },
            )
            .with_field(
                Field::birthdate(),
                FieldParams {
                    max_depth: 5,
                    max_edits: 5,
                    weight: 0.4,
                    metric: Metric::Levenshtein,
                    min_similarity: 0.6,
                },
            )
            .with_field(
                Field::customer_id(),
                FieldParams {
                    max_depth: 0,
                    max_edits: 0,
                    weight: 0.0,
                    metric: Metric::Identity,
                    min_similarity: 1.0,
                },
            )
    }
}

/// Single-field record whose budgets are dialed per instance; used to probe
/// budget monotonicity end to end.
#[derive(Debug, Clone)]
pub struct Tunable {
    pub id: i64,
    pub firstname: String,
    pub max_edits: u32,
    pub max_depth: u32,
}

impl Tunable {
    pub fn new(id: i64, firstname: &str, max_edits: u32, max_depth: u32) -> Self {
        Self {
            id,
            firstname: firstname.to_string(),
            max_edits,
            max_depth,
        }
    }
}

impl RecordSource for Tunable {
    fn record_entry(&self) -> Option<RecordEntry> {
        let mut key = BTreeMap::new();
        key.insert(Field::firstname(), self.firstname.to_lowercase());
        Some(RecordEntry {
            key,
            id: self.id,
            expiry: None,
        })
    }

    fn search_params(&self) -> SearchParams {
        SearchParams::new().with_field(
            Field::firstname(),
            FieldParams {
                max_depth: self.max_depth,
                max_edits: self.max_edits,
                weight: 1.0,
                metric: Metric::JaroWinkler,
                min_similarity: 0.5,
            },
        )
    }
}

/// Loads the shared membership dataset under `tests/data/`.
pub fn load_memberships() -> Vec<Membership> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("memberships.json");
    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    serde_json::from_str(&raw).expect("malformed membership dataset")
}
