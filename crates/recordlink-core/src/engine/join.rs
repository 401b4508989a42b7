use std::collections::BTreeMap;

use crate::metrics;
use crate::models::{Field, Match, MatchCandidate, RecordEntry, RecordSource, SearchParams};
use crate::normalize::normalize;

use super::MatcherCore;

const MAX_RESULTS: usize = 5;

/// Joins per-field candidates into whole-record matches, drops records over
/// the engine-wide edit cap, re-scores the survivors against the query, and
/// returns the top results in descending score order.
pub(super) fn rank<S: RecordSource>(
    core: &MatcherCore<S>,
    query: &RecordEntry,
    params: &SearchParams,
    by_field: BTreeMap<Field, Vec<MatchCandidate>>,
) -> (bool, Vec<Match<S>>) {
    let joined = join_candidates(params, by_field);
    let cleaned = drop_over_budget(joined, core.params().max_edits);
    if cleaned.is_empty() {
        return (false, Vec::new());
    }
    score_records(core, query, params, &cleaned)
}

#[derive(Debug, Default)]
struct JoinedRecord {
    /// Matched value per field, stem stripped.
    fields: BTreeMap<Field, String>,
    /// Cheapest edit count observed per field.
    edit_counts: BTreeMap<Field, u32>,
}

fn join_candidates(
    params: &SearchParams,
    by_field: BTreeMap<Field, Vec<MatchCandidate>>,
) -> BTreeMap<i64, JoinedRecord> {
    let mut joined: BTreeMap<i64, JoinedRecord> = BTreeMap::new();
    for (field, candidates) in by_field {
        let field_max = params.field(&field).max_edits;
        let stem = format!("{field}:");
        for candidate in candidates {
            if candidate.edit_count > field_max {
                continue;
            }
            let value = candidate
                .text
                .strip_prefix(&stem)
                .unwrap_or(&candidate.text);
            for &id in &candidate.ids {
                let record = joined.entry(id).or_default();
                let cheaper = record
                    .edit_counts
                    .get(&field)
                    .is_none_or(|&existing| candidate.edit_count < existing);
                if cheaper {
                    record.edit_counts.insert(field.clone(), candidate.edit_count);
                    record.fields.insert(field.clone(), value.to_string());
                }
            }
        }
    }
    joined
}

fn drop_over_budget(
    joined: BTreeMap<i64, JoinedRecord>,
    global_max_edits: u32,
) -> BTreeMap<i64, JoinedRecord> {
    joined
        .into_iter()
        .filter(|(_, record)| record.edit_counts.values().sum::<u32>() <= global_max_edits)
        .collect()
}

fn score_records<S: RecordSource>(
    core: &MatcherCore<S>,
    query: &RecordEntry,
    params: &SearchParams,
    records: &BTreeMap<i64, JoinedRecord>,
) -> (bool, Vec<Match<S>>) {
    let mut scored: Vec<(i64, f64)> = Vec::new();

    'records: for (&id, record) in records {
        if core.entry(id).is_none() {
            continue;
        }

        let mut similarities: BTreeMap<&Field, f64> = BTreeMap::new();
        for (field, query_value) in &query.key {
            let field_params = params.field(field);
            let floor = field_params.min_similarity;
            let matched_value = record.fields.get(field).map_or("", String::as_str);

            // a field with a floor must be present and clear it
            if matched_value.is_empty() && floor > 0.0 {
                continue 'records;
            }
            let similarity = metrics::floored_similarity(
                &normalize(query_value),
                &normalize(matched_value),
                field_params.metric,
                floor,
            );
            if floor == 0.0 && similarity == 0.0 {
                continue;
            }
            if floor > 0.0 && similarity < floor {
                continue 'records;
            }
            similarities.insert(field, similarity);
        }

        let score = params
            .iter()
            .map(|(field, field_params)| {
                field_params.weight * similarities.get(field).copied().unwrap_or(0.0)
            })
            .sum();
        scored.push((id, score));
    }

    if scored.is_empty() {
        return (false, Vec::new());
    }

    // equal scores break toward the smaller entry ID to keep ranking stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(MAX_RESULTS);

    let matches = scored
        .into_iter()
        .filter_map(|(id, score)| {
            core.entry(id).map(|entry| Match {
                score,
                entry: entry.clone(),
            })
        })
        .collect();
    (true, matches)
}
