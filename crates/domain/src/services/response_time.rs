//! Invitation response-time analytics.
//!
//! Pairs each token-creation audit record with the first subsequent update
//! that incremented the token's usage, yielding the elapsed time between
//! issuing an invitation and its first redemption.

use crate::models::token_log::{TokenAuditRecord, TokenOperation};

const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Aggregated response-time report, in days.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTimeReport {
    pub average_days: f64,
    pub response_times: Vec<f64>,
    pub min_days: f64,
    pub max_days: f64,
}

/// Computes response times from the audit ledger.
///
/// For every update record whose snapshots show `used_count` increasing, the
/// matching creation record is located by token id and the elapsed time in
/// days is collected. Only the first redemption per token counts; records
/// with unreadable snapshots are skipped. Returns `None` when no pair exists.
pub fn compute_response_times(records: &[TokenAuditRecord]) -> Option<ResponseTimeReport> {
    let creations: Vec<&TokenAuditRecord> = records
        .iter()
        .filter(|r| r.operation == TokenOperation::Create)
        .collect();

    let mut seen_tokens: Vec<String> = Vec::new();
    let mut response_times: Vec<f64> = Vec::new();

    let mut updates: Vec<&TokenAuditRecord> = records
        .iter()
        .filter(|r| r.operation == TokenOperation::Update)
        .collect();
    updates.sort_by_key(|r| r.timestamp);

    for update in updates {
        if !update.is_usage_increment() {
            continue;
        }
        let Some(token_id) = update.after_token_id() else {
            continue;
        };
        if seen_tokens.iter().any(|seen| seen == token_id) {
            continue;
        }

        let creation = creations
            .iter()
            .find(|c| c.after_token_id() == Some(token_id));

        if let Some(creation) = creation {
            let elapsed_ms = (update.timestamp - creation.timestamp).num_milliseconds();
            response_times.push(round2(elapsed_ms as f64 / MS_PER_DAY));
            seen_tokens.push(token_id.to_string());
        }
    }

    if response_times.is_empty() {
        return None;
    }

    let sum: f64 = response_times.iter().sum();
    let average = sum / response_times.len() as f64;
    let min = response_times.iter().copied().fold(f64::INFINITY, f64::min);
    let max = response_times
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    Some(ResponseTimeReport {
        average_days: round2(average),
        response_times,
        min_days: round2(min),
        max_days: round2(max),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
