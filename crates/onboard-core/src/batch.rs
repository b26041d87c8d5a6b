/// Batch evaluation over a whole record set.
///
/// Records are independent, so a batch may be split across scoped worker
/// threads. Chunks are contiguous and re-joined in spawn order, which keeps
/// the output aligned 1:1 with the input regardless of which worker finishes
/// first.
use std::num::NonZeroUsize;
use std::thread;

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::ClientRecord;
use crate::validation::{ValidationOutcome, Validator};

/// Pass/fail tallies for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchSummary {
    /// Records evaluated.
    pub total: usize,
    /// Records with status PASS.
    pub passed: usize,
    /// Records with status FAIL.
    pub failed: usize,
}

impl BatchSummary {
    /// Tallies a slice of outcomes.
    pub fn from_outcomes(outcomes: &[ValidationOutcome]) -> Self {
        let passed = outcomes.iter().filter(|o| o.is_pass()).count();
        Self {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
        }
    }
}

/// Evaluates every record in input order on the calling thread.
pub fn evaluate_all(
    validator: &Validator,
    records: &[ClientRecord],
    as_of: NaiveDate,
) -> Vec<ValidationOutcome> {
    records
        .iter()
        .map(|r| validator.evaluate(r, as_of))
        .collect()
}

/// Evaluates every record using up to `jobs` worker threads.
///
/// The returned vector has exactly `records.len()` entries and entry `i` is
/// the outcome for `records[i]`. With `jobs == 1`, or fewer records than
/// workers would be useful for, evaluation stays on the calling thread.
pub fn evaluate_batch(
    validator: &Validator,
    records: &[ClientRecord],
    as_of: NaiveDate,
    jobs: NonZeroUsize,
) -> Vec<ValidationOutcome> {
    let workers = jobs.get().min(records.len());
    let _span = tracing::debug_span!("evaluate_batch", records = records.len(), workers).entered();

    let outcomes = if workers <= 1 {
        evaluate_all(validator, records, as_of)
    } else {
        let chunk_len = records.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_len)
                .map(|chunk| scope.spawn(move || evaluate_all(validator, chunk, as_of)))
                .collect();

            let mut joined = Vec::with_capacity(records.len());
            for handle in handles {
                let part = handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                joined.extend(part);
            }
            joined
        })
    };

    let summary = BatchSummary::from_outcomes(&outcomes);
    tracing::debug!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        "batch evaluated"
    );
    outcomes
}
