//! Clearance-filtered date-proximity ranking
//!
//! Candidates come from an unranked sample of the index, are filtered by
//! clearance, then ordered by (whole days from target, version tag).

use tracing::debug;

use super::index::VectorIndex;
use crate::core::chunk::{day_distance, parse_iso_datetime, Chunk};
use crate::core::clearance::Clearance;
use crate::error::{Result, StoreError};

/// Maximum number of candidates pulled from the index per request.
///
/// Chunks beyond this many are never ranked, however close their date is.
// TODO: replace the sample with a date-range query once the index can filter on `date`.
pub const CANDIDATE_CAP: usize = 100;

/// Rank stored chunks by proximity to `target_date`.
///
/// With `clearance` set, chunks tagged above that level are dropped; with
/// `None` or an empty tag every candidate passes. The target date is validated before the
/// index is queried.
pub fn retrieve_by_date<I: VectorIndex + ?Sized>(
    index: &I,
    target_date: &str,
    clearance: Option<&str>,
) -> Result<Vec<Chunk>> {
    let target = parse_iso_datetime(target_date)
        .ok_or_else(|| StoreError::InvalidDate(target_date.to_string()))?;
    let clearance = clearance
        .filter(|tag| !tag.is_empty())
        .map(Clearance::from_tag);

    let candidates = index.search_candidates("", CANDIDATE_CAP)?;
    debug!(candidates = candidates.len(), "acquired candidate pool");

    let mut ranked: Vec<(i64, Chunk)> = Vec::with_capacity(candidates.len());
    for stored in candidates {
        let chunk = Chunk::try_from(stored)?;

        if let Some(level) = clearance {
            if !level.admits(&chunk.metadata.security_tag) {
                continue;
            }
        }

        let date = parse_iso_datetime(&chunk.metadata.date).ok_or_else(|| {
            StoreError::MalformedCandidate(format!(
                "unparseable date {:?} in chunk from {}",
                chunk.metadata.date, chunk.metadata.source
            ))
        })?;
        ranked.push((day_distance(date, target), chunk));
    }

    ranked.sort_by(|(days_a, a), (days_b, b)| {
        days_a
            .cmp(days_b)
            .then_with(|| a.metadata.version_tag.cmp(&b.metadata.version_tag))
    });
    debug!(
        kept = ranked.len(),
        clearance = ?clearance,
        "ranked candidates by date proximity"
    );

    Ok(ranked.into_iter().map(|(_, chunk)| chunk).collect())
}
