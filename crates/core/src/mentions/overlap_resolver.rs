use super::mentions_model::RawMatch;

/// Picks one interpretation per character span.
pub struct OverlapResolver;

impl OverlapResolver {
    /// Sorts by start offset and keeps a match only if it begins at or after
    /// the end of the last kept one.
    ///
    /// The sort is stable, so for matches starting at the same offset the
    /// first one in input order (the earlier-registered rule) wins.
    pub fn resolve(mut matches: Vec<RawMatch>) -> Vec<RawMatch> {
        matches.sort_by_key(|m| m.start);

        let mut kept: Vec<RawMatch> = Vec::with_capacity(matches.len());
        let mut last_end = 0;
        for candidate in matches {
            if kept.is_empty() || candidate.start >= last_end {
                last_end = candidate.end;
                kept.push(candidate);
            } else {
                log::trace!(
                    "Dropping overlapping match '{}' for {}",
                    candidate.text,
                    candidate.tag.currency
                );
            }
        }
        kept
    }
}
