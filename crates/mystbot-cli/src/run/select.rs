//! Round-robin candidate selection across subreddit buckets.

use mystbot_scraper::CandidatePost;

/// Select up to `cap` posts by cycling through the buckets in order, taking
/// one post per visit and skipping buckets that have run dry. Bucket order
/// and within-bucket order are preserved as given.
pub(crate) fn round_robin_select(
    buckets: Vec<(String, Vec<CandidatePost>)>,
    cap: usize,
) -> Vec<CandidatePost> {
    if cap == 0 || buckets.is_empty() {
        return Vec::new();
    }

    let mut cursors: Vec<std::vec::IntoIter<CandidatePost>> = buckets
        .into_iter()
        .map(|(_, posts)| posts.into_iter())
        .collect();
    let mut exhausted: Vec<bool> = cursors.iter().map(|c| c.as_slice().is_empty()).collect();

    let mut selected = Vec::new();
    let mut position = 0usize;
    while selected.len() < cap && exhausted.iter().any(|done| !done) {
        let index = position % cursors.len();
        position += 1;
        if exhausted[index] {
            continue;
        }
        if let Some(post) = cursors[index].next() {
            selected.push(post);
        }
        if cursors[index].as_slice().is_empty() {
            exhausted[index] = true;
        }
    }

    selected
}

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;
