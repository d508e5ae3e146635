use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PatternKind, PatternMatch};

/// Trailing window, in candles, anchored at a kind's latest occurrence.
pub const REPEAT_WINDOW: usize = 10;

/// A formation seen at least twice within [`REPEAT_WINDOW`] candles of its latest occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedPattern {
    pub kind: PatternKind,
    pub indices: Vec<usize>,
}

/// Groups matches by kind and keeps the kinds that recur inside the trailing window.
///
/// Output follows the order in which each kind first appears in `matches`.
pub fn group(matches: &[PatternMatch]) -> Vec<RepeatedPattern> {
    let mut by_kind: Vec<(PatternKind, Vec<usize>)> = Vec::new();
    for m in matches {
        match by_kind.iter_mut().find(|(kind, _)| *kind == m.kind) {
            Some((_, indices)) => indices.push(m.index),
            None => by_kind.push((m.kind, vec![m.index])),
        }
    }

    let mut repeated = Vec::new();
    for (kind, mut indices) in by_kind {
        if indices.len() < 2 {
            continue;
        }
        indices.sort_unstable();

        let latest = indices[indices.len() - 1];
        let window_start = latest.saturating_sub(REPEAT_WINDOW);
        let recent: Vec<usize> = indices.into_iter().filter(|&i| i >= window_start).collect();

        if recent.len() >= 2 {
            debug!("{} repeated at candles {:?}", kind, recent);
            repeated.push(RepeatedPattern { kind, indices: recent });
        }
    }

    repeated
}
