//! Fair queueing: interleaves upcoming tracks round-robin by requester so that
//! one user queueing a whole album cannot monopolize playback.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::commands::music::audio_sources::TrackMetadata;

/// Reorders `items` so that groups sharing a key take turns.
///
/// Groups are visited in the order their key first appears, and each group
/// keeps its own relative order. The output is a permutation of the input.
pub fn interleave<T, K, F>(items: Vec<T>, key_of: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let total = items.len();
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<VecDeque<T>> = Vec::new();

    for item in items {
        let slot = *slots.entry(key_of(&item)).or_insert_with(|| {
            groups.push(VecDeque::new());
            groups.len() - 1
        });
        groups[slot].push_back(item);
    }

    let mut ordered = Vec::with_capacity(total);
    while ordered.len() < total {
        for group in groups.iter_mut() {
            if let Some(item) = group.pop_front() {
                ordered.push(item);
            }
        }
    }

    ordered
}

/// Interleaves tracks by requester id. Tracks without a requester share one group.
pub fn reorder(tracks: Vec<TrackMetadata>) -> Vec<TrackMetadata> {
    interleave(tracks, TrackMetadata::requester_id)
}
