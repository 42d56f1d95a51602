//! Track and requester builders. Titles and names come from `fake` so tests
//! do not depend on particular strings.

use fake::Fake;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::{LastName, Name};
use std::time::Duration;

use encore::commands::music::audio_sources::{Requester, TrackMetadata};

pub fn random_id() -> u64 {
    (1_000..u64::MAX / 2).fake()
}

pub fn requester() -> Requester {
    Requester::new(random_id(), Name().fake::<String>())
}

/// The identity autoplay searches on behalf of.
pub fn bot() -> Requester {
    Requester::new(1, "encore")
}

pub fn track_titled(title: &str, requester: &Requester) -> TrackMetadata {
    TrackMetadata {
        title: title.to_string(),
        author: LastName().fake(),
        url: Some(format!("https://example.com/watch/{}", random_id())),
        duration: Some(Duration::from_secs((90..420).fake())),
        requester: Some(requester.clone()),
        ..Default::default()
    }
}

pub fn track(requester: &Requester) -> TrackMetadata {
    let words: Vec<String> = Words(2..5).fake();
    track_titled(&words.join(" "), requester)
}

/// `per_requester[i]` tracks for each of `per_requester.len()` fresh
/// requesters, queued one requester at a time.
pub fn batched_tracks(per_requester: &[usize]) -> Vec<TrackMetadata> {
    per_requester
        .iter()
        .flat_map(|&count| {
            let who = requester();
            (0..count).map(move |_| track(&who)).collect::<Vec<_>>()
        })
        .collect()
}
