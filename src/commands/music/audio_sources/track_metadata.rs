//! Defines the `TrackMetadata` struct, a unified representation of track information
//! from the search backends, along with the requester identity attached to it.

use serde::{Deserialize, Serialize};
use serenity::all::User;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// The user credited with adding a track to the queue.
///
/// Two requesters are equal when their ids are equal; the display fields are
/// informational only and may be stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requester {
    /// The Discord user id.
    pub id: u64,
    /// The user's name at the time of the request.
    pub username: String,
    /// Avatar URL, if the user has one.
    pub avatar_url: Option<String>,
}

impl Requester {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            avatar_url: None,
        }
    }
}

impl PartialEq for Requester {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Requester {}

impl Hash for Requester {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl From<&User> for Requester {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.name.clone(),
            avatar_url: user.avatar_url(),
        }
    }
}

/// Where a queued track came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Requested by a user through a command or the search button.
    #[default]
    User,
    /// Injected by the autoplay pipeline.
    Autoplay,
}

/// Unified representation of metadata for a playable track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The artist, channel or uploader.
    pub author: String,
    /// The direct URL to the track, if available (e.g., YouTube video URL).
    pub url: Option<String>,
    /// The duration of the track, if known. Live streams have none.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// Whether the source is a live stream.
    pub is_stream: bool,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// The user who requested the track.
    pub requester: Option<Requester>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Track".to_string(),
            author: "Unknown Artist".to_string(),
            url: None,
            duration: None,
            is_stream: false,
            thumbnail: None,
            requester: None,
            provenance: Provenance::User,
        }
    }
}

impl TrackMetadata {
    /// Returns a copy of this track attributed to `requester`.
    pub fn requested_by(mut self, requester: Requester) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Marks the track as injected by autoplay. Every other field is kept.
    pub fn tag_autoplay(&mut self) {
        self.provenance = Provenance::Autoplay;
    }

    pub fn is_autoplay(&self) -> bool {
        self.provenance == Provenance::Autoplay
    }

    /// Id used to group tracks for fair queueing.
    pub fn requester_id(&self) -> Option<u64> {
        self.requester.as_ref().map(|r| r.id)
    }

    /// Name shown in embeds for whoever queued the track.
    pub fn requester_name(&self) -> &str {
        match (&self.provenance, &self.requester) {
            (Provenance::Autoplay, _) => "Autoplay",
            (_, Some(requester)) => &requester.username,
            (_, None) => "Unknown",
        }
    }
}
