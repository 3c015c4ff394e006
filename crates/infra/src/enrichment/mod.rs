//! Track list enrichment from an external release identifier.

pub mod musicbrainz;

pub use musicbrainz::MusicBrainzClient;

use async_trait::async_trait;

/// Source of track titles for an external release id.
///
/// Never fails: any lookup problem is logged by the implementation and an
/// empty list is returned instead.
#[async_trait]
pub trait TrackListSource: Send + Sync {
    async fn fetch_track_list(&self, mbid: &str) -> Vec<String>;
}
