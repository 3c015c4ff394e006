use serde::{Deserialize, Serialize};
use serde_json::json;

use spindle_catalog::{NewRecord, RecordCategory, RecordFormat, RecordPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub artist: String,
    pub album: String,
    pub price_cents: u64,
    pub qty: i64,
    pub format: RecordFormat,
    pub category: RecordCategory,
    pub mbid: Option<String>,
}

impl CreateRecordRequest {
    pub fn into_new_record(self) -> NewRecord {
        NewRecord {
            artist: self.artist,
            album: self.album,
            price_cents: self.price_cents,
            qty: self.qty,
            format: self.format,
            category: self.category,
            mbid: self.mbid,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecordRequest {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub price_cents: Option<u64>,
    pub format: Option<RecordFormat>,
    pub category: Option<RecordCategory>,
    pub mbid: Option<String>,
}

impl UpdateRecordRequest {
    /// The tracklist is never patched directly; the record service replaces
    /// it through enrichment when the mbid changes.
    pub fn into_patch(self) -> RecordPatch {
        RecordPatch {
            artist: self.artist,
            album: self.album,
            price_cents: self.price_cents,
            format: self.format,
            category: self.category,
            mbid: self.mbid,
            tracklist: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub record_id: String,
    pub quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsQuery {
    pub q: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub format: Option<RecordFormat>,
    pub category: Option<RecordCategory>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// -------------------------
// Response envelope
// -------------------------

/// Success envelope: `{"status": true, "message": ..., "data": ...}`.
pub fn envelope(message: &str, data: impl Serialize) -> serde_json::Value {
    json!({
        "status": true,
        "message": message,
        "data": data,
    })
}
