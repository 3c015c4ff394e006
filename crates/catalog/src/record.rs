use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spindle_core::{DomainError, DomainResult, Entity, RecordId};

/// Release format. Closed set; wire values are uppercase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordFormat {
    Vinyl,
    Cd,
    Cassette,
    Digital,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Vinyl => "VINYL",
            RecordFormat::Cd => "CD",
            RecordFormat::Cassette => "CASSETTE",
            RecordFormat::Digital => "DIGITAL",
        }
    }
}

impl core::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RecordFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VINYL" => Ok(RecordFormat::Vinyl),
            "CD" => Ok(RecordFormat::Cd),
            "CASSETTE" => Ok(RecordFormat::Cassette),
            "DIGITAL" => Ok(RecordFormat::Digital),
            other => Err(DomainError::validation(format!(
                "unknown format '{other}'; expected one of: VINYL, CD, CASSETTE, DIGITAL"
            ))),
        }
    }
}

/// Musical category. Closed set; wire values are uppercase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordCategory {
    Rock,
    Jazz,
    Pop,
    Classical,
    HipHop,
    Electronic,
    Country,
    Blues,
}

impl RecordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Rock => "ROCK",
            RecordCategory::Jazz => "JAZZ",
            RecordCategory::Pop => "POP",
            RecordCategory::Classical => "CLASSICAL",
            RecordCategory::HipHop => "HIPHOP",
            RecordCategory::Electronic => "ELECTRONIC",
            RecordCategory::Country => "COUNTRY",
            RecordCategory::Blues => "BLUES",
        }
    }
}

impl core::fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RecordCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROCK" => Ok(RecordCategory::Rock),
            "JAZZ" => Ok(RecordCategory::Jazz),
            "POP" => Ok(RecordCategory::Pop),
            "CLASSICAL" => Ok(RecordCategory::Classical),
            "HIPHOP" => Ok(RecordCategory::HipHop),
            "ELECTRONIC" => Ok(RecordCategory::Electronic),
            "COUNTRY" => Ok(RecordCategory::Country),
            "BLUES" => Ok(RecordCategory::Blues),
            other => Err(DomainError::validation(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

/// A sellable catalog record with a stock count.
///
/// `qty` never goes negative; every stock change flows through the store's
/// `adjust_stock` primitive, which applies [`apply_stock_delta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub artist: String,
    pub album: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price_cents: u64,
    pub qty: i64,
    pub format: RecordFormat,
    pub category: RecordCategory,
    /// MusicBrainz release id, when known.
    pub mbid: Option<String>,
    /// Track titles in release order; empty when never enriched.
    pub tracklist: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Uniqueness key over the (artist, album, format) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub artist: String,
    pub album: String,
    pub format: RecordFormat,
}

/// Validated input for creating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub artist: String,
    pub album: String,
    pub price_cents: u64,
    pub qty: i64,
    pub format: RecordFormat,
    pub category: RecordCategory,
    pub mbid: Option<String>,
}

impl Record {
    /// Build a new record from validated input.
    pub fn new(
        input: NewRecord,
        tracklist: Vec<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if input.artist.trim().is_empty() {
            return Err(DomainError::validation("artist cannot be empty"));
        }
        if input.album.trim().is_empty() {
            return Err(DomainError::validation("album cannot be empty"));
        }
        if input.qty < 0 {
            return Err(DomainError::validation("qty cannot be negative"));
        }

        Ok(Self {
            id: RecordId::new(),
            artist: input.artist,
            album: input.album,
            price_cents: input.price_cents,
            qty: input.qty,
            format: input.format,
            category: input.category,
            mbid: input.mbid,
            tracklist,
            created_at: now,
            last_modified: now,
        })
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            artist: self.artist.clone(),
            album: self.album.clone(),
            format: self.format,
        }
    }
}

impl Entity for Record {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial field update for a record.
///
/// Stock is deliberately absent: the quantity field is only ever written by
/// the store's `adjust_stock` primitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub price_cents: Option<u64>,
    pub format: Option<RecordFormat>,
    pub category: Option<RecordCategory>,
    pub mbid: Option<String>,
    pub tracklist: Option<Vec<String>>,
}

impl RecordPatch {
    /// True when the patch touches the (artist, album, format) triple.
    pub fn touches_key(&self) -> bool {
        self.artist.is_some() || self.album.is_some() || self.format.is_some()
    }

    /// Apply the patch onto an existing record, bumping `last_modified`.
    pub fn apply(self, record: &mut Record, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(artist) = &self.artist {
            if artist.trim().is_empty() {
                return Err(DomainError::validation("artist cannot be empty"));
            }
        }
        if let Some(album) = &self.album {
            if album.trim().is_empty() {
                return Err(DomainError::validation("album cannot be empty"));
            }
        }

        if let Some(artist) = self.artist {
            record.artist = artist;
        }
        if let Some(album) = self.album {
            record.album = album;
        }
        if let Some(price_cents) = self.price_cents {
            record.price_cents = price_cents;
        }
        if let Some(format) = self.format {
            record.format = format;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(mbid) = self.mbid {
            record.mbid = Some(mbid);
        }
        if let Some(tracklist) = self.tracklist {
            record.tracklist = tracklist;
        }
        record.last_modified = now;
        Ok(())
    }
}

/// Compute the stock level after applying `delta`, refusing to go negative.
///
/// The error carries the quantity that was available at the time of the
/// attempt.
pub fn apply_stock_delta(qty: i64, delta: i64) -> DomainResult<i64> {
    let next = qty
        .checked_add(delta)
        .ok_or_else(|| DomainError::validation("stock adjustment overflows"))?;
    if next < 0 {
        return Err(DomainError::insufficient_stock(qty));
    }
    Ok(next)
}
