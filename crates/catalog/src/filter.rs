//! Listing filter predicates and the paginated result envelope.

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordCategory, RecordFormat};

/// Catalog listing filter.
///
/// A free-text search term takes precedence: when `q` is present the exact
/// artist/album filters are ignored. Format and category compose
/// conjunctively with whichever predicate is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub q: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub format: Option<RecordFormat>,
    pub category: Option<RecordCategory>,
}

impl RecordFilter {
    /// Whether `record` satisfies this filter.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(q) = &self.q {
            if !text_matches(q, record) {
                return false;
            }
        } else {
            if let Some(artist) = &self.artist {
                if record.artist.to_lowercase() != artist.to_lowercase() {
                    return false;
                }
            }
            if let Some(album) = &self.album {
                if record.album.to_lowercase() != album.to_lowercase() {
                    return false;
                }
            }
        }

        if let Some(format) = self.format {
            if record.format != format {
                return false;
            }
        }
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }

        true
    }
}

/// Full-text match over artist, album, category, and format: every
/// whitespace-separated term must appear somewhere (case-insensitive).
fn text_matches(q: &str, record: &Record) -> bool {
    let haystack = format!(
        "{} {} {} {}",
        record.artist, record.album, record.category, record.format
    )
    .to_lowercase();

    let mut terms = q.split_whitespace().peekable();
    if terms.peek().is_none() {
        return true;
    }
    terms.all(|term| haystack.contains(&term.to_lowercase()))
}

/// One page of catalog listing results, as cached and as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_records: u64,
}

impl Pagination {
    /// `limit` must be positive; callers default it before reaching here.
    pub fn new(page: u32, limit: u32, total_records: u64) -> Self {
        Self {
            page,
            limit,
            total_pages: total_records.div_ceil(limit as u64),
            total_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use chrono::Utc;

    fn record(artist: &str, album: &str, format: RecordFormat, category: RecordCategory) -> Record {
        Record::new(
            NewRecord {
                artist: artist.to_string(),
                album: album.to_string(),
                price_cents: 1_999,
                qty: 5,
                format,
                category,
                mbid: None,
            },
            Vec::new(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn artist_filter_is_case_insensitive_full_field_equality() {
        let beatles = record("The Beatles", "Abbey Road", RecordFormat::Vinyl, RecordCategory::Rock);
        let tribute = record(
            "The Beatles Tribute",
            "Abbey Road Live",
            RecordFormat::Vinyl,
            RecordCategory::Rock,
        );

        let filter = RecordFilter {
            artist: Some("the beatles".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&beatles));
        assert!(!filter.matches(&tribute));
    }

    #[test]
    fn text_search_takes_precedence_over_exact_filters() {
        let beatles = record("The Beatles", "Abbey Road", RecordFormat::Vinyl, RecordCategory::Rock);

        // The artist filter alone would exclude this record; q wins.
        let filter = RecordFilter {
            q: Some("beatles".to_string()),
            artist: Some("Pink Floyd".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&beatles));
    }

    #[test]
    fn text_search_spans_category_and_format() {
        let rec = record("Miles Davis", "Kind of Blue", RecordFormat::Cd, RecordCategory::Jazz);

        let by_category = RecordFilter {
            q: Some("jazz".to_string()),
            ..Default::default()
        };
        let by_format = RecordFilter {
            q: Some("cd".to_string()),
            ..Default::default()
        };

        assert!(by_category.matches(&rec));
        assert!(by_format.matches(&rec));
    }

    #[test]
    fn all_search_terms_must_match() {
        let rec = record("Miles Davis", "Kind of Blue", RecordFormat::Cd, RecordCategory::Jazz);

        let both = RecordFilter {
            q: Some("miles blue".to_string()),
            ..Default::default()
        };
        let one_misses = RecordFilter {
            q: Some("miles purple".to_string()),
            ..Default::default()
        };

        assert!(both.matches(&rec));
        assert!(!one_misses.matches(&rec));
    }

    #[test]
    fn format_and_category_compose_conjunctively_with_search() {
        let vinyl = record("The Beatles", "Abbey Road", RecordFormat::Vinyl, RecordCategory::Rock);
        let cd = record("The Beatles", "Let It Be", RecordFormat::Cd, RecordCategory::Rock);

        let filter = RecordFilter {
            q: Some("beatles".to_string()),
            format: Some(RecordFormat::Vinyl),
            ..Default::default()
        };

        assert!(filter.matches(&vinyl));
        assert!(!filter.matches(&cd));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let rec = record("Nina Simone", "Pastel Blues", RecordFormat::Vinyl, RecordCategory::Blues);
        assert!(RecordFilter::default().matches(&rec));
    }

    #[test]
    fn pagination_rounds_total_pages_up() {
        let p = Pagination::new(1, 20, 41);
        assert_eq!(p.total_pages, 3);
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
    }
}
