//! Catalog search, filter and sort
//!
//! Applied per request over a freshly built catalog, in this order:
//! 1. Search: case-insensitive substring over name, tags and author
//! 2. Filter: one of author, tag or publish-date range
//! 3. Sort: by publish date
//!
//! An empty outcome is reported as `None` so the HTTP layer can answer
//! "no sounds found" rather than an empty list.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::Sound;

/// Publish-date sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `asc` (any case) sorts ascending; any other non-empty value sorts
    /// descending; empty means no sort.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else {
            Some(Self::Descending)
        }
    }
}

/// Filter applied after search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFilter {
    /// Exact, case-insensitive author match
    Author(String),
    /// Exact, case-insensitive match against any tag
    Tag(String),
    /// Inclusive publish-date range; either end may be open
    Date {
        start: Option<String>,
        end: Option<String>,
    },
}

/// Search, filter and sort parameters of one catalog request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub filter: Option<CatalogFilter>,
    pub sort: Option<SortDirection>,
}

impl CatalogQuery {
    /// Build a query from named parameters
    ///
    /// Recognised names: `search`, `sort`, `filter` (`author`, `tag` or
    /// `date`), `author`, `tag`, `startDate`, `endDate`. A filter whose
    /// parameter is missing, or an unknown filter kind, is dropped.
    pub fn from_params<F>(param: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| param(name).filter(|v| !v.is_empty());

        let filter = non_empty("filter").and_then(|kind| match kind.to_lowercase().as_str() {
            "author" => non_empty("author").map(CatalogFilter::Author),
            "tag" => non_empty("tag").map(CatalogFilter::Tag),
            "date" => {
                let start = non_empty("startDate");
                let end = non_empty("endDate");
                if start.is_none() && end.is_none() {
                    None
                } else {
                    Some(CatalogFilter::Date { start, end })
                }
            }
            _ => None,
        });

        Self {
            search: non_empty("search"),
            filter,
            sort: param("sort").as_deref().and_then(SortDirection::parse),
        }
    }
}

/// Run `query` over `sounds`
///
/// Returns `None` when nothing is left.
pub fn apply(sounds: Vec<Sound>, query: &CatalogQuery) -> Option<Vec<Sound>> {
    let mut sounds = sounds;

    if let Some(term) = &query.search {
        let term = term.to_lowercase();
        sounds.retain(|s| matches_search(s, &term));
    }

    if let Some(filter) = &query.filter {
        sounds.retain(|s| matches_filter(s, filter));
    }

    if let Some(direction) = query.sort {
        sounds = sort_by_publish_date(sounds, direction);
    }

    if sounds.is_empty() {
        None
    } else {
        Some(sounds)
    }
}

fn matches_search(sound: &Sound, term: &str) -> bool {
    sound.name.to_lowercase().contains(term)
        || sound
            .metadata
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
        || sound.metadata.author.to_lowercase().contains(term)
}

fn matches_filter(sound: &Sound, filter: &CatalogFilter) -> bool {
    match filter {
        CatalogFilter::Author(author) => sound.metadata.author.to_lowercase() == author.to_lowercase(),
        CatalogFilter::Tag(tag) => {
            let tag = tag.to_lowercase();
            sound.metadata.tags.iter().any(|t| t.to_lowercase() == tag)
        }
        CatalogFilter::Date { start, end } => {
            let Some(published) = parse_date(&sound.metadata.publish_date) else {
                return false;
            };
            // A bound that does not parse admits nothing
            let after_start = match start {
                Some(s) => parse_date(s).is_some_and(|s| published >= s),
                None => true,
            };
            let before_end = match end {
                Some(e) => parse_date(e).is_some_and(|e| published <= e),
                None => true,
            };
            after_start && before_end
        }
    }
}

/// Stable sort; undated entries go last in either direction
fn sort_by_publish_date(sounds: Vec<Sound>, direction: SortDirection) -> Vec<Sound> {
    let mut keyed: Vec<(Option<NaiveDateTime>, Sound)> = sounds
        .into_iter()
        .map(|s| (parse_date(&s.metadata.publish_date), s))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, s)| s).collect()
}

/// Parse a publish date or range bound
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` and RFC 3339. Offsets are normalised to UTC;
/// date-only values mean midnight.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AudioRef, CoverRef, Dimensions, SoundMetadata, Statistics};
    use std::collections::HashMap;

    fn sound(id: u32, name: &str, author: &str, tags: &[&str], date: &str) -> Sound {
        Sound {
            id,
            name: name.to_string(),
            metadata: SoundMetadata {
                description: String::new(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                author: author.to_string(),
                last_updated: String::new(),
                details: String::new(),
                publish_date: date.to_string(),
            },
            audio: AudioRef {
                url: String::new(),
                format: "mp3".to_string(),
                duration: 60,
            },
            cover: CoverRef {
                url: String::new(),
                format: "jpg".to_string(),
                dimensions: Dimensions::default(),
            },
            statistics: Statistics {
                plays: 0,
                favorites: 0,
                downloads: 0,
            },
            related_sounds: Vec::new(),
        }
    }

    fn catalog() -> Vec<Sound> {
        vec![
            sound(1, "Rain Drops", "Jane Doe", &["rain", "Nature"], "2024-03-01"),
            sound(2, "Ocean Waves", "john smith", &["sea", "calm"], "2023-07-15"),
            sound(3, "Forest Birds", "Jane Doe", &["birds", "nature"], "2024-01-10"),
            sound(4, "Mystery", "Anon", &["odd"], "someday"),
        ]
    }

    fn ids(sounds: &[Sound]) -> Vec<u32> {
        sounds.iter().map(|s| s.id).collect()
    }

    fn query_from(pairs: &[(&str, &str)]) -> CatalogQuery {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CatalogQuery::from_params(|name| map.get(name).cloned())
    }

    #[test]
    fn test_no_parameters_keeps_order() {
        let result = apply(catalog(), &CatalogQuery::default()).unwrap();
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_search_name_tag_author() {
        let by_name = apply(catalog(), &query_from(&[("search", "WAVES")])).unwrap();
        assert_eq!(ids(&by_name), vec![2]);

        let by_tag = apply(catalog(), &query_from(&[("search", "natu")])).unwrap();
        assert_eq!(ids(&by_tag), vec![1, 3]);

        let by_author = apply(catalog(), &query_from(&[("search", "smith")])).unwrap();
        assert_eq!(ids(&by_author), vec![2]);
    }

    #[test]
    fn test_search_without_match_is_none() {
        assert!(apply(catalog(), &query_from(&[("search", "thunder")])).is_none());
    }

    #[test]
    fn test_author_filter_exact_case_insensitive() {
        let result = apply(
            catalog(),
            &query_from(&[("filter", "author"), ("author", "JANE DOE")]),
        )
        .unwrap();
        assert_eq!(ids(&result), vec![1, 3]);

        // Substrings do not count for filters
        assert!(apply(catalog(), &query_from(&[("filter", "author"), ("author", "Jane")])).is_none());
    }

    #[test]
    fn test_tag_filter() {
        let result = apply(catalog(), &query_from(&[("filter", "TAG"), ("tag", "nature")])).unwrap();
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_filter_without_parameter_is_noop() {
        let query = query_from(&[("filter", "author")]);
        assert!(query.filter.is_none());
        assert_eq!(apply(catalog(), &query).unwrap().len(), 4);

        let unknown = query_from(&[("filter", "colour"), ("author", "Anon")]);
        assert!(unknown.filter.is_none());
    }

    #[test]
    fn test_date_range_inclusive() {
        let result = apply(
            catalog(),
            &query_from(&[
                ("filter", "date"),
                ("startDate", "2024-01-10"),
                ("endDate", "2024-03-01"),
            ]),
        )
        .unwrap();
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_date_range_open_ended() {
        let since = apply(catalog(), &query_from(&[("filter", "date"), ("startDate", "2024-02-01")])).unwrap();
        assert_eq!(ids(&since), vec![1]);

        let until = apply(catalog(), &query_from(&[("filter", "date"), ("endDate", "2023-12-31")])).unwrap();
        assert_eq!(ids(&until), vec![2]);
    }

    #[test]
    fn test_unparseable_bound_admits_nothing() {
        assert!(apply(catalog(), &query_from(&[("filter", "date"), ("startDate", "soon")])).is_none());
    }

    #[test]
    fn test_sort_desc_non_increasing() {
        let result = apply(catalog(), &query_from(&[("sort", "desc")])).unwrap();
        assert_eq!(ids(&result), vec![1, 3, 2, 4]);

        let dates: Vec<_> = result
            .iter()
            .filter_map(|s| parse_date(&s.metadata.publish_date))
            .collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_asc_and_fallback_direction() {
        let asc = apply(catalog(), &query_from(&[("sort", "ASC")])).unwrap();
        assert_eq!(ids(&asc), vec![2, 3, 1, 4]);

        // Anything other than "asc" sorts descending
        let other = apply(catalog(), &query_from(&[("sort", "newest")])).unwrap();
        assert_eq!(ids(&other), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_search_then_filter_then_sort() {
        let result = apply(
            catalog(),
            &query_from(&[
                ("search", "nature"),
                ("filter", "author"),
                ("author", "jane doe"),
                ("sort", "asc"),
            ]),
        )
        .unwrap();
        assert_eq!(ids(&result), vec![3, 1]);
    }

    #[test]
    fn test_parse_date_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(midnight));
        assert_eq!(parse_date("2024/01/15"), Some(midnight));
        assert_eq!(parse_date("2024-01-15T00:00:00Z"), Some(midnight));
        assert_eq!(parse_date("2024-01-15T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_date("2024-01-15 00:00:00"), Some(midnight));
        assert_eq!(parse_date("not a date"), None);
    }
}
