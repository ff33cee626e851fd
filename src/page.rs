use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

pub const ASC: &str = "asc";
pub const DESC: &str = "desc";

pub const DEFAULT_PAGE_SIZE: i32 = 10;

pub const MAXIMUM_PAGE_SIZE: i32 = 50;

/// Page count reported when the row count is unknown. Callers must treat any
/// negative count as "not a number of pages".
pub const PAGE_COUNT_UNKNOWN: i64 = -1;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

/// Sort direction, parsed from the `asc`/`desc` strings the query side carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderWay {
    Asc,
    Desc,
}

impl OrderWay {
    pub fn parse(way: &str) -> Result<Self> {
        let way = way.trim();
        if way.eq_ignore_ascii_case(ASC) {
            Ok(OrderWay::Asc)
        } else if way.eq_ignore_ascii_case(DESC) {
            Ok(OrderWay::Desc)
        } else {
            Err(Error::InvalidOrderWay {
                way: way.to_owned(),
            })
        }
    }
}

fn default_page_now() -> i32 {
    1
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

/// Request side of a paged lookup: which page, how many rows, sorted how.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, Builder)]
pub struct PageQuery {
    #[serde(rename = "pageNow", default = "default_page_now")]
    #[validate(range(min = 1, max = 65535))]
    #[builder(default = "1")]
    pub page_now: i32,
    #[serde(rename = "pageSize", default = "default_page_size")]
    #[validate(range(min = 1, max = MAXIMUM_PAGE_SIZE))]
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    pub page_size: i32,
    #[serde(rename = "orderBy", skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub order_by: Option<String>,
    #[serde(rename = "orderWay", skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub order_way: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_now: default_page_now(),
            page_size: default_page_size(),
            order_by: None,
            order_way: None,
        }
    }
}

impl PageQuery {
    pub fn offset(&self) -> usize {
        (self.page_now.max(1) - 1) as usize * self.page_size.max(0) as usize
    }

    /// Requested ordering, or None unless both the field and the way are set
    /// to something non-blank. A present but unparseable way is an error.
    pub fn order(&self) -> Result<Option<(&str, OrderWay)>> {
        match (non_blank(&self.order_by), non_blank(&self.order_way)) {
            (Some(field), Some(way)) => Ok(Some((field, OrderWay::parse(way)?))),
            _ => Ok(None),
        }
    }
}

/// One page out of a larger ordered result set, together with the metadata a
/// consumer needs to render pagination controls without re-deriving the
/// arithmetic. Produced once by the query layer, then read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based index of this page.
    pub page_now: i32,
    /// Rows requested per page. 0 is the unset, degenerate state.
    pub page_size: i32,
    /// Total matching rows across all pages; negative means unknown.
    pub row_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_way: Option<String>,
    pub items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            page_now: 1,
            page_size: 0,
            row_count: 0,
            order_by: None,
            order_way: None,
            items: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Builds the page a query produced: navigation fields come from the
    /// query, row_count and items from its execution.
    pub fn for_query(query: &PageQuery, row_count: i64, items: Vec<T>) -> Self {
        Self {
            page_now: query.page_now,
            page_size: query.page_size,
            row_count,
            order_by: query.order_by.clone(),
            order_way: query.order_way.clone(),
            items,
        }
    }

    /// Total number of pages, derived from row_count and page_size on every
    /// call. An unknown row count (negative) yields [`PAGE_COUNT_UNKNOWN`]
    /// no matter what the other fields hold; a page_size of zero or less can
    /// never produce a count and is rejected; zero rows means zero pages.
    pub fn page_count(&self) -> Result<i64> {
        if self.row_count < 0 {
            return Ok(PAGE_COUNT_UNKNOWN);
        }
        if self.page_size <= 0 {
            return Err(Error::InvalidPageSize {
                page_size: self.page_size,
            });
        }
        if self.row_count == 0 {
            return Ok(0);
        }
        Ok((self.row_count - 1) / i64::from(self.page_size) + 1)
    }

    pub fn has_next(&self) -> Result<bool> {
        Ok(i64::from(self.page_now) + 1 <= self.page_count()?)
    }

    /// Number of the next page; the last page answers with its own number.
    pub fn next_page(&self) -> Result<i32> {
        Ok(if self.has_next()? {
            self.page_now.saturating_add(1)
        } else {
            self.page_now
        })
    }

    pub fn has_prev(&self) -> bool {
        self.page_now > 1
    }

    /// Number of the previous page; the first page answers with its own number.
    pub fn prev_page(&self) -> i32 {
        if self.has_prev() {
            self.page_now - 1
        } else {
            self.page_now
        }
    }

    /// True only when both the sort field and the sort way are non-blank.
    pub fn is_order_set(&self) -> bool {
        non_blank(&self.order_by).is_some() && non_blank(&self.order_way).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_now: i32, page_size: i32, row_count: i64) -> Page<u32> {
        Page {
            page_now,
            page_size,
            row_count,
            ..Page::default()
        }
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page(1, 10, 25).page_count().unwrap(), 3);
        assert_eq!(page(1, 10, 30).page_count().unwrap(), 3);
        assert_eq!(page(1, 10, 31).page_count().unwrap(), 4);
        assert_eq!(page(1, 10, 1).page_count().unwrap(), 1);
        assert_eq!(page(1, 10, 10).page_count().unwrap(), 1);
        assert_eq!(page(1, 1, 5).page_count().unwrap(), 5);
    }

    #[test]
    fn zero_rows_means_zero_pages() {
        let empty = page(1, 10, 0);
        assert_eq!(empty.page_count().unwrap(), 0);
        assert!(!empty.has_next().unwrap());
        assert_eq!(empty.next_page().unwrap(), 1);
    }

    #[test]
    fn unknown_row_count_is_a_sentinel() {
        assert_eq!(page(1, 10, -1).page_count().unwrap(), PAGE_COUNT_UNKNOWN);
        assert_eq!(page(7, 0, -1).page_count().unwrap(), PAGE_COUNT_UNKNOWN);
        assert_eq!(page(3, 25, -42).page_count().unwrap(), PAGE_COUNT_UNKNOWN);
        // No next page can be claimed when the count is unknown.
        assert!(!page(1, 10, -1).has_next().unwrap());
        assert_eq!(page(4, 10, -1).next_page().unwrap(), 4);
    }

    #[test]
    fn degenerate_page_size_is_rejected() {
        assert!(matches!(
            page(1, 0, 25).page_count(),
            Err(Error::InvalidPageSize { page_size: 0 })
        ));
        assert!(matches!(
            page(1, -3, 25).page_count(),
            Err(Error::InvalidPageSize { page_size: -3 })
        ));
        // Zero rows with a zero size is still a configuration error.
        assert!(page(1, 0, 0).page_count().is_err());
        assert!(page(1, 0, 25).has_next().is_err());
        assert!(page(1, 0, 25).next_page().is_err());
    }

    #[test]
    fn first_page_navigation() {
        let first = page(1, 10, 25);
        assert_eq!(first.page_count().unwrap(), 3);
        assert!(first.has_next().unwrap());
        assert_eq!(first.next_page().unwrap(), 2);
        assert!(!first.has_prev());
        assert_eq!(first.prev_page(), 1);
    }

    #[test]
    fn last_page_navigation() {
        let last = page(3, 10, 25);
        assert_eq!(last.page_count().unwrap(), 3);
        assert!(!last.has_next().unwrap());
        assert_eq!(last.next_page().unwrap(), 3);
        assert!(last.has_prev());
        assert_eq!(last.prev_page(), 2);
    }

    #[test]
    fn out_of_range_page_now_still_clamps() {
        let zeroth = page(0, 10, 25);
        assert!(!zeroth.has_prev());
        assert_eq!(zeroth.prev_page(), 0);
        assert!(zeroth.has_next().unwrap());

        let negative = page(-2, 10, 25);
        assert!(!negative.has_prev());
        assert_eq!(negative.prev_page(), -2);

        // The integer extremes still clamp instead of wrapping around.
        let floor = page(i32::MIN, 10, 25);
        assert!(!floor.has_prev());
        assert_eq!(floor.prev_page(), i32::MIN);

        let ceiling = page(i32::MAX, 1, i64::MAX);
        assert!(ceiling.has_next().unwrap());
        assert_eq!(ceiling.next_page().unwrap(), i32::MAX);
    }

    #[test]
    fn order_is_set_only_when_both_sides_are_non_blank() {
        let mut p = page(1, 10, 0);
        assert!(!p.is_order_set());
        p.order_by = Some("name".into());
        assert!(!p.is_order_set());
        p.order_way = Some("   ".into());
        assert!(!p.is_order_set());
        p.order_way = Some("desc".into());
        assert!(p.is_order_set());
        p.order_by = Some(String::new());
        assert!(!p.is_order_set());
    }

    #[test]
    fn page_serializes_with_wire_names() {
        let p = Page {
            page_now: 2,
            page_size: 10,
            row_count: 25,
            order_by: Some("name".into()),
            order_way: Some(ASC.into()),
            items: vec!["a".to_string(), "b".to_string()],
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"pageNow\":2"));
        assert!(json.contains("\"pageSize\":10"));
        assert!(json.contains("\"rowCount\":25"));
        assert!(json.contains("\"orderBy\":\"name\""));
        assert!(json.contains("\"orderWay\":\"asc\""));
        assert!(json.contains("\"items\":[\"a\",\"b\"]"));

        let back: Page<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn unset_order_fields_stay_off_the_wire() {
        let json = serde_json::to_string(&page(1, 10, 0)).unwrap();
        assert!(!json.contains("orderBy"));
        assert!(!json.contains("orderWay"));
    }

    #[test]
    fn query_defaults_and_offset() {
        let query = PageQuery::default();
        assert_eq!(query.page_now, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let third = PageQuery {
            page_now: 3,
            page_size: 10,
            ..PageQuery::default()
        };
        assert_eq!(third.offset(), 20);

        // A zeroth page is treated as the first when computing the offset.
        let zeroth = PageQuery {
            page_now: 0,
            ..PageQuery::default()
        };
        assert_eq!(zeroth.offset(), 0);
    }

    #[test]
    fn query_deserializes_with_defaults() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page_now, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.order_by, None);

        let query: PageQuery =
            serde_json::from_str(r#"{"pageNow":4,"pageSize":25,"orderBy":"name","orderWay":"desc"}"#)
                .unwrap();
        assert_eq!(query.page_now, 4);
        assert_eq!(query.page_size, 25);
        assert_eq!(query.order_by.as_deref(), Some("name"));
        assert_eq!(query.order_way.as_deref(), Some("desc"));
    }

    #[test]
    fn query_validation_bounds() {
        assert!(PageQuery::default().validate().is_ok());
        let too_big = PageQuery {
            page_size: MAXIMUM_PAGE_SIZE + 1,
            ..PageQuery::default()
        };
        assert!(too_big.validate().is_err());
        let zero_page = PageQuery {
            page_now: 0,
            ..PageQuery::default()
        };
        assert!(zero_page.validate().is_err());
        let zero_size = PageQuery {
            page_size: 0,
            ..PageQuery::default()
        };
        assert!(zero_size.validate().is_err());
    }

    #[test]
    fn query_builder_fills_in_defaults() {
        let query = PageQueryBuilder::default()
            .page_now(2)
            .order_by("name")
            .order_way(ASC)
            .build()
            .unwrap();
        assert_eq!(query.page_now, 2);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.order().unwrap(), Some(("name", OrderWay::Asc)));
    }

    #[test]
    fn query_order_requires_both_sides() {
        let unordered = PageQuery::default();
        assert_eq!(unordered.order().unwrap(), None);

        let half = PageQueryBuilder::default()
            .order_by("name")
            .build()
            .unwrap();
        assert_eq!(half.order().unwrap(), None);

        let blank_way = PageQueryBuilder::default()
            .order_by("name")
            .order_way("  ")
            .build()
            .unwrap();
        assert_eq!(blank_way.order().unwrap(), None);
    }

    #[test]
    fn query_order_way_parses_loosely_but_never_guesses() {
        let shouting = PageQueryBuilder::default()
            .order_by("name")
            .order_way(" DESC ")
            .build()
            .unwrap();
        assert_eq!(shouting.order().unwrap(), Some(("name", OrderWay::Desc)));

        let sideways = PageQueryBuilder::default()
            .order_by("name")
            .order_way("sideways")
            .build()
            .unwrap();
        assert!(matches!(
            sideways.order(),
            Err(Error::InvalidOrderWay { way }) if way == "sideways"
        ));
    }

    #[test]
    fn for_query_copies_the_navigation_fields() {
        let query = PageQueryBuilder::default()
            .page_now(2)
            .page_size(5)
            .order_by("name")
            .order_way(DESC)
            .build()
            .unwrap();
        let p = Page::for_query(&query, 12, vec![1, 2, 3, 4, 5]);
        assert_eq!(p.page_now, 2);
        assert_eq!(p.page_size, 5);
        assert_eq!(p.row_count, 12);
        assert_eq!(p.order_by.as_deref(), Some("name"));
        assert_eq!(p.order_way.as_deref(), Some("desc"));
        assert_eq!(p.page_count().unwrap(), 3);
        assert!(p.is_order_set());
    }
}
