//! Query vocabulary for list endpoints
//!
//! Pagination (`page` / `limit`) and the `order` parameter, which is a JSON
//! object mapping field names to a direction, e.g. `{"name":1,"stars":-1}`.

use serde::Serialize;

use crate::error::app_error::{AppError, AppResult};

/// Default page size when the client omits `limit`
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Validated pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build from raw query values.
    ///
    /// `page` is at least 1; `limit` is clamped to `1..=max_limit`.
    pub fn new(page: Option<u64>, limit: Option<u64>, max_limit: u64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, max_limit),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    /// Wrap a fetched page of items
    pub fn into_page<T>(self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            total_pages: self.total_pages(total),
            current_page: self.page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, 100)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(1) => Some(SortDirection::Asc),
                Some(-1) => Some(SortDirection::Desc),
                _ => None,
            },
            serde_json::Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "asc" | "ascending" | "1" => Some(SortDirection::Asc),
                "desc" | "descending" | "-1" => Some(SortDirection::Desc),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A sortable field of some collection.
///
/// `column` must return a trusted, constant SQL expression: it is pasted into
/// `ORDER BY` verbatim.
pub trait SortField: Sized + Copy {
    fn parse(key: &str) -> Option<Self>;
    fn column(&self) -> &'static str;
}

/// A single `ORDER BY` term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Sort<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    fn to_sql(self) -> String {
        format!("{} {}", self.field.column(), self.direction.as_sql())
    }
}

/// Parse the `order` query parameter.
///
/// `None` or a blank string yields no sort terms. Unknown fields or
/// directions are rejected with 400.
pub fn parse_order<F: SortField>(raw: Option<&str>) -> AppResult<Vec<Sort<F>>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        AppError::bad_request("Invalid order parameter")
            .with_action("Send order as a JSON object, e.g. {\"name\":1}")
            .with_source(e)
    })?;

    let object = value.as_object().ok_or_else(|| {
        AppError::bad_request("Invalid order parameter")
            .with_action("Send order as a JSON object, e.g. {\"name\":1}")
    })?;

    object
        .iter()
        .map(|(key, direction)| {
            let field = F::parse(key).ok_or_else(|| {
                AppError::bad_request(format!("Cannot sort by '{}'", key))
            })?;
            let direction = SortDirection::from_json(direction).ok_or_else(|| {
                AppError::bad_request(format!("Invalid sort direction for '{}'", key))
                    .with_action("Use 1, -1, \"asc\" or \"desc\"")
            })?;
            Ok(Sort::new(field, direction))
        })
        .collect()
}

/// Render sort terms as an `ORDER BY` body, falling back to `default`.
///
/// `tie_breaker` is appended last so pagination is stable.
pub fn order_by_sql<F: SortField>(sorts: &[Sort<F>], default: Sort<F>, tie_breaker: &str) -> String {
    let mut terms: Vec<String> = if sorts.is_empty() {
        vec![default.to_sql()]
    } else {
        sorts.iter().map(|s| s.to_sql()).collect()
    };
    terms.push(format!("{} ASC", tie_breaker));
    terms.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Name,
        Age,
    }

    impl SortField for Field {
        fn parse(key: &str) -> Option<Self> {
            match key {
                "name" => Some(Field::Name),
                "age" => Some(Field::Age),
                _ => None,
            }
        }

        fn column(&self) -> &'static str {
            match self {
                Field::Name => "user_name",
                Field::Age => "age",
            }
        }
    }

    #[test]
    fn test_page_request_defaults() {
        let page = PageRequest::new(None, None, 100);
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps() {
        let page = PageRequest::new(Some(0), Some(0), 50);
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 1);

        let page = PageRequest::new(Some(3), Some(500), 50);
        assert_eq!(page.limit(), 50);
        assert_eq!(page.offset(), 100);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest::new(Some(1), Some(10), 100);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
    }

    #[test]
    fn test_into_page_serializes_camel_case() {
        let page = PageRequest::new(Some(2), Some(1), 100).into_page(vec![1, 2], 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 5);
        assert_eq!(json["currentPage"], 2);
    }

    #[test]
    fn test_parse_order_keeps_key_order() {
        // Not alphabetical, so a sorted map would reorder it
        let sorts = parse_order::<Field>(Some(r#"{"name":1,"age":-1}"#)).unwrap();
        assert_eq!(
            sorts,
            vec![
                Sort::new(Field::Name, SortDirection::Asc),
                Sort::new(Field::Age, SortDirection::Desc),
            ]
        );
    }

    #[test]
    fn test_parse_order_empty() {
        assert!(parse_order::<Field>(None).unwrap().is_empty());
        assert!(parse_order::<Field>(Some("  ")).unwrap().is_empty());
        assert!(parse_order::<Field>(Some("{}")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_order_rejects_bad_input() {
        assert_eq!(parse_order::<Field>(Some("name")).unwrap_err().status_code(), 400);
        assert_eq!(parse_order::<Field>(Some("[1]")).unwrap_err().status_code(), 400);
        assert_eq!(
            parse_order::<Field>(Some(r#"{"password":1}"#)).unwrap_err().status_code(),
            400
        );
        assert_eq!(
            parse_order::<Field>(Some(r#"{"name":2}"#)).unwrap_err().status_code(),
            400
        );
    }

    #[test]
    fn test_order_by_sql() {
        let default = Sort::new(Field::Name, SortDirection::Asc);
        assert_eq!(order_by_sql(&[], default, "user_id"), "user_name ASC, user_id ASC");

        let sorts = [Sort::new(Field::Age, SortDirection::Desc)];
        assert_eq!(order_by_sql(&sorts, default, "user_id"), "age DESC, user_id ASC");
    }
}
