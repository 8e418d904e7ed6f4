//! Translation of API query parameters into filter and pagination descriptors.

use std::collections::HashMap;

use crate::error::Error;
use crate::types::Result;

/// Fields of the issuance log that may be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Certificate subject, stored in the `sub` column
    Subject,
}

impl FilterField {
    /// Every field exposed through `filter[...]`
    pub const ALL: [FilterField; 1] = [FilterField::Subject];

    /// Name used in the `filter[<name>]` query key
    pub fn api_name(&self) -> &'static str {
        match self {
            FilterField::Subject => "subject",
        }
    }

    /// Column in the issuance log
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Subject => "sub",
        }
    }
}

/// Substring filter over one allow-listed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: FilterField,
    pub value: String,
}

/// Page selection, both values positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub per_page: u32,
    pub page: u32,
}

impl Pagination {
    /// Number of rows to return
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Zero-based row offset of the first row on this page
    pub fn offset(&self) -> i64 {
        i64::from(self.per_page).saturating_mul(i64::from(self.page) - 1)
    }
}

/// Read the `filter[<field>]` parameter, if any
///
/// Only one filter is applied. With several recognized keys present, whichever
/// is found first wins and no precedence between them is promised.
pub fn parse_filter(params: &HashMap<String, String>) -> Option<Filter> {
    FilterField::ALL.iter().find_map(|field| {
        params
            .get(&format!("filter[{}]", field.api_name()))
            .filter(|value| !value.is_empty())
            .map(|value| Filter {
                field: *field,
                value: value.clone(),
            })
    })
}

/// Read the `per_page` and `page` parameters
///
/// Returns `None` when neither is given. A missing `per_page` falls back to
/// `default_per_page` and a missing `page` to the first page.
pub fn parse_pagination(
    params: &HashMap<String, String>,
    default_per_page: u32,
) -> Result<Option<Pagination>> {
    let per_page = params.get("per_page").filter(|v| !v.is_empty());
    let page = params.get("page").filter(|v| !v.is_empty());

    if per_page.is_none() && page.is_none() {
        return Ok(None);
    }

    let per_page = match per_page {
        Some(v) => parse_positive("per_page", v)?,
        None => default_per_page,
    };

    let page = match page {
        Some(v) => parse_positive("page", v)?,
        None => 1,
    };

    if per_page == 0 {
        return Err(Error::MalformedQuery("per_page must be positive".into()));
    }

    Ok(Some(Pagination { per_page, page }))
}

fn parse_positive(name: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::MalformedQuery(format!("Invalid {}: {:?}", name, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filter_subject() {
        let filter = parse_filter(&params(&[("filter[subject]", "abc")])).unwrap();
        assert_eq!(filter.field, FilterField::Subject);
        assert_eq!(filter.field.column(), "sub");
        assert_eq!(filter.value, "abc");
    }

    #[test]
    fn test_filter_absent_or_unknown() {
        assert!(parse_filter(&params(&[])).is_none());
        assert!(parse_filter(&params(&[("filter[subject]", "")])).is_none());
        assert!(parse_filter(&params(&[("filter[requester]", "x")])).is_none());
    }

    #[test]
    fn test_no_pagination() {
        assert_eq!(parse_pagination(&params(&[]), 10).unwrap(), None);
    }

    #[test]
    fn test_pagination_defaults() {
        let p = parse_pagination(&params(&[("page", "3")]), 10).unwrap().unwrap();
        assert_eq!(p, Pagination { per_page: 10, page: 3 });
        assert_eq!(p.offset(), 20);

        let p = parse_pagination(&params(&[("per_page", "5")]), 10).unwrap().unwrap();
        assert_eq!(p, Pagination { per_page: 5, page: 1 });
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 5);
    }

    #[test]
    fn test_pagination_rejects_garbage() {
        for bad in ["abc", "-1", "0", "1.5"] {
            let result = parse_pagination(&params(&[("per_page", bad)]), 10);
            assert!(matches!(result, Err(Error::MalformedQuery(_))), "accepted {}", bad);

            let result = parse_pagination(&params(&[("page", bad)]), 10);
            assert!(matches!(result, Err(Error::MalformedQuery(_))), "accepted {}", bad);
        }
    }

    #[test]
    fn test_pagination_large_offset() {
        let p = Pagination { per_page: u32::MAX, page: u32::MAX };
        assert!(p.offset() > 0);
    }
}
