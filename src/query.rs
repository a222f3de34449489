//! Typed backend queries.
//!
//! The backend understands whole-record indexing plus boolean/range filters,
//! so queries are built as data: a conjunction of [`FilterClause`]s with a
//! result cap and an optional record-type restriction. The clause shapes are
//! serde-serializable so a remote client can ship them over the wire as
//! JSON; the in-memory backend evaluates them directly through
//! [`SearchQuery::matches`].

use serde::Serialize;
use serde_json::Value;

/// Fixed maximum number of hits a query may return. Queries matching more
/// records than this are silently truncated; there is no pagination.
pub const MAX_RANGE_HITS: usize = 10_000;

/// Numeric bounds for a range clause. Unset bounds do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<i64>,
}

/// One conjunct of a query filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterClause {
    /// Exact field equality.
    Term { field: String, value: Value },
    /// Numeric field within bounds.
    Range { field: String, bounds: RangeBounds },
}

impl FilterClause {
    pub fn term(field: &str, value: impl Into<Value>) -> Self {
        Self::Term {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn range_lt(field: &str, value: i64) -> Self {
        Self::Range {
            field: field.to_string(),
            bounds: RangeBounds {
                lt: Some(value),
                ..RangeBounds::default()
            },
        }
    }

    pub fn range_gte(field: &str, value: i64) -> Self {
        Self::Range {
            field: field.to_string(),
            bounds: RangeBounds {
                gte: Some(value),
                ..RangeBounds::default()
            },
        }
    }

    /// Evaluate this clause against a stored record.
    ///
    /// A missing field never matches. Range clauses require a numeric field.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            FilterClause::Term { field, value } => record.get(field) == Some(value),
            FilterClause::Range { field, bounds } => {
                let Some(actual) = record.get(field).and_then(Value::as_i64) else {
                    return false;
                };
                bounds.lt.is_none_or(|bound| actual < bound)
                    && bounds.lte.is_none_or(|bound| actual <= bound)
                    && bounds.gt.is_none_or(|bound| actual > bound)
                    && bounds.gte.is_none_or(|bound| actual >= bound)
            }
        }
    }
}

/// A structured backend query: a conjunction of filters, a result cap, and
/// an optional record-type restriction. An empty filter list matches every
/// record (the match-all form).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    pub filters: Vec<FilterClause>,
}

impl SearchQuery {
    /// Evaluate the whole query against one stored record.
    pub fn matches(&self, record_type: &str, record: &Value) -> bool {
        if let Some(wanted) = &self.record_type {
            if wanted != record_type {
                return false;
            }
        }
        self.filters.iter().all(|clause| clause.matches(record))
    }
}

/// Build the overlap query selecting every record of `document_id` whose
/// stored interval intersects `[start, end)`: `record.start < end` and
/// `record.end >= start`. No record-type restriction; chunk, semantics, and
/// typography hits all come back and are partitioned by the caller.
pub fn range_query(document_id: &str, start: usize, end: usize) -> SearchQuery {
    SearchQuery {
        size: MAX_RANGE_HITS,
        record_type: None,
        filters: vec![
            FilterClause::term("document_id", document_id),
            FilterClause::range_lt("start", end as i64),
            FilterClause::range_gte("end", start as i64),
        ],
    }
}

/// Build the match-all query restricted to one record type, used to
/// enumerate structure records.
pub fn match_all(record_type: &str) -> SearchQuery {
    SearchQuery {
        size: MAX_RANGE_HITS,
        record_type: Some(record_type.to_string()),
        filters: Vec::new(),
    }
}
