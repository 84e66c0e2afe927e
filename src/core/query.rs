//! Query parameters and pagination utilities

use crate::core::error::ValidationError;
use serde::Deserialize;

/// Raw list parameters as they arrive in the query string
///
/// Values are kept as strings so malformed input can be reported instead
/// of silently replaced by a default.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_orders(
///     Query(query): Query<ListQuery>,
/// ) -> Result<Json<Vec<OrderView>>, LogisticsError> {
///     let pagination = query.pagination(&PaginationPolicy::default())?;
/// }
///
/// // Usage:
/// GET /orders?page=2&limit=10
/// GET /orders?status=completed
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Page number (starts at 1)
    pub page: Option<String>,

    /// Number of items per page
    pub limit: Option<String>,

    /// Status filter
    pub status: Option<String>,
}

/// Defaults and bounds applied to list parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed page number
    pub page: u64,
    /// Page size, at least 1
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of records before this page
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, PaginationPolicy::default().default_limit)
    }
}

impl ListQuery {
    /// Resolve the page window
    ///
    /// Absent or empty values take their default. Anything else must be a
    /// positive integer; `limit` is clamped to the policy maximum.
    pub fn pagination(&self, policy: &PaginationPolicy) -> Result<Pagination, ValidationError> {
        let page = parse_positive("page", self.page.as_deref())?.unwrap_or(1);
        let limit = parse_positive("limit", self.limit.as_deref())?
            .unwrap_or(policy.default_limit)
            .min(policy.max_limit);
        Ok(Pagination::new(page, limit))
    }

    /// Status filter, with an empty value treated as absent
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

fn parse_positive(parameter: &str, raw: Option<&str>) -> Result<Option<u64>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ValidationError::InvalidQuery {
            parameter: parameter.to_string(),
            value: raw.to_string(),
            message: "must be a positive integer".to_string(),
        }),
    }
}
