//! Promotion query filter resolution.
//!
//! Resolves the optional query parameters of `GET /promotions` into a single
//! [`PromotionFilter`]. When more than one parameter is present a fixed
//! precedence applies and the rest are ignored:
//! id, active, name, product_id, promotion_type.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Raised when a filter parameter cannot be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error(
        "Invalid value for query parameter 'active'. \
         Accepted: true, false, 1, 0, yes, no (case-insensitive). Received: '{0}'"
    )]
    InvalidActiveValue(String),
}

/// Raw query parameters accepted by `GET /promotions`.
///
/// Everything arrives as an optional string; interpretation (including
/// integer parsing) happens in [`resolve_filter`] so a malformed value can
/// be handled per the filter's own contract instead of failing extraction.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub id: Option<String>,
    pub active: Option<String>,
    pub name: Option<String>,
    pub product_id: Option<String>,
    pub promotion_type: Option<String>,
}

/// A resolved listing predicate for the promotion store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionFilter {
    /// Every stored promotion
    All,
    /// Exact id match; zero or one result
    ById(i64),
    /// Promotions whose window contains `on` (inclusive both ends)
    ActiveOn(NaiveDate),
    /// Promotions whose window does not contain `on`
    InactiveOn(NaiveDate),
    /// Exact name match
    ByName(String),
    /// Exact product reference match
    ByProductId(i64),
    /// Exact promotion type match
    ByType(String),
    /// Matches nothing, e.g. a non-integer id was supplied
    Nothing,
}

/// Resolve query parameters into a single filter.
///
/// `today` is the as-of date for the active/inactive window checks; it is
/// passed in explicitly so resolution stays a pure function. An empty-string
/// parameter counts as absent and falls through to the next filter in
/// precedence order.
pub fn resolve_filter(params: &ListParams, today: NaiveDate) -> Result<PromotionFilter, FilterError> {
    if let Some(id_raw) = present(&params.id) {
        return Ok(match id_raw.trim().parse::<i64>() {
            Ok(id) => PromotionFilter::ById(id),
            Err(_) => PromotionFilter::Nothing,
        });
    }

    // `active` is strict: any value that is not a recognised boolean
    // encoding is a client error, never a silent default.
    if let Some(active_raw) = params.active.as_deref() {
        return match parse_bool_strict(active_raw) {
            Some(true) => Ok(PromotionFilter::ActiveOn(today)),
            Some(false) => Ok(PromotionFilter::InactiveOn(today)),
            None => Err(FilterError::InvalidActiveValue(active_raw.to_string())),
        };
    }

    if let Some(name) = present(&params.name) {
        return Ok(PromotionFilter::ByName(name.trim().to_string()));
    }

    if let Some(product_raw) = present(&params.product_id) {
        return Ok(match product_raw.trim().parse::<i64>() {
            Ok(product_id) => PromotionFilter::ByProductId(product_id),
            Err(_) => PromotionFilter::Nothing,
        });
    }

    if let Some(ptype) = present(&params.promotion_type) {
        let trimmed = ptype.trim();
        return Ok(if trimmed.is_empty() {
            PromotionFilter::Nothing
        } else {
            PromotionFilter::ByType(trimmed.to_string())
        });
    }

    Ok(PromotionFilter::All)
}

/// Strictly parse a query-string boolean.
///
/// Accepted (case-insensitive, trimmed): `true/1/yes` and `false/0/no`.
/// Anything else returns `None` and the caller decides how to fail.
pub fn parse_bool_strict(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
