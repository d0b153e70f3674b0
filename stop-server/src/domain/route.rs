//! Route types and natural ordering of route codes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Route identifier from the schedule dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub String);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A route as riders see it, e.g. bus "12A".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub id: RouteId,
    pub short_name: String,
}

/// Natural sort key for a route short name.
///
/// A leading run of digits compares numerically, the remainder lexically,
/// so "9" < "12A" < "100".
///
/// # Examples
///
/// ```
/// use stop_server::domain::RouteSortKey;
///
/// let key = RouteSortKey::of("12A");
/// assert_eq!(key.numeric, 12);
/// assert_eq!(key.suffix, "A");
///
/// // No leading digits: the whole code is the suffix
/// let key = RouteSortKey::of("A1");
/// assert_eq!(key.numeric, 0);
/// assert_eq!(key.suffix, "A1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteSortKey {
    /// Leading digit run as a number, 0 if there is none.
    /// Saturates at `u64::MAX` for absurdly long runs.
    pub numeric: u64,
    /// Everything after the leading digit run.
    pub suffix: String,
}

impl RouteSortKey {
    pub fn of(short_name: &str) -> Self {
        let split = short_name
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(short_name.len());
        let (digits, suffix) = short_name.split_at(split);

        let numeric = if digits.is_empty() {
            0
        } else {
            digits.parse().unwrap_or(u64::MAX)
        };

        Self {
            numeric,
            suffix: suffix.to_string(),
        }
    }
}

/// Compare two route short names by `(numeric, suffix, name)`.
pub fn compare_route_codes(a: &str, b: &str) -> Ordering {
    RouteSortKey::of(a)
        .cmp(&RouteSortKey::of(b))
        .then_with(|| a.cmp(b))
}

/// Sort routes into natural route-code order.
pub fn sort_routes(routes: &mut [Route]) {
    routes.sort_by(|a, b| compare_route_codes(&a.short_name, &b.short_name));
}
