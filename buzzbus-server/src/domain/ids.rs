//! Upstream identifier types.

use std::fmt;

/// Identifier of a transit route.
///
/// TransLoc sends route ids as JSON numbers or strings depending on the
/// endpoint; both normalize to the decimal string form.
///
/// # Examples
///
/// ```
/// use buzzbus_server::domain::RouteId;
///
/// let route = RouteId::new("12");
/// assert_eq!(route.as_str(), "12");
/// assert_eq!(route.to_string(), "12");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier correlating a stop with one specific route.
///
/// Distinct from a stop's global id: the same kerbside stop served by two
/// routes has two route-stop ids. Arrival estimates are keyed by this.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteStopId(String);

impl RouteStopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteStopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteStopId({})", self.0)
    }
}

impl fmt::Display for RouteStopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", RouteId::new("7")), "RouteId(7)");
        assert_eq!(format!("{:?}", RouteStopId::new("301")), "RouteStopId(301)");
    }

    #[test]
    fn route_ids_order_lexically() {
        let mut ids = vec![RouteId::new("b"), RouteId::new("a"), RouteId::new("c")];
        ids.sort();
        assert_eq!(ids, vec![RouteId::new("a"), RouteId::new("b"), RouteId::new("c")]);
    }
}
