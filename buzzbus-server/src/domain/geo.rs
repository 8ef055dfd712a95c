//! Geographic points and great-circle distance.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A (latitude, longitude) pair in decimal degrees.
///
/// `GeoPoint::new` trusts its input; use [`GeoPoint::try_new`] or
/// [`GeoPoint::parse`] for anything that came from a request.
///
/// # Examples
///
/// ```
/// use buzzbus_server::domain::GeoPoint;
///
/// let tower = GeoPoint::parse("33.7726, -84.3947").unwrap();
/// assert_eq!(tower.latitude, 33.7726);
///
/// assert!(GeoPoint::try_new(91.0, 0.0).is_err());
/// assert!(GeoPoint::parse("north,south").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(DomainError::InvalidCoordinate(format!(
                "{latitude},{longitude} is not finite"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {latitude} out of range"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {longitude} out of range"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Parse the `"lat,lng"` form sent by the web client.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::InvalidCoordinate(format!(
                "expected \"lat,lng\", got {s:?}"
            )));
        };

        let parse_part = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| DomainError::InvalidCoordinate(format!("{part:?} is not a number")))
        };

        Self::try_new(parse_part(lat)?, parse_part(lng)?)
    }

    /// Great-circle distance to another point, in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }
}

impl FromStr for GeoPoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two points, in meters.
///
/// Total over finite inputs; callers are responsible for validity.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Round a distance to one decimal place for presentation.
///
/// Ranking compares unrounded values; only responses use this.
pub fn round_to_tenth(meters: f64) -> f64 {
    (meters * 10.0).round() / 10.0
}
