//! Campus buildings and trip endpoint resolution.
//!
//! A trip endpoint arrives as up to three loosely typed fields: a building
//! picked from the list, coordinates from a map autocomplete, and free text
//! the user typed. [`CampusDirectory::resolve`] turns them into one point.

use thiserror::Error;

use crate::domain::GeoPoint;

/// Centre of campus, used when typed text matches no building.
pub const CAMPUS_CENTRE: GeoPoint = GeoPoint::new(33.7756, -84.3963);

/// A named campus building.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub name: String,
    pub point: GeoPoint,
}

impl Building {
    pub fn new(name: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}

/// Ways a trip endpoint may be described.
///
/// Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationQuery {
    pub building: Option<String>,
    pub coordinates: Option<String>,
    pub location: Option<String>,
}

impl LocationQuery {
    fn building(&self) -> Option<&str> {
        non_blank(&self.building)
    }

    fn coordinates(&self) -> Option<&str> {
        non_blank(&self.coordinates)
    }

    fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    /// Whether any field is filled in.
    pub fn is_empty(&self) -> bool {
        self.building().is_none() && self.coordinates().is_none() && self.location().is_none()
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A resolved trip endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub point: GeoPoint,
    /// Name to show the user.
    pub display_name: String,
}

/// Errors from resolving a trip endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("no location given")]
    Missing,

    #[error("unknown building: {0}")]
    UnknownBuilding(String),
}

/// The known campus buildings.
#[derive(Debug, Clone)]
pub struct CampusDirectory {
    buildings: Vec<Building>,
}

impl Default for CampusDirectory {
    fn default() -> Self {
        let buildings = [
            ("Tech Tower", 33.7726510852488, -84.3947508475869),
            ("Georgia Tech Library", 33.7747751124862, -84.39575939176652),
            ("Clough Commons", 33.77532604620433, -84.39637188806334),
            ("Hopkins Hall", 33.77850642030214, -84.39069072993782),
            ("Glenn Hall", 33.77397354313724, -84.39167014943847),
            ("North Ave East", 33.769581436909526, -84.39098961634303),
            ("Student Center", 33.77361305511324, -84.39801594997785),
            ("Campus Rec Center", 33.77559002203094, -84.40334559002532),
            ("D.M. Smith", 33.77158232011701, -84.3911280052064),
            ("Bobby Dodd Stadium", 33.772681846343005, -84.39323608111707),
        ]
        .into_iter()
        .map(|(name, lat, lng)| Building::new(name, GeoPoint::new(lat, lng)))
        .collect();

        Self { buildings }
    }
}

impl CampusDirectory {
    pub fn new(buildings: Vec<Building>) -> Self {
        Self { buildings }
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Look up a building by its exact name.
    pub fn get(&self, name: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.name == name)
    }

    /// Match free text to a building.
    ///
    /// Case-insensitive exact match first, then a containment match in
    /// either direction after abbreviating common street suffixes.
    pub fn match_text(&self, text: &str) -> Option<&Building> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        if let Some(b) = self.buildings.iter().find(|b| b.name.to_lowercase() == lower) {
            return Some(b);
        }

        let normalised = normalise(&lower);
        self.buildings.iter().find(|b| {
            let name = b.name.to_lowercase();
            name.contains(&normalised) || normalised.contains(&name)
        })
    }

    /// Resolve a trip endpoint.
    ///
    /// In priority order:
    /// 1. a known building name
    /// 2. `"lat,lng"` coordinates, named after the matching building if the
    ///    typed text matches one, else after the text itself
    /// 3. typed text matching a building
    /// 4. typed text matching nothing, placed at the campus centre
    ///
    /// Unparseable coordinates fall through to the typed text.
    /// `fallback_name` labels coordinates given with no text.
    pub fn resolve(
        &self,
        query: &LocationQuery,
        fallback_name: &str,
    ) -> Result<ResolvedLocation, LocationError> {
        if let Some(name) = query.building() {
            let building = self
                .get(name)
                .ok_or_else(|| LocationError::UnknownBuilding(name.to_string()))?;
            return Ok(ResolvedLocation {
                point: building.point,
                display_name: building.name.clone(),
            });
        }

        if let Some(point) = query.coordinates().and_then(|c| GeoPoint::parse(c).ok()) {
            let display_name = match query.location() {
                Some(text) => self
                    .match_text(text)
                    .map_or_else(|| text.to_string(), |b| b.name.clone()),
                None => fallback_name.to_string(),
            };
            return Ok(ResolvedLocation {
                point,
                display_name,
            });
        }

        let text = query.location().ok_or(LocationError::Missing)?;
        Ok(match self.match_text(text) {
            Some(b) => ResolvedLocation {
                point: b.point,
                display_name: b.name.clone(),
            },
            None => ResolvedLocation {
                point: CAMPUS_CENTRE,
                display_name: text.to_string(),
            },
        })
    }
}

fn normalise(lower: &str) -> String {
    lower
        .replace("avenue", "ave")
        .replace("street", "st")
        .replace("road", "rd")
        .replace("boulevard", "blvd")
}
