//! Conversion from raw TransLoc JSON to typed records.
//!
//! Malformed entries are skipped with a debug log rather than failing the
//! whole response: one bad stop should not hide a route.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{GeoPoint, RouteId, RouteStopId};

use super::fields::{self, lookup_bool, lookup_f64, lookup_i64, lookup_id, lookup_str};
use super::types::{MapRouteRecord, MapStopRecord, RouteRecord, StopRecord, VehiclePoint};

/// Convert a `GetRoutes` array into route records.
///
/// Entries without a route id are dropped. A missing description becomes
/// the empty string.
pub fn convert_routes(items: &[Value]) -> Vec<RouteRecord> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let Some(route_id) = lookup_id(obj, fields::ROUTE_ID) else {
                debug!("skipping route without id");
                return None;
            };
            Some(RouteRecord {
                route_id: RouteId::new(route_id),
                description: lookup_str(obj, fields::DESCRIPTION)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

/// Convert a `GetStops` array into stop records.
///
/// Stops need a latitude and longitude to be rankable; those without are
/// skipped. The route-stop id is optional.
pub fn convert_stops(items: &[Value]) -> Vec<StopRecord> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let description = lookup_str(obj, fields::DESCRIPTION)
                .unwrap_or_default()
                .to_string();
            let point = point_of(obj, &description)?;

            Some(StopRecord {
                point,
                description,
                route_stop_id: lookup_id(obj, fields::ROUTE_STOP_ID).map(RouteStopId::new),
            })
        })
        .collect()
}

/// Latitude and longitude of a record, if both are present and valid.
fn point_of(obj: &Map<String, Value>, what: &str) -> Option<GeoPoint> {
    let (Some(lat), Some(lng)) = (
        lookup_f64(obj, fields::LATITUDE),
        lookup_f64(obj, fields::LONGITUDE),
    ) else {
        debug!(%what, "skipping record without coordinates");
        return None;
    };
    match GeoPoint::try_new(lat, lng) {
        Ok(p) => Some(p),
        Err(e) => {
            debug!(%what, error = %e, "skipping record");
            None
        }
    }
}

/// Convert a `GetRoutesForMapWithScheduleWithEncodedLine` array.
///
/// Entries without a route id are dropped.
pub fn convert_map_routes(items: &[Value]) -> Vec<MapRouteRecord> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let route_id = lookup_id(obj, fields::ROUTE_ID)?;
            let text = |field| lookup_str(obj, field).unwrap_or_default().to_string();
            let flag = |field| lookup_bool(obj, field).unwrap_or(false);

            Some(MapRouteRecord {
                route_id: RouteId::new(route_id),
                description: text(fields::DESCRIPTION),
                line_color: lookup_str(obj, fields::MAP_LINE_COLOR)
                    .unwrap_or("#000000")
                    .to_string(),
                map_latitude: lookup_f64(obj, fields::MAP_LATITUDE).unwrap_or(0.0),
                map_longitude: lookup_f64(obj, fields::MAP_LONGITUDE).unwrap_or(0.0),
                map_zoom: lookup_i64(obj, fields::MAP_ZOOM).unwrap_or(0),
                is_visible_on_map: flag(fields::IS_VISIBLE_ON_MAP),
                is_checked_on_map: flag(fields::IS_CHECKED_ON_MAP),
                hide_route_line: flag(fields::HIDE_ROUTE_LINE),
                encoded_polyline: text(fields::ENCODED_POLYLINE),
            })
        })
        .collect()
}

/// Convert a `GetStops` array for the map.
///
/// Stops that don't name their route are attributed to `route_id`, the
/// route they were requested for. Stops without coordinates are skipped.
pub fn convert_map_stops(items: &[Value], route_id: &RouteId) -> Vec<MapStopRecord> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let description = lookup_str(obj, fields::DESCRIPTION)
                .unwrap_or_default()
                .to_string();
            let point = point_of(obj, &description)?;
            let flag = |field| lookup_bool(obj, field).unwrap_or(false);

            Some(MapStopRecord {
                route_stop_id: lookup_id(obj, fields::ROUTE_STOP_ID).map(RouteStopId::new),
                route_id: lookup_id(obj, fields::ROUTE_ID)
                    .map(RouteId::new)
                    .unwrap_or_else(|| route_id.clone()),
                description,
                point,
                order: lookup_i64(obj, fields::STOP_ORDER).unwrap_or(0),
                show_estimates_on_map: flag(fields::SHOW_ESTIMATES_ON_MAP),
                show_defaulted_on_map: flag(fields::SHOW_DEFAULTED_ON_MAP),
            })
        })
        .collect()
}

/// Convert a `GetMapVehiclePoints` array. Vehicles without a position fix
/// are skipped.
pub fn convert_vehicle_points(items: &[Value]) -> Vec<VehiclePoint> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let vehicle_id = lookup_id(obj, fields::VEHICLE_ID);
            let point = point_of(obj, vehicle_id.as_deref().unwrap_or("vehicle"))?;
            let flag = |field| lookup_bool(obj, field).unwrap_or(false);

            Some(VehiclePoint {
                vehicle_id,
                route_id: lookup_id(obj, fields::ROUTE_ID).map(RouteId::new),
                name: lookup_str(obj, fields::VEHICLE_NAME)
                    .unwrap_or_default()
                    .to_string(),
                point,
                ground_speed: lookup_f64(obj, fields::GROUND_SPEED).unwrap_or(0.0),
                heading: lookup_f64(obj, fields::HEADING).unwrap_or(0.0),
                seconds: lookup_i64(obj, fields::SECONDS).unwrap_or(0),
                is_on_route: flag(fields::IS_ON_ROUTE),
                is_delayed: flag(fields::IS_DELAYED),
            })
        })
        .collect()
}

/// Route ids that have at least one vehicle in a `GetMapVehiclePoints` array.
pub fn vehicle_route_ids(vehicles: &[Value]) -> HashSet<RouteId> {
    vehicles
        .iter()
        .filter_map(|v| lookup_id(v.as_object()?, fields::ROUTE_ID))
        .map(RouteId::new)
        .collect()
}

/// Keep only routes currently reporting a live vehicle, in upstream order.
pub fn active_routes(routes: Vec<RouteRecord>, vehicles: &[Value]) -> Vec<RouteRecord> {
    let live = vehicle_route_ids(vehicles);
    routes
        .into_iter()
        .filter(|r| live.contains(&r.route_id))
        .collect()
}

/// Interpret a response body as a JSON array.
///
/// TransLoc answers `null` (or nothing) when there is no data; that is an
/// empty list, not an error.
pub fn parse_array(body: &str) -> Result<Vec<Value>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(body)?;
    Ok(match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        // Some endpoints wrap a single record.
        other => vec![other],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn routes_with_mixed_id_types() {
        let items = vec![
            json!({"RouteID": 1, "Description": "Red"}),
            json!({"RouteId": "2", "Description": "Blue"}),
            json!({"Description": "No id"}),
            json!("not an object"),
        ];
        let routes = convert_routes(&items);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].route_id, RouteId::new("1"));
        assert_eq!(routes[0].description, "Red");
        assert_eq!(routes[1].route_id, RouteId::new("2"));
    }

    #[test]
    fn stops_without_coordinates_are_skipped() {
        let items = vec![
            json!({"Latitude": 33.77, "Longitude": -84.39, "Description": "Hub", "RouteStopID": 10}),
            json!({"Latitude": 33.77, "Description": "Half"}),
            json!({"Latitude": 133.0, "Longitude": -84.39, "Description": "Bad"}),
            json!({"Latitude": 33.78, "Longitude": -84.40}),
        ];
        let stops = convert_stops(&items);

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].description, "Hub");
        assert_eq!(stops[0].route_stop_id, Some(RouteStopId::new("10")));
        assert_eq!(stops[1].description, "");
        assert_eq!(stops[1].route_stop_id, None);
    }

    #[test]
    fn active_routes_need_a_vehicle() {
        let routes = convert_routes(&[
            json!({"RouteID": 1, "Description": "Red"}),
            json!({"RouteID": 2, "Description": "Blue"}),
            json!({"RouteID": 3, "Description": "Gold"}),
        ]);
        let vehicles = vec![
            json!({"VehicleID": 100, "RouteID": 3}),
            json!({"VehicleID": 101, "RouteID": 1}),
            json!({"VehicleID": 102, "RouteID": 1}),
        ];

        let active = active_routes(routes, &vehicles);
        let ids: Vec<_> = active.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn map_routes_take_defaults() {
        let routes = convert_map_routes(&[
            json!({
                "RouteID": 4, "Description": "Gold", "MapLineColor": "#EEB211",
                "MapLatitude": 33.776, "MapLongitude": -84.398, "MapZoom": 15,
                "IsVisibleOnMap": true, "EncodedPolyline": "_p~iF~ps|U",
            }),
            json!({"RouteId": "5"}),
            json!({"Description": "No id"}),
        ]);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].line_color, "#EEB211");
        assert_eq!(routes[0].map_zoom, 15);
        assert!(routes[0].is_visible_on_map);
        assert!(!routes[0].hide_route_line);
        assert_eq!(routes[0].encoded_polyline, "_p~iF~ps|U");

        assert_eq!(routes[1].route_id, RouteId::new("5"));
        assert_eq!(routes[1].line_color, "#000000");
        assert_eq!(routes[1].map_latitude, 0.0);
        assert_eq!(routes[1].encoded_polyline, "");
    }

    #[test]
    fn map_stops_fall_back_to_requested_route() {
        let red = RouteId::new("1");
        let stops = convert_map_stops(
            &[
                json!({"RouteStopID": 10, "Description": "Hub", "Latitude": 33.77,
                       "Longitude": -84.39, "Order": 2, "ShowDefaultedOnMap": true}),
                json!({"RouteID": 9, "Description": "Odd", "Latitude": 33.78, "Longitude": -84.40}),
                json!({"Description": "Nowhere"}),
            ],
            &red,
        );

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].route_id, red);
        assert_eq!(stops[0].order, 2);
        assert!(stops[0].show_defaulted_on_map);
        assert!(!stops[0].show_estimates_on_map);
        assert_eq!(stops[1].route_id, RouteId::new("9"));
        assert_eq!(stops[1].route_stop_id, None);
    }

    #[test]
    fn vehicle_points() {
        let vehicles = convert_vehicle_points(&[
            json!({"VehicleID": 101, "RouteID": 1, "Name": "Bus 101", "Latitude": 33.77,
                   "Longitude": -84.39, "GroundSpeed": 12.5, "Heading": 90, "Seconds": 4,
                   "IsOnRoute": true}),
            json!({"VehicleID": 102, "RouteID": 1}),
        ]);

        assert_eq!(vehicles.len(), 1);
        let bus = &vehicles[0];
        assert_eq!(bus.vehicle_id.as_deref(), Some("101"));
        assert_eq!(bus.route_id, Some(RouteId::new("1")));
        assert_eq!(bus.name, "Bus 101");
        assert_eq!(bus.heading, 90.0);
        assert_eq!(bus.seconds, 4);
        assert!(bus.is_on_route);
        assert!(!bus.is_delayed);
    }

    #[test]
    fn parse_array_handles_null_and_empty() {
        assert!(parse_array("").unwrap().is_empty());
        assert!(parse_array("null").unwrap().is_empty());
        assert_eq!(parse_array("[1,2]").unwrap().len(), 2);
        assert_eq!(parse_array("{\"RouteID\":1}").unwrap().len(), 1);
        assert!(parse_array("<html>").is_err());
    }
}
