//! Data transfer objects for web requests and responses.
//!
//! Field names match what the existing web frontend sends and reads:
//! requests use snake_case, responses camelCase.

use serde::{Deserialize, Serialize};

use crate::domain::{ArrivalEstimate, format_clock_time};
use crate::locations::LocationQuery;
use crate::map::{MapRoute, MapVehicle, VehicleStop};
use crate::planner::{RouteRecommendation, StopView};
use crate::transloc::MapStopRecord;

/// Request to search for routes between two points.
///
/// Each end may be given as a building, coordinates, or typed text.
#[derive(Debug, Default, Deserialize)]
pub struct RouteSearchRequest {
    pub begin_building: Option<String>,
    pub dest_building: Option<String>,
    pub begin_location: Option<String>,
    pub dest_location: Option<String>,
    /// `"lat,lng"`
    pub begin_coordinates: Option<String>,
    /// `"lat,lng"`
    pub dest_coordinates: Option<String>,
}

impl RouteSearchRequest {
    pub fn begin_query(&self) -> LocationQuery {
        LocationQuery {
            building: self.begin_building.clone(),
            coordinates: self.begin_coordinates.clone(),
            location: self.begin_location.clone(),
        }
    }

    pub fn dest_query(&self) -> LocationQuery {
        LocationQuery {
            building: self.dest_building.clone(),
            coordinates: self.dest_coordinates.clone(),
            location: self.dest_location.clone(),
        }
    }
}

/// Response for route search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSearchResponse {
    /// Best routes first, at most five.
    pub routes: Vec<RouteResult>,
    pub begin_building: String,
    pub dest_building: String,
    pub begin_location: String,
    pub dest_location: String,
}

impl RouteSearchResponse {
    /// Build a response; both name pairs echo the resolved display names.
    pub fn new(routes: Vec<RouteResult>, begin_name: String, dest_name: String) -> Self {
        Self {
            routes,
            begin_building: begin_name.clone(),
            dest_building: dest_name.clone(),
            begin_location: begin_name,
            dest_location: dest_name,
        }
    }
}

/// A recommended route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub route_id: String,
    pub route_name: String,
    pub begin_stop: StopInfo,
    pub dest_stop: StopInfo,
    /// Meters, one decimal place.
    pub total_walking_distance: f64,
}

impl From<RouteRecommendation> for RouteResult {
    fn from(r: RouteRecommendation) -> Self {
        Self {
            route_id: r.route_id.as_str().to_string(),
            route_name: r.route_name,
            begin_stop: r.begin_stop.into(),
            dest_stop: r.dest_stop.into(),
            total_walking_distance: r.total_walking_distance_m,
        }
    }
}

/// One end of a route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInfo {
    pub name: String,
    /// Walking distance in meters, one decimal place.
    pub distance: f64,
    pub route_stop_id: Option<String>,
    pub arrival_times: Vec<ArrivalTime>,
}

impl From<StopView> for StopInfo {
    fn from(s: StopView) -> Self {
        Self {
            name: s.name,
            distance: s.distance_m,
            route_stop_id: s.route_stop_id.map(|id| id.as_str().to_string()),
            arrival_times: s.arrivals.into_iter().map(ArrivalTime::from).collect(),
        }
    }
}

/// A live arrival estimate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalTime {
    pub minutes: i64,
    pub seconds: Option<i64>,
    pub vehicle_id: Option<String>,
    pub vehicle_name: Option<String>,
    /// Estimated clock time, `HH:MM` when parseable.
    pub time: Option<String>,
    /// Scheduled clock time, `HH:MM` when parseable.
    pub scheduled_time: Option<String>,
    pub is_arriving: bool,
    pub on_time_status: Option<i64>,
}

impl From<ArrivalEstimate> for ArrivalTime {
    fn from(a: ArrivalEstimate) -> Self {
        Self {
            minutes: a.minutes,
            seconds: a.seconds,
            vehicle_id: a.vehicle_id,
            vehicle_name: a.vehicle_name,
            time: a.raw_clock_time.map(|t| clock(&t)),
            scheduled_time: a.scheduled_clock_time.map(|t| clock(&t)),
            is_arriving: a.is_arriving,
            on_time_status: a.on_time_status,
        }
    }
}

/// `HH:MM` if the timestamp parses, otherwise the raw text.
fn clock(raw: &str) -> String {
    format_clock_time(raw).unwrap_or_else(|| raw.to_string())
}

/// A route as drawn on the map.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRouteResult {
    pub route_id: String,
    pub description: String,
    pub map_line_color: String,
    pub map_latitude: f64,
    pub map_longitude: f64,
    pub map_zoom: i64,
    pub is_visible_on_map: bool,
    pub is_checked_on_map: bool,
    pub hide_route_line: bool,
    pub encoded_polyline: String,
    pub stops: Vec<MapStopInfo>,
}

impl From<MapRoute> for MapRouteResult {
    fn from(MapRoute { route, stops }: MapRoute) -> Self {
        Self {
            route_id: route.route_id.as_str().to_string(),
            description: route.description,
            map_line_color: route.line_color,
            map_latitude: route.map_latitude,
            map_longitude: route.map_longitude,
            map_zoom: route.map_zoom,
            is_visible_on_map: route.is_visible_on_map,
            is_checked_on_map: route.is_checked_on_map,
            hide_route_line: route.hide_route_line,
            encoded_polyline: route.encoded_polyline,
            stops: stops.into_iter().map(MapStopInfo::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStopInfo {
    /// Empty when upstream sent none.
    pub route_stop_id: String,
    pub route_id: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order: i64,
    pub show_estimates_on_map: bool,
    pub show_defaulted_on_map: bool,
}

impl From<MapStopRecord> for MapStopInfo {
    fn from(s: MapStopRecord) -> Self {
        Self {
            route_stop_id: s.route_stop_id.map(|id| id.as_str().to_string()).unwrap_or_default(),
            route_id: s.route_id.as_str().to_string(),
            description: s.description,
            latitude: s.point.latitude,
            longitude: s.point.longitude,
            order: s.order,
            show_estimates_on_map: s.show_estimates_on_map,
            show_defaulted_on_map: s.show_defaulted_on_map,
        }
    }
}

/// A vehicle on the map.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapVehicleResult {
    pub vehicle_id: String,
    pub route_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ground_speed: f64,
    pub heading: f64,
    pub seconds: i64,
    pub is_on_route: bool,
    pub is_delayed: bool,
    pub stops: Vec<VehicleStopInfo>,
}

impl From<MapVehicle> for MapVehicleResult {
    fn from(MapVehicle { vehicle, stops }: MapVehicle) -> Self {
        Self {
            vehicle_id: vehicle.vehicle_id.unwrap_or_default(),
            route_id: vehicle
                .route_id
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            name: vehicle.name,
            latitude: vehicle.point.latitude,
            longitude: vehicle.point.longitude,
            ground_speed: vehicle.ground_speed,
            heading: vehicle.heading,
            seconds: vehicle.seconds,
            is_on_route: vehicle.is_on_route,
            is_delayed: vehicle.is_delayed,
            stops: stops.into_iter().map(VehicleStopInfo::from).collect(),
        }
    }
}

/// A stop a vehicle is due at. Position is zero when the stop is unknown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStopInfo {
    pub route_stop_id: String,
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival_seconds: Option<i64>,
}

impl From<VehicleStop> for VehicleStopInfo {
    fn from(s: VehicleStop) -> Self {
        Self {
            route_stop_id: s.route_stop_id.map(|id| id.as_str().to_string()).unwrap_or_default(),
            stop_name: s.stop_name,
            latitude: s.point.map_or(0.0, |p| p.latitude),
            longitude: s.point.map_or(0.0, |p| p.longitude),
            arrival_seconds: s.arrival_seconds,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, RouteStopId};
    use serde_json::json;

    fn recommendation() -> RouteRecommendation {
        RouteRecommendation {
            route_id: RouteId::new("12"),
            route_name: "Red".to_string(),
            begin_stop: StopView {
                name: "Tech Tower".to_string(),
                distance_m: 85.3,
                route_stop_id: Some(RouteStopId::new("301")),
                arrivals: vec![ArrivalEstimate {
                    vehicle_id: Some("7".to_string()),
                    vehicle_name: Some("Bus 7".to_string()),
                    seconds: Some(95),
                    minutes: 1,
                    raw_clock_time: Some("/Date(1700000000000-0500)/".to_string()),
                    scheduled_clock_time: Some("later".to_string()),
                    is_arriving: true,
                    on_time_status: Some(0),
                }],
            },
            dest_stop: StopView {
                name: "Library".to_string(),
                distance_m: 40.0,
                route_stop_id: None,
                arrivals: Vec::new(),
            },
            total_walking_distance_m: 125.3,
            same_stop: false,
        }
    }

    #[test]
    fn request_uses_snake_case() {
        let req: RouteSearchRequest = serde_json::from_value(json!({
            "begin_building": "Tech Tower",
            "dest_coordinates": "33.77,-84.39",
            "dest_location": "Somewhere",
        }))
        .unwrap();

        let begin = req.begin_query();
        assert_eq!(begin.building.as_deref(), Some("Tech Tower"));
        assert!(begin.coordinates.is_none());

        let dest = req.dest_query();
        assert_eq!(dest.coordinates.as_deref(), Some("33.77,-84.39"));
        assert_eq!(dest.location.as_deref(), Some("Somewhere"));
    }

    #[test]
    fn response_uses_camel_case() {
        let response = RouteSearchResponse::new(
            vec![recommendation().into()],
            "Tech Tower".to_string(),
            "Library".to_string(),
        );

        let v = serde_json::to_value(&response).unwrap();

        assert_eq!(v["beginBuilding"], "Tech Tower");
        assert_eq!(v["beginLocation"], "Tech Tower");
        assert_eq!(v["destLocation"], "Library");

        let route = &v["routes"][0];
        assert_eq!(route["routeId"], "12");
        assert_eq!(route["routeName"], "Red");
        assert_eq!(route["totalWalkingDistance"], 125.3);
        assert_eq!(route["beginStop"]["routeStopId"], "301");
        assert_eq!(route["beginStop"]["distance"], 85.3);
        assert!(route["destStop"]["routeStopId"].is_null());
        assert_eq!(route["destStop"]["arrivalTimes"], json!([]));

        let arrival = &route["beginStop"]["arrivalTimes"][0];
        assert_eq!(arrival["minutes"], 1);
        assert_eq!(arrival["seconds"], 95);
        assert_eq!(arrival["vehicleId"], "7");
        assert_eq!(arrival["vehicleName"], "Bus 7");
        assert_eq!(arrival["time"], "17:13");
        assert_eq!(arrival["scheduledTime"], "later");
        assert_eq!(arrival["isArriving"], true);
        assert_eq!(arrival["onTimeStatus"], 0);
    }

    #[test]
    fn map_vehicle_uses_frontend_names() {
        use crate::domain::GeoPoint;
        use crate::transloc::VehiclePoint;

        let vehicle = MapVehicle {
            vehicle: VehiclePoint {
                vehicle_id: Some("101".to_string()),
                route_id: None,
                name: "Bus 101".to_string(),
                point: GeoPoint::new(33.7731, -84.3962),
                ground_speed: 11.0,
                heading: 270.0,
                seconds: 3,
                is_on_route: true,
                is_delayed: false,
            },
            stops: vec![VehicleStop {
                route_stop_id: None,
                stop_name: "Hub".to_string(),
                point: None,
                arrival_seconds: Some(45),
            }],
        };

        let v = serde_json::to_value(MapVehicleResult::from(vehicle)).unwrap();

        assert_eq!(v["vehicleId"], "101");
        assert_eq!(v["routeId"], "");
        assert_eq!(v["latitude"], 33.7731);
        assert_eq!(v["groundSpeed"], 11.0);
        assert_eq!(v["isOnRoute"], true);
        assert_eq!(
            v["stops"][0],
            json!({
                "routeStopId": "",
                "stopName": "Hub",
                "latitude": 0.0,
                "longitude": 0.0,
                "arrivalSeconds": 45,
            })
        );
    }
}
