//! Tolerant field lookup for TransLoc JSON.
//!
//! TransLoc is inconsistent about key casing between endpoints and
//! deployments (`RouteStopID` vs `RouteStopId`, `VehicleID` vs
//! `VehicleId`, `Times` vs `ArrivalTimes`). Every concept we read is
//! listed once here with all the spellings we accept, and every read goes
//! through [`lookup`].

use serde_json::{Map, Value};

/// One concept and its accepted key spellings, in preference order.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

pub const ROUTE_ID: Field = Field {
    name: "route id",
    keys: &["RouteID", "RouteId"],
};

pub const ROUTE_STOP_ID: Field = Field {
    name: "route stop id",
    keys: &["RouteStopID", "RouteStopId"],
};

pub const VEHICLE_ID: Field = Field {
    name: "vehicle id",
    keys: &["VehicleID", "VehicleId"],
};

pub const VEHICLE_NAME: Field = Field {
    name: "vehicle name",
    keys: &["VehicleName", "Name"],
};

pub const SECONDS: Field = Field {
    name: "seconds remaining",
    keys: &["Seconds", "SecondsToArrival"],
};

pub const MINUTES: Field = Field {
    name: "minutes remaining",
    keys: &["Minutes", "MinutesToArrival"],
};

pub const TIMES: Field = Field {
    name: "arrival times",
    keys: &["Times", "ArrivalTimes"],
};

pub const CLOCK_TIME: Field = Field {
    name: "estimated clock time",
    keys: &["EstimateTime", "Time"],
};

pub const SCHEDULED_TIME: Field = Field {
    name: "scheduled clock time",
    keys: &["ScheduledTime", "ScheduledArrivalTime"],
};

pub const IS_ARRIVING: Field = Field {
    name: "arriving flag",
    keys: &["IsArriving", "Arriving"],
};

pub const ON_TIME_STATUS: Field = Field {
    name: "on-time status",
    keys: &["OnTimeStatus", "OnTime"],
};

pub const DESCRIPTION: Field = Field {
    name: "description",
    keys: &["Description", "LongName"],
};

pub const LATITUDE: Field = Field {
    name: "latitude",
    keys: &["Latitude", "Lat"],
};

pub const LONGITUDE: Field = Field {
    name: "longitude",
    keys: &["Longitude", "Lng"],
};

pub const STOP_DESCRIPTION: Field = Field {
    name: "stop description",
    keys: &["StopDescription"],
};

pub const STOP_ORDER: Field = Field {
    name: "stop order",
    keys: &["Order"],
};

pub const SHOW_ESTIMATES_ON_MAP: Field = Field {
    name: "show estimates on map",
    keys: &["ShowEstimatesOnMap"],
};

pub const SHOW_DEFAULTED_ON_MAP: Field = Field {
    name: "show defaulted on map",
    keys: &["ShowDefaultedOnMap"],
};

pub const MAP_LINE_COLOR: Field = Field {
    name: "map line colour",
    keys: &["MapLineColor", "Color"],
};

pub const MAP_LATITUDE: Field = Field {
    name: "map centre latitude",
    keys: &["MapLatitude"],
};

pub const MAP_LONGITUDE: Field = Field {
    name: "map centre longitude",
    keys: &["MapLongitude"],
};

pub const MAP_ZOOM: Field = Field {
    name: "map zoom",
    keys: &["MapZoom"],
};

pub const IS_VISIBLE_ON_MAP: Field = Field {
    name: "visible on map",
    keys: &["IsVisibleOnMap"],
};

pub const IS_CHECKED_ON_MAP: Field = Field {
    name: "checked on map",
    keys: &["IsCheckedOnMap"],
};

pub const HIDE_ROUTE_LINE: Field = Field {
    name: "hide route line",
    keys: &["HideRouteLine"],
};

pub const ENCODED_POLYLINE: Field = Field {
    name: "encoded polyline",
    keys: &["EncodedPolyline"],
};

pub const GROUND_SPEED: Field = Field {
    name: "ground speed",
    keys: &["GroundSpeed"],
};

pub const HEADING: Field = Field {
    name: "heading",
    keys: &["Heading"],
};

pub const IS_ON_ROUTE: Field = Field {
    name: "on route",
    keys: &["IsOnRoute"],
};

pub const IS_DELAYED: Field = Field {
    name: "delayed",
    keys: &["IsDelayed"],
};

/// Find the first present, non-null value for a field.
pub fn lookup<'a>(obj: &'a Map<String, Value>, field: Field) -> Option<&'a Value> {
    field
        .keys
        .iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| !v.is_null())
}

/// Read an identifier that may be sent as a number or a string.
///
/// Numbers normalize to their integer decimal form (`12.0` → `"12"`).
/// Empty strings count as absent.
pub fn lookup_id(obj: &Map<String, Value>, field: Field) -> Option<String> {
    match lookup(obj, field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.to_string())
            .or_else(|| n.as_f64().map(|f| (f.trunc() as i64).to_string())),
        _ => None,
    }
}

/// Read an integer, accepting whole floats and numeric strings.
pub fn lookup_i64(obj: &Map<String, Value>, field: Field) -> Option<i64> {
    match lookup(obj, field)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a float, accepting numeric strings.
pub fn lookup_f64(obj: &Map<String, Value>, field: Field) -> Option<f64> {
    match lookup(obj, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn lookup_str<'a>(obj: &'a Map<String, Value>, field: Field) -> Option<&'a str> {
    lookup(obj, field)?.as_str()
}

pub fn lookup_bool(obj: &Map<String, Value>, field: Field) -> Option<bool> {
    lookup(obj, field)?.as_bool()
}

pub fn lookup_array<'a>(obj: &'a Map<String, Value>, field: Field) -> Option<&'a Vec<Value>> {
    lookup(obj, field)?.as_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn either_spelling_is_accepted() {
        let a = obj(json!({"RouteStopID": 42}));
        let b = obj(json!({"RouteStopId": "42"}));
        assert_eq!(lookup_id(&a, ROUTE_STOP_ID).as_deref(), Some("42"));
        assert_eq!(lookup_id(&b, ROUTE_STOP_ID).as_deref(), Some("42"));
    }

    #[test]
    fn null_falls_through_to_next_spelling() {
        let o = obj(json!({"VehicleID": null, "VehicleId": 7}));
        assert_eq!(lookup_id(&o, VEHICLE_ID).as_deref(), Some("7"));
    }

    #[test]
    fn float_ids_are_truncated() {
        let o = obj(json!({"RouteID": 12.0}));
        assert_eq!(lookup_id(&o, ROUTE_ID).as_deref(), Some("12"));
    }

    #[test]
    fn empty_string_id_is_absent() {
        let o = obj(json!({"RouteStopID": "  "}));
        assert_eq!(lookup_id(&o, ROUTE_STOP_ID), None);
    }

    #[test]
    fn numbers_from_strings() {
        let o = obj(json!({"Seconds": "125", "Latitude": "33.7"}));
        assert_eq!(lookup_i64(&o, SECONDS), Some(125));
        assert_eq!(lookup_f64(&o, LATITUDE), Some(33.7));
    }

    #[test]
    fn wrong_types_are_absent() {
        let o = obj(json!({"Seconds": true, "IsArriving": "yes", "Times": {}}));
        assert_eq!(lookup_i64(&o, SECONDS), None);
        assert_eq!(lookup_bool(&o, IS_ARRIVING), None);
        assert!(lookup_array(&o, TIMES).is_none());
    }
}
