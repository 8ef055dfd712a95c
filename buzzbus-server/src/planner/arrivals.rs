//! Route details and live arrival estimates for a shortlisted candidate.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{ArrivalEstimate, RouteId, RouteStopId, derive_minutes, sort_by_seconds};
use crate::transloc::RouteRecord;
use crate::transloc::fields::{
    self, lookup_array, lookup_bool, lookup_i64, lookup_id, lookup_str,
};

use super::config::PlannerConfig;
use super::rank::RouteCandidate;
use super::source::TransitDataSource;

/// A candidate's display name and the arrivals at both of its stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub route_name: String,
    pub begin_arrivals: Vec<ArrivalEstimate>,
    pub dest_arrivals: Vec<ArrivalEstimate>,
}

/// Parse arrival records for one route-stop.
///
/// Only records for `route_stop_id` are read. Key spellings are resolved
/// through [`fields`], so `{"RouteStopId", "Times": [{"VehicleId",
/// "Seconds"}]}` and `{"RouteStopID", "ArrivalTimes": [{"VehicleID",
/// "Minutes"}]}` both parse. Output is sorted soonest first.
pub fn parse_arrival_records(records: &[Value], route_stop_id: &RouteStopId) -> Vec<ArrivalEstimate> {
    let mut estimates: Vec<ArrivalEstimate> = records
        .iter()
        .filter_map(Value::as_object)
        .filter(|record| {
            lookup_id(record, fields::ROUTE_STOP_ID).as_deref() == Some(route_stop_id.as_str())
        })
        .filter_map(|record| lookup_array(record, fields::TIMES))
        .flatten()
        .filter_map(Value::as_object)
        .map(parse_timing)
        .collect();

    sort_by_seconds(&mut estimates);
    estimates
}

/// Parse one per-vehicle timing entry.
fn parse_timing(entry: &Map<String, Value>) -> ArrivalEstimate {
    let seconds = lookup_i64(entry, fields::SECONDS);

    ArrivalEstimate {
        vehicle_id: lookup_id(entry, fields::VEHICLE_ID),
        vehicle_name: lookup_str(entry, fields::VEHICLE_NAME).map(str::to_string),
        seconds,
        minutes: derive_minutes(seconds, lookup_i64(entry, fields::MINUTES)),
        raw_clock_time: lookup_str(entry, fields::CLOCK_TIME).map(str::to_string),
        scheduled_clock_time: lookup_str(entry, fields::SCHEDULED_TIME).map(str::to_string),
        is_arriving: lookup_bool(entry, fields::IS_ARRIVING).unwrap_or(false),
        on_time_status: lookup_i64(entry, fields::ON_TIME_STATUS),
    }
}

/// Resolves route names and arrival estimates for candidates.
pub struct ArrivalResolver<'a, S: TransitDataSource> {
    source: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: TransitDataSource> ArrivalResolver<'a, S> {
    pub fn new(source: &'a S, config: &'a PlannerConfig) -> Self {
        Self { source, config }
    }

    /// Fetch a candidate's route details and both stops' arrivals together.
    ///
    /// Returns `None` when the route has no details: a route without a
    /// name cannot be shown. Missing arrivals are just empty lists.
    pub async fn resolve(&self, candidate: &RouteCandidate) -> Option<ResolvedRoute> {
        let route_id = &candidate.route_id;

        let (details, begin_arrivals, dest_arrivals) = futures::join!(
            self.route_details(route_id),
            self.arrivals_at(route_id, candidate.begin_stop.route_stop_id.as_ref()),
            self.arrivals_at(route_id, candidate.dest_stop.route_stop_id.as_ref()),
        );

        let Some(route) = details.into_iter().next() else {
            debug!(route = %route_id, "no route details; dropping candidate");
            return None;
        };

        Some(ResolvedRoute {
            route_name: route.description,
            begin_arrivals,
            dest_arrivals,
        })
    }

    async fn route_details(&self, route_id: &RouteId) -> Vec<RouteRecord> {
        self.source
            .get_route_details(route_id)
            .await
            .unwrap_or_else(|e| {
                warn!(route = %route_id, error = %e, "route details unavailable");
                Vec::new()
            })
    }

    /// Arrivals at one stop; a stop without a route-stop id has none.
    async fn arrivals_at(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
    ) -> Vec<ArrivalEstimate> {
        let Some(route_stop_id) = route_stop_id else {
            return Vec::new();
        };

        match self
            .source
            .get_stop_arrival_times(route_id, Some(route_stop_id), self.config.arrivals_per_stop)
            .await
        {
            Ok(records) => parse_arrival_records(&records, route_stop_id),
            Err(e) => {
                warn!(route = %route_id, stop = %route_stop_id, error = %e, "arrivals unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stop_id(s: &str) -> RouteStopId {
        RouteStopId::new(s)
    }

    #[test]
    fn parses_times_with_seconds() {
        let records = vec![json!({
            "RouteStopId": 301,
            "Times": [
                {"VehicleId": 12, "Seconds": 400, "IsArriving": false,
                 "EstimateTime": "/Date(1700000400000-0500)/",
                 "ScheduledTime": "/Date(1700000300000-0500)/",
                 "OnTimeStatus": 2},
                {"VehicleId": 7, "Seconds": 95, "IsArriving": true},
            ]
        })];

        let parsed = parse_arrival_records(&records, &stop_id("301"));

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].vehicle_id.as_deref(), Some("7"));
        assert_eq!(parsed[0].seconds, Some(95));
        assert_eq!(parsed[0].minutes, 1);
        assert!(parsed[0].is_arriving);

        assert_eq!(parsed[1].minutes, 6);
        assert_eq!(parsed[1].on_time_status, Some(2));
        assert_eq!(
            parsed[1].raw_clock_time.as_deref(),
            Some("/Date(1700000400000-0500)/")
        );
        assert!(parsed[1].scheduled_clock_time.is_some());
    }

    #[test]
    fn parses_alternate_spellings_with_minutes() {
        let records = vec![json!({
            "RouteStopID": "301",
            "ArrivalTimes": [
                {"VehicleID": "12", "Minutes": 4, "VehicleName": "Bus 1203"},
            ]
        })];

        let parsed = parse_arrival_records(&records, &stop_id("301"));

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].vehicle_id.as_deref(), Some("12"));
        assert_eq!(parsed[0].vehicle_name.as_deref(), Some("Bus 1203"));
        assert_eq!(parsed[0].seconds, None);
        assert_eq!(parsed[0].minutes, 4);
        assert!(!parsed[0].is_arriving);
    }

    #[test]
    fn seconds_take_precedence_over_minutes() {
        let records = vec![json!({
            "RouteStopID": 1,
            "Times": [{"VehicleID": 1, "Seconds": 61, "Minutes": 9}]
        })];
        let parsed = parse_arrival_records(&records, &stop_id("1"));
        assert_eq!(parsed[0].minutes, 1);
    }

    #[test]
    fn minutes_default_to_zero() {
        let records = vec![json!({"RouteStopID": 1, "Times": [{"VehicleID": 1}]})];
        let parsed = parse_arrival_records(&records, &stop_id("1"));
        assert_eq!(parsed[0].minutes, 0);
        assert_eq!(parsed[0].seconds, None);
    }

    #[test]
    fn other_stops_and_junk_are_ignored() {
        let records = vec![
            json!({"RouteStopID": 2, "Times": [{"VehicleID": 1, "Seconds": 10}]}),
            json!({"Times": [{"VehicleID": 1, "Seconds": 10}]}),
            json!({"RouteStopID": 1, "Times": "soon"}),
            json!({"RouteStopID": 1, "Times": [42, {"VehicleID": 3, "Seconds": 5}]}),
            json!(null),
        ];
        let parsed = parse_arrival_records(&records, &stop_id("1"));

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].vehicle_id.as_deref(), Some("3"));
    }

    #[test]
    fn entries_without_seconds_sort_last() {
        let records = vec![json!({
            "RouteStopID": 1,
            "Times": [
                {"VehicleID": "a", "Minutes": 1},
                {"VehicleID": "b", "Seconds": 900},
                {"VehicleID": "c"},
                {"VehicleID": "d", "Seconds": 30},
            ]
        })];
        let parsed = parse_arrival_records(&records, &stop_id("1"));
        let order: Vec<_> = parsed.iter().map(|e| e.vehicle_id.as_deref().unwrap()).collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);
    }
}
