//! Unit tests for the route search pipeline.

use super::*;
use crate::domain::RouteStopId;
use crate::planner::FetchError;
use crate::transloc::{RouteRecord, StopRecord};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const M_PER_DEG: f64 = 111_194.93;

fn origin() -> GeoPoint {
    GeoPoint::new(33.7756, -84.3963)
}

fn north_of(p: &GeoPoint, meters: f64) -> GeoPoint {
    GeoPoint::new(p.latitude + meters / M_PER_DEG, p.longitude)
}

fn dest() -> GeoPoint {
    north_of(&origin(), 3000.0)
}

fn stop(id: &str, name: &str, point: GeoPoint) -> StopRecord {
    StopRecord {
        point,
        description: name.to_string(),
        route_stop_id: Some(RouteStopId::new(id)),
    }
}

fn route(id: &str, name: &str) -> RouteRecord {
    RouteRecord {
        route_id: RouteId::new(id),
        description: name.to_string(),
    }
}

fn arrivals(route_stop_id: &str, times: Value) -> Value {
    json!({"RouteStopID": route_stop_id, "Times": times})
}

fn fail(resource: &str) -> FetchError {
    FetchError {
        resource: resource.to_string(),
        message: "boom".to_string(),
    }
}

/// In-memory transit source.
#[derive(Default)]
struct StaticSource {
    active: Vec<RouteRecord>,
    active_fails: bool,
    stops: HashMap<String, Vec<StopRecord>>,
    failing_stops: HashSet<String>,
    details: HashMap<String, Vec<RouteRecord>>,
    arrivals: HashMap<String, Vec<Value>>,
    stop_calls: AtomicUsize,
    arrival_calls: Mutex<Vec<Option<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticSource {
    /// Register an active route with its stops and details.
    fn with_route(mut self, id: &str, name: &str, stops: Vec<StopRecord>) -> Self {
        self.active.push(route(id, name));
        self.stops.insert(id.to_string(), stops);
        self.details.insert(id.to_string(), vec![route(id, name)]);
        self
    }

    fn with_arrivals(mut self, route_id: &str, records: Vec<Value>) -> Self {
        self.arrivals.insert(route_id.to_string(), records);
        self
    }

    fn arrival_requests(&self) -> Vec<Option<String>> {
        self.arrival_calls.lock().unwrap().clone()
    }
}

impl TransitDataSource for StaticSource {
    async fn get_active_routes(&self) -> Result<Vec<RouteRecord>, FetchError> {
        if self.active_fails {
            return Err(fail("active routes"));
        }
        Ok(self.active.clone())
    }

    async fn get_stops(&self, route_id: &RouteId) -> Result<Vec<StopRecord>, FetchError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_stops.contains(route_id.as_str()) {
            return Err(fail("stops"));
        }
        Ok(self.stops.get(route_id.as_str()).cloned().unwrap_or_default())
    }

    async fn get_route_details(&self, route_id: &RouteId) -> Result<Vec<RouteRecord>, FetchError> {
        Ok(self.details.get(route_id.as_str()).cloned().unwrap_or_default())
    }

    async fn get_stop_arrival_times(
        &self,
        route_id: &RouteId,
        route_stop_id: Option<&RouteStopId>,
        _limit_per_stop: u32,
    ) -> Result<Vec<Value>, FetchError> {
        self.arrival_calls
            .lock()
            .unwrap()
            .push(route_stop_id.map(|s| s.as_str().to_string()));
        Ok(self.arrivals.get(route_id.as_str()).cloned().unwrap_or_default())
    }
}

async fn search(source: &StaticSource, begin: GeoPoint, dest: GeoPoint) -> RouteSearchResult {
    let config = PlannerConfig::default();
    RoutePlanner::new(source, &config).find_routes(begin, dest).await
}

/// Route A walks 100 + 200 m; Route B's alighting walk is 5 km.
fn two_routes() -> StaticSource {
    let begin = origin();
    let dest = dest();
    StaticSource::default()
        .with_route(
            "A",
            "Route A",
            vec![
                stop("a1", "A Start", north_of(&begin, 100.0)),
                stop("a2", "A End", north_of(&dest, 200.0)),
            ],
        )
        .with_route(
            "B",
            "Route B",
            vec![
                stop("b1", "B Start", north_of(&begin, -50.0)),
                stop("b2", "B End", north_of(&dest, -5000.0)),
            ],
        )
}

#[tokio::test]
async fn route_over_threshold_is_excluded() {
    let source = two_routes();

    let result = search(&source, origin(), dest()).await;

    assert_eq!(result.final_stage, SearchStage::Done);
    assert_eq!(result.recommendations.len(), 1);
    let rec = &result.recommendations[0];
    assert_eq!(rec.route_id.as_str(), "A");
    assert_eq!(rec.route_name, "Route A");
    assert_eq!(rec.begin_stop.name, "A Start");
    assert_eq!(rec.begin_stop.distance_m, 100.0);
    assert_eq!(rec.dest_stop.name, "A End");
    assert_eq!(rec.dest_stop.distance_m, 200.0);
    assert_eq!(rec.total_walking_distance_m, 300.0);
    assert!(!rec.same_stop);

    assert_eq!(
        result.stats,
        SearchStats {
            active_routes: 2,
            routes_with_stops: 2,
            candidates: 1,
            dropped: 0,
        }
    );
}

#[tokio::test]
async fn no_active_routes_is_empty_not_error() {
    let source = StaticSource::default();

    let result = search(&source, origin(), dest()).await;

    assert!(result.recommendations.is_empty());
    assert_eq!(result.final_stage, SearchStage::EmptyResult);
    assert_eq!(source.stop_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_active_routes_is_empty() {
    let source = StaticSource {
        active_fails: true,
        ..two_routes()
    };

    let result = search(&source, origin(), dest()).await;

    assert!(result.recommendations.is_empty());
    assert_eq!(result.final_stage, SearchStage::EmptyResult);
    assert_eq!(result.stats.active_routes, 0);
}

#[tokio::test]
async fn nothing_within_walking_distance() {
    let source = two_routes();
    let far = north_of(&origin(), 50_000.0);

    let result = search(&source, far, dest()).await;

    assert!(result.recommendations.is_empty());
    assert_eq!(result.final_stage, SearchStage::EmptyResult);
    assert_eq!(result.stats.routes_with_stops, 2);
    assert!(source.arrival_requests().is_empty());
}

#[tokio::test]
async fn failed_stop_fetch_excludes_only_that_route() {
    let begin = origin();
    let dest = dest();
    let mut source = two_routes().with_route(
        "C",
        "Route C",
        vec![stop("c1", "C Start", begin), stop("c2", "C End", dest)],
    );
    source.failing_stops.insert("C".to_string());

    let result = search(&source, begin, dest).await;

    let ids: Vec<_> = result.recommendations.iter().map(|r| r.route_id.as_str()).collect();
    assert_eq!(ids, vec!["A"]);
    assert_eq!(result.stats.active_routes, 3);
    assert_eq!(result.stats.routes_with_stops, 2);
}

#[tokio::test]
async fn same_stop_route_carries_penalty() {
    let begin = origin();
    let dest = north_of(&begin, 200.0);
    let source = StaticSource::default().with_route(
        "L",
        "Loop",
        vec![
            stop("hub", "Hub", north_of(&begin, 100.0)),
            stop("far", "Far", north_of(&begin, 4000.0)),
        ],
    );

    let result = search(&source, begin, dest).await;

    assert_eq!(result.recommendations.len(), 1);
    let rec = &result.recommendations[0];
    assert!(rec.same_stop);
    assert_eq!(rec.begin_stop.name, rec.dest_stop.name);
    assert_eq!(rec.total_walking_distance_m, 1200.0);
}

#[tokio::test]
async fn repeated_searches_agree() {
    let source = two_routes();

    let first = search(&source, origin(), dest()).await;
    let second = search(&source, origin(), dest()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn results_are_capped_and_sorted() {
    let begin = origin();
    let dest = dest();
    let mut source = StaticSource::default();
    for i in 0..8u32 {
        let id = format!("R{i}");
        let walk = 100.0 + 50.0 * f64::from(i);
        source = source.with_route(
            &id,
            &format!("Route {i}"),
            vec![
                stop(&format!("{id}-on"), "On", north_of(&begin, walk)),
                stop(&format!("{id}-off"), "Off", dest),
            ],
        );
    }

    let result = search(&source, begin, dest).await;

    let ids: Vec<_> = result.recommendations.iter().map(|r| r.route_id.as_str()).collect();
    assert_eq!(ids, vec!["R0", "R1", "R2", "R3", "R4"]);
    for w in result.recommendations.windows(2) {
        assert!(w[0].total_walking_distance_m <= w[1].total_walking_distance_m);
    }
    assert_eq!(result.stats.candidates, 5);
}

#[tokio::test]
async fn candidate_without_details_is_dropped() {
    let mut source = two_routes();
    source.details.remove("A");

    let result = search(&source, origin(), dest()).await;

    assert!(result.recommendations.is_empty());
    assert_eq!(result.final_stage, SearchStage::Done);
    assert_eq!(result.stats.candidates, 1);
    assert_eq!(result.stats.dropped, 1);
}

#[tokio::test]
async fn stop_without_route_stop_id_requests_nothing() {
    let begin = origin();
    let dest = dest();
    let mut on = stop("unused", "On", begin);
    on.route_stop_id = None;
    let source = StaticSource::default().with_route("A", "Route A", vec![on, stop("off", "Off", dest)]);

    let result = search(&source, begin, dest).await;

    assert_eq!(result.recommendations.len(), 1);
    assert!(result.recommendations[0].begin_stop.arrivals.is_empty());
    assert_eq!(result.recommendations[0].begin_stop.route_stop_id, None);
    assert_eq!(source.arrival_requests(), vec![Some("off".to_string())]);
}

#[tokio::test]
async fn wrong_direction_vehicles_are_filtered() {
    let source = two_routes().with_arrivals(
        "A",
        vec![
            arrivals(
                "a1",
                json!([
                    {"VehicleID": 1, "Seconds": 120},
                    {"VehicleID": 2, "Seconds": 400},
                ]),
            ),
            arrivals(
                "a2",
                json!([
                    {"VehicleID": 1, "Seconds": 300},
                    {"VehicleID": 3, "Seconds": 50},
                ]),
            ),
        ],
    );

    let result = search(&source, origin(), dest()).await;

    let rec = &result.recommendations[0];
    let begin: Vec<_> = rec
        .begin_stop
        .arrivals
        .iter()
        .map(|a| (a.vehicle_id.as_deref(), a.seconds, a.minutes))
        .collect();
    assert_eq!(begin, vec![(Some("1"), Some(120), 2)]);
    let dest: Vec<_> = rec.dest_stop.arrivals.iter().map(|a| a.vehicle_id.as_deref()).collect();
    assert_eq!(dest, vec![Some("1")]);
}

#[tokio::test]
async fn stop_lists_are_fetched_concurrently() {
    let mut source = StaticSource::default();
    for i in 0..6 {
        source = source.with_route(&format!("R{i}"), "r", Vec::new());
    }

    let result = search(&source, origin(), dest()).await;

    assert!(result.recommendations.is_empty());
    assert_eq!(source.stop_calls.load(Ordering::SeqCst), 6);
    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 6);
}

#[test]
fn stage_names() {
    assert_eq!(SearchStage::ResolvingArrivals.to_string(), "resolving-arrivals");
    assert!(SearchStage::Done.is_terminal());
    assert!(SearchStage::EmptyResult.is_terminal());
    assert!(!SearchStage::Ranking.is_terminal());
}
