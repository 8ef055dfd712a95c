//! Direction filtering for loop routes.
//!
//! On a loop every vehicle eventually passes every stop, so the arrival
//! feed lists a bus at both the boarding and the alighting stop whichever
//! way it is heading. A bus only helps if it reaches the alighting stop
//! after the boarding stop.

use std::collections::{HashMap, HashSet};

use crate::domain::ArrivalEstimate;

/// Arrivals left after direction filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectionFiltered {
    pub begin: Vec<ArrivalEstimate>,
    pub dest: Vec<ArrivalEstimate>,
}

/// Drop boarding-stop arrivals from vehicles heading the wrong way.
///
/// For a boarding estimate with both a vehicle id and seconds:
/// - no estimate for that vehicle at the destination: dropped
/// - the vehicle reaches the destination first: dropped
/// - otherwise kept
///
/// Estimates missing a vehicle id or seconds cannot be judged and are
/// kept. When a vehicle is listed at the destination more than once its
/// latest arrival is used, so a visit after looping back still counts.
///
/// Destination estimates are then narrowed to vehicles that still have a
/// boarding estimate, so no ETA is shown for a bus the rider can't take.
pub fn filter_direction(
    begin: Vec<ArrivalEstimate>,
    dest: Vec<ArrivalEstimate>,
) -> DirectionFiltered {
    let mut dest_seconds: HashMap<&str, i64> = HashMap::new();
    for (vehicle, seconds) in dest.iter().filter_map(ArrivalEstimate::timing) {
        dest_seconds
            .entry(vehicle)
            .and_modify(|s| *s = (*s).max(seconds))
            .or_insert(seconds);
    }

    let begin: Vec<ArrivalEstimate> = begin
        .into_iter()
        .filter(|e| match e.timing() {
            None => true,
            Some((vehicle, seconds)) => dest_seconds
                .get(vehicle)
                .is_some_and(|&at_dest| at_dest > seconds),
        })
        .collect();

    let boardable: HashSet<&str> = begin
        .iter()
        .filter_map(|e| e.vehicle_id.as_deref())
        .collect();

    let dest = dest
        .iter()
        .filter(|e| e.vehicle_id.as_deref().is_some_and(|v| boardable.contains(v)))
        .cloned()
        .collect();

    DirectionFiltered { begin, dest }
}
