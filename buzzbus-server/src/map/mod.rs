//! Live map view.
//!
//! Backs the frontend map: every route with its drawn path and stops, and
//! every reporting vehicle with the stops it is due at next.

mod source;
mod view;

pub use source::MapDataSource;
pub use view::{
    MAP_TIMES_PER_STOP, MapRoute, MapVehicle, VehicleStop, map_routes, map_vehicles,
    vehicle_visits,
};
