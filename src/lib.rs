//! trip-planner core
//!
//! Plans driving trips with rest stops: parses routing and POI engine
//! responses, picks stop indices along a route's time profile, and composes
//! the result into an immutable trip snapshot.

pub mod error;
pub mod traits;
pub mod haversine;
pub mod polyline;
pub mod numeric;
pub mod route;
pub mod poi;
pub mod planner;
pub mod observer;
pub mod http;
pub mod trip;
pub mod osrm;
pub mod overpass;
pub mod nominatim;
pub mod vehicle;

pub use error::{Service, TripError};
pub use haversine::GeoPoint;
pub use planner::{plan_stops, StopPolicy};
pub use poi::StopCandidate;
pub use route::Route;
pub use trip::{plan_trip, PlannedStop, Trip, TripOptions, TripPlanner};
