//! Trip orchestration: geocode, base route, stop planning, POI lookup, and
//! the via-route through the chosen stops.
//!
//! A [`Trip`] is rebuilt from scratch on every call and never mutated
//! afterwards. Stop ETAs come from the base route's profile, i.e. they are
//! measured against the trip without detours to the stops themselves.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Service, TripError};
use crate::haversine::GeoPoint;
use crate::observer::{Outcome, ResponseEvent, ResponseObserver};
use crate::planner::StopPolicy;
use crate::poi::{parse_pois, rank_by_distance, StopCandidate};
use crate::route::{parse_route, Route};
use crate::traits::{Geocoder, PoiSearch, RouteProvider};

/// Label used when no POI was found near a planned stop.
pub const PLACEHOLDER_STOP_LABEL: &str = "Planned stop";

#[derive(Debug, Clone)]
pub struct TripOptions {
    pub policy: StopPolicy,
    /// First POI search radius; a single retry uses twice this.
    pub initial_radius_m: u32,
    /// Maximum candidates requested per search.
    pub candidate_limit: usize,
    /// Concurrent POI lookups. `1` runs them sequentially.
    pub poi_workers: usize,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            policy: StopPolicy::default(),
            initial_radius_m: 2500,
            candidate_limit: 5,
            poi_workers: 4,
        }
    }
}

/// A stop inserted along the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStop {
    pub location: GeoPoint,
    pub label: String,
    /// Index into the base route's coordinates the stop was planned at.
    pub route_index: usize,
    /// Seconds from start to `route_index` on the base route.
    pub eta_s: f64,
    /// The POI chosen for this stop, if any was found.
    pub candidate: Option<StopCandidate>,
}

impl PlannedStop {
    fn from_candidate(route_index: usize, eta_s: f64, candidate: StopCandidate) -> Self {
        Self {
            location: candidate.location,
            label: candidate.label(),
            route_index,
            eta_s,
            candidate: Some(candidate),
        }
    }

    fn placeholder(route_index: usize, eta_s: f64, location: GeoPoint) -> Self {
        Self {
            location,
            label: PLACEHOLDER_STOP_LABEL.to_string(),
            route_index,
            eta_s,
            candidate: None,
        }
    }

    pub fn eta_hours(&self) -> f64 {
        self.eta_s / 3600.0
    }

    /// Short ETA label such as `"~2.9h"`.
    pub fn eta_label(&self) -> String {
        format!("~{:.1}h", self.eta_hours())
    }

    pub fn is_placeholder(&self) -> bool {
        self.candidate.is_none()
    }
}

/// Immutable result of one planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    start: GeoPoint,
    destination: GeoPoint,
    base_route: Route,
    stops: Vec<PlannedStop>,
    final_route: Route,
}

impl Trip {
    pub fn start(&self) -> GeoPoint {
        self.start
    }

    pub fn destination(&self) -> GeoPoint {
        self.destination
    }

    /// Direct route without stops.
    pub fn base_route(&self) -> &Route {
        &self.base_route
    }

    pub fn stops(&self) -> &[PlannedStop] {
        &self.stops
    }

    /// Route through all stops; equal to the base route when there are none.
    pub fn final_route(&self) -> &Route {
        &self.final_route
    }

    /// One-line summary, e.g. `"Route: 512.3 km · ~5.1 h · 1 stop(s)"`.
    pub fn summary(&self) -> String {
        format!(
            "Route: {:.1} km · ~{:.1} h · {} stop(s)",
            self.final_route.distance_m() / 1000.0,
            self.final_route.duration_s() / 3600.0,
            self.stops.len()
        )
    }

    /// Everything a map/list view needs to draw the trip.
    pub fn presentation(&self) -> TripView {
        TripView {
            path: self.final_route.coordinates().to_vec(),
            start: self.start,
            destination: self.destination,
            stops: self
                .stops
                .iter()
                .map(|stop| StopRow {
                    location: stop.location,
                    label: stop.label.clone(),
                    eta: stop.eta_label(),
                })
                .collect(),
            summary: self.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRow {
    pub location: GeoPoint,
    pub label: String,
    pub eta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripView {
    pub path: Vec<GeoPoint>,
    pub start: GeoPoint,
    pub destination: GeoPoint,
    pub stops: Vec<StopRow>,
    pub summary: String,
}

/// Plans trips against injected geocoding, routing and POI collaborators.
pub struct TripPlanner<G, R, P> {
    geocoder: G,
    router: R,
    pois: P,
    options: TripOptions,
    observer: Option<Arc<dyn ResponseObserver>>,
}

impl<G, R, P> TripPlanner<G, R, P>
where
    G: Geocoder,
    R: RouteProvider,
    P: PoiSearch + Sync,
{
    pub fn new(geocoder: G, router: R, pois: P) -> Self {
        Self {
            geocoder,
            router,
            pois,
            options: TripOptions::default(),
            observer: None,
        }
    }

    pub fn with_options(mut self, options: TripOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &TripOptions {
        &self.options
    }

    /// Geocode `destination` and plan a trip to it from `start`.
    pub fn plan(&self, start: GeoPoint, destination: &str) -> Result<Trip, TripError> {
        info!(destination, "planning trip");
        let destination = self.geocoder.geocode(destination)?;
        self.plan_between(start, destination)
    }

    /// Plan a trip between two already-resolved points.
    pub fn plan_between(&self, start: GeoPoint, destination: GeoPoint) -> Result<Trip, TripError> {
        let base_route = self.fetch_route(&[start, destination])?;
        let cumulative = base_route.cumulative_seconds();
        let indices = self.options.policy.plan(&cumulative);

        let targets: Vec<StopTarget> = indices
            .iter()
            .filter_map(|&route_index| {
                let location = *base_route.coordinates().get(route_index)?;
                let eta_s = *cumulative.get(route_index)?;
                Some(StopTarget {
                    route_index,
                    location,
                    eta_s,
                })
            })
            .collect();

        let lookup = StopLookup {
            pois: &self.pois,
            options: &self.options,
            observer: self.observer.as_deref(),
        };
        let stops = lookup.resolve_all(&targets);

        let final_route = if stops.is_empty() {
            base_route.clone()
        } else {
            let mut waypoints = Vec::with_capacity(stops.len() + 2);
            waypoints.push(start);
            waypoints.extend(stops.iter().map(|stop| stop.location));
            waypoints.push(destination);
            self.fetch_route(&waypoints)?
        };

        let trip = Trip {
            start,
            destination,
            base_route,
            stops,
            final_route,
        };
        info!(summary = %trip.summary(), "trip planned");
        Ok(trip)
    }

    fn fetch_route(&self, waypoints: &[GeoPoint]) -> Result<Route, TripError> {
        let body = self.router.route(waypoints)?;
        let parsed = parse_route(&body);
        let outcome = match &parsed {
            Ok(route) => Outcome::Parsed {
                items: route.coordinates().len(),
            },
            Err(err) => Outcome::Failed(err),
        };
        observe(self.observer.as_deref(), Service::Routing, &body, outcome);
        parsed
    }
}

/// Plan a trip with default options.
pub fn plan_trip<G, R, P>(
    start: GeoPoint,
    destination: &str,
    geocoder: &G,
    router: &R,
    pois: &P,
) -> Result<Trip, TripError>
where
    G: Geocoder,
    R: RouteProvider,
    P: PoiSearch + Sync,
{
    TripPlanner::new(geocoder, router, pois).plan(start, destination)
}

#[derive(Debug, Clone, Copy)]
struct StopTarget {
    route_index: usize,
    location: GeoPoint,
    eta_s: f64,
}

struct StopLookup<'a, P> {
    pois: &'a P,
    options: &'a TripOptions,
    observer: Option<&'a dyn ResponseObserver>,
}

impl<P: PoiSearch + Sync> StopLookup<'_, P> {
    /// Resolve every target, preserving target order in the output.
    fn resolve_all(&self, targets: &[StopTarget]) -> Vec<PlannedStop> {
        let workers = self.options.poi_workers.min(targets.len());
        if workers <= 1 {
            return targets.iter().map(|target| self.resolve(target)).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| targets.par_iter().map(|target| self.resolve(target)).collect()),
            Err(err) => {
                warn!(error = %err, "POI worker pool unavailable, looking up stops sequentially");
                targets.iter().map(|target| self.resolve(target)).collect()
            }
        }
    }

    fn resolve(&self, target: &StopTarget) -> PlannedStop {
        match self.nearest_candidate(target.location) {
            Ok(Some(candidate)) => {
                debug!(route_index = target.route_index, label = %candidate.label(), "stop resolved");
                PlannedStop::from_candidate(target.route_index, target.eta_s, candidate)
            }
            Ok(None) => {
                debug!(route_index = target.route_index, "no POI nearby, using route point");
                PlannedStop::placeholder(target.route_index, target.eta_s, target.location)
            }
            Err(err) => {
                warn!(
                    route_index = target.route_index,
                    service = ?err.service(),
                    error = %err,
                    "POI lookup failed, using route point"
                );
                PlannedStop::placeholder(target.route_index, target.eta_s, target.location)
            }
        }
    }

    /// Search at the initial radius, then once more at double radius if
    /// nothing turned up.
    fn nearest_candidate(&self, center: GeoPoint) -> Result<Option<StopCandidate>, TripError> {
        let initial = self.options.initial_radius_m;
        let mut candidates = self.search(center, initial)?;
        if candidates.is_empty() {
            candidates = self.search(center, initial.saturating_mul(2))?;
        }
        Ok(rank_by_distance(candidates, center, self.options.candidate_limit)
            .into_iter()
            .next())
    }

    fn search(&self, center: GeoPoint, radius_m: u32) -> Result<Vec<StopCandidate>, TripError> {
        let body = self.pois.search(center, radius_m, self.options.candidate_limit)?;
        let parsed = parse_pois(&body);
        let outcome = match &parsed {
            Ok(candidates) => Outcome::Parsed {
                items: candidates.len(),
            },
            Err(err) => Outcome::Failed(err),
        };
        observe(self.observer, Service::PoiSearch, &body, outcome);
        debug!(radius_m, found = parsed.as_ref().map_or(0, Vec::len), "POI search");
        parsed
    }
}

fn observe(observer: Option<&dyn ResponseObserver>, service: Service, body: &str, outcome: Outcome<'_>) {
    if let Some(observer) = observer {
        observer.on_response(&ResponseEvent {
            service,
            body,
            outcome,
        });
    }
}
