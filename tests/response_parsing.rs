//! Parsing realistic engine payloads into routes, candidates and stop plans.

use trip_planner::error::TripError;
use trip_planner::haversine::GeoPoint;
use trip_planner::planner::StopPolicy;
use trip_planner::poi::{parse_pois, rank_by_distance};
use trip_planner::route::parse_route;

/// Trimmed OSRM `route` response for a short hop in Washington, DC, with two
/// alternatives. The second alternative must not leak into the result.
const OSRM_DC: &str = r#"{
  "code": "Ok",
  "routes": [
    {
      "geometry": {
        "coordinates": [[-77.0164, 38.9047], [-77.0171, 38.9061], [-77.0203, 38.9102], [-77.0497, 38.9296]],
        "type": "LineString"
      },
      "legs": [
        {
          "annotation": {"duration": [20.1, 48.3, 311.6]},
          "summary": "",
          "weight": 380,
          "duration": 380,
          "steps": [],
          "distance": 4321.9
        }
      ],
      "weight_name": "routability",
      "weight": 380,
      "duration": 380,
      "distance": 4321.9
    },
    {
      "geometry": {"coordinates": [[-77.0164, 38.9047], [-77.0497, 38.9296]], "type": "LineString"},
      "legs": [],
      "duration": 999,
      "distance": 9999
    }
  ],
  "waypoints": [
    {"hint": "x", "distance": 3.2, "name": "", "location": [-77.0164, 38.9047]},
    {"hint": "y", "distance": 1.1, "name": "Connecticut Avenue NW", "location": [-77.0497, 38.9296]}
  ]
}"#;

const OVERPASS_MIXED: &str = r#"{
  "version": 0.6,
  "generator": "Overpass API",
  "osm3s": {"timestamp_osm_base": "2024-05-01T00:00:00Z"},
  "elements": [
    {"type": "node", "id": 101, "lat": 38.9060, "lon": -77.0170, "tags": {"amenity": "fuel", "name": "Exxon", "brand": "Exxon"}},
    {"type": "node", "id": 102, "lat": 38.9050, "lon": -77.0165, "tags": {"amenity": "cafe"}},
    {"type": "node", "id": 103, "lon": -77.0180, "tags": {"amenity": "parking", "name": "Lot 7"}},
    {"type": "way", "id": 104, "nodes": [1, 2, 3], "tags": {"amenity": "parking"}},
    {"type": "node", "id": 105, "lat": "38.9100,", "lon": "-77.0200", "tags": {"name": "Diner"}}
  ]
}"#;

#[test]
fn test_minimal_two_point_route() {
    let body = r#"{"routes":[{"distance":1234.5,"duration":456.7,"geometry":{"coordinates":[[-77.0,38.9],[-77.01,38.91]]}}]}"#;
    let route = parse_route(body).expect("should parse");

    assert_eq!(route.distance_m(), 1234.5);
    assert_eq!(route.duration_s(), 456.7);
    assert_eq!(route.coordinates().len(), 2);
    assert_eq!(route.coordinates()[0], GeoPoint::new(38.9, -77.0));
    assert_eq!(route.coordinates()[1], GeoPoint::new(38.91, -77.01));
}

#[test]
fn test_realistic_route_uses_first_alternative() {
    let route = parse_route(OSRM_DC).expect("should parse");

    assert_eq!(route.distance_m(), 4321.9);
    assert_eq!(route.duration_s(), 380.0);
    assert_eq!(route.coordinates().len(), 4);
    assert_eq!(route.coordinates()[3], GeoPoint::new(38.9296, -77.0497));

    let cumulative = route.cumulative_seconds();
    assert_eq!(cumulative.len(), route.coordinates().len());
    assert_eq!(cumulative[0], 0.0);
    assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
    let segment_sum: f64 = route.segment_durations_s().iter().sum();
    assert!((segment_sum - route.duration_s()).abs() < 1.0);
}

#[test]
fn test_short_route_profile_plans_nothing() {
    let route = parse_route(OSRM_DC).expect("should parse");
    assert!(StopPolicy::default().plan(&route.cumulative_seconds()).is_empty());
}

#[test]
fn test_malformed_coordinate_token_fails_the_route() {
    let body = OSRM_DC.replace("[-77.0171, 38.9061]", r#"[-77.0171, "n/a"]"#);
    assert!(matches!(
        parse_route(&body),
        Err(TripError::MalformedNumber { .. })
    ));
}

#[test]
fn test_overpass_records_are_filtered_and_defaulted() {
    let pois = parse_pois(OVERPASS_MIXED).expect("should parse");

    let summary: Vec<(&str, &str)> = pois
        .iter()
        .map(|p| (p.name.as_str(), p.category.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![("Exxon", "fuel"), ("Stop", "cafe"), ("Diner", "amenity")]
    );
    assert_eq!(pois[2].location, GeoPoint::new(38.91, -77.02));
}

#[test]
fn test_ranking_picks_closest_to_query_point() {
    let center = GeoPoint::new(38.9047, -77.0164);
    let pois = parse_pois(OVERPASS_MIXED).expect("should parse");

    let ranked = rank_by_distance(pois, center, 2);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].category, "cafe");
    assert_eq!(ranked[1].name, "Exxon");
}
