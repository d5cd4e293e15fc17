//! Day-by-day split of a route over lodging stops.
//!
//! Lodgings within `max_detour_m` of a route vertex become candidate stops at
//! that vertex's distance along the route. A dynamic program over the
//! candidates, ordered by route distance, picks the chain from start to
//! destination that minimises
//!
//! ```text
//! sum over days: 5 * |day_distance - target| + 0.02 * detour(day_end)
//! ```
//!
//! Each chosen stop is then paired with the candidates closest to it along
//! the route as alternatives.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::directions::waypoint::parse_waypoints;
use crate::directions::RouteError;
use crate::itinerary::lodging::{LodgingCatalog, LodgingKind};

pub const DEFAULT_MAX_DETOUR_M: f64 = 2_500.0;
pub const DEFAULT_ALTERNATIVES: usize = 4;

const DAY_DISTANCE_WEIGHT: f64 = 5.0;
const DETOUR_WEIGHT: f64 = 0.02;

/// Body of `POST /itinerary`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryBody {
    /// Route geometry as `[lon, lat]` pairs, e.g. `paths[0].points.coordinates`.
    pub coordinates: Vec<Value>,
    pub target_daily_km: f64,
    #[serde(default)]
    pub max_detour_m: Option<f64>,
    #[serde(default)]
    pub alternatives: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Start,
    Destination,
    Hotel,
    Shelter,
}

impl From<LodgingKind> for StopKind {
    fn from(kind: LodgingKind) -> Self {
        match kind {
            LodgingKind::Hotel => StopKind::Hotel,
            LodgingKind::Shelter => StopKind::Shelter,
        }
    }
}

/// A candidate overnight stop projected onto the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub name: String,
    pub kind: StopKind,
    pub coordinates: [f64; 2],
    /// Distance along the route to the closest route vertex.
    pub route_distance_m: f64,
    /// Straight-line distance from that vertex to the stop.
    pub off_route_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: usize,
    pub start_distance_m: f64,
    pub end_distance_m: f64,
    pub distance_m: f64,
    pub stop: Stop,
    pub alternatives: Vec<Stop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub total_distance_m: f64,
    pub days: Vec<DayPlan>,
}

/// Validate an itinerary body and plan against `catalog`.
pub fn plan_itinerary(body: ItineraryBody, catalog: &LodgingCatalog) -> Result<Itinerary, RouteError> {
    let route: Vec<Point<f64>> = parse_waypoints(&body.coordinates)?
        .into_iter()
        .map(|w| Point::new(w.lon, w.lat))
        .collect();

    if !(body.target_daily_km.is_finite() && body.target_daily_km > 0.0) {
        return Err(RouteError::invalid(format!(
            "target_daily_km must be a positive number, got {}",
            body.target_daily_km
        )));
    }
    let max_detour_m = body.max_detour_m.unwrap_or(DEFAULT_MAX_DETOUR_M);
    if !(max_detour_m.is_finite() && max_detour_m >= 0.0) {
        return Err(RouteError::invalid(format!(
            "max_detour_m must be a non-negative number, got {max_detour_m}"
        )));
    }
    let alternatives = body.alternatives.unwrap_or(DEFAULT_ALTERNATIVES);

    let cumulative = cumulative_distances(&route);
    let total = cumulative[cumulative.len() - 1];
    if total <= 0.0 {
        return Err(RouteError::invalid("Route has zero length"));
    }

    let candidates = candidates(&route, &cumulative, catalog, max_detour_m);
    let chain = cheapest_chain(&candidates, body.target_daily_km * 1000.0);

    let days = chain
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let from = &candidates[pair[0]];
            let to = &candidates[pair[1]];
            DayPlan {
                day: i + 1,
                start_distance_m: from.route_distance_m,
                end_distance_m: to.route_distance_m,
                distance_m: to.route_distance_m - from.route_distance_m,
                stop: to.clone(),
                alternatives: nearest_alternatives(to, &candidates, alternatives),
            }
        })
        .collect();

    Ok(Itinerary {
        total_distance_m: total,
        days,
    })
}

/// Distance in meters from the first vertex to each vertex.
fn cumulative_distances(route: &[Point<f64>]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(route.len());
    let mut total = 0.0;
    cumulative.push(total);
    for pair in route.windows(2) {
        total += Haversine.distance(pair[0], pair[1]);
        cumulative.push(total);
    }
    cumulative
}

/// Start, every lodging within `max_detour_m` of the route, and destination,
/// ordered by route distance. Start is first and destination last.
fn candidates(
    route: &[Point<f64>],
    cumulative: &[f64],
    catalog: &LodgingCatalog,
    max_detour_m: f64,
) -> Vec<Stop> {
    let first = route[0];
    let last = route[route.len() - 1];
    let total = cumulative[cumulative.len() - 1];

    let mut lodgings: Vec<Stop> = catalog
        .lodgings()
        .iter()
        .filter_map(|lodging| {
            let (index, off_route) = route
                .iter()
                .map(|vertex| Haversine.distance(*vertex, lodging.position))
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(&b.1))?;
            (off_route <= max_detour_m).then(|| Stop {
                name: lodging.name.clone(),
                kind: lodging.kind.into(),
                coordinates: [lodging.position.x(), lodging.position.y()],
                route_distance_m: cumulative[index],
                off_route_m: off_route,
            })
        })
        .collect();
    lodgings.sort_by(|a, b| a.route_distance_m.total_cmp(&b.route_distance_m));

    let mut stops = Vec::with_capacity(lodgings.len() + 2);
    stops.push(Stop {
        name: "Start".into(),
        kind: StopKind::Start,
        coordinates: [first.x(), first.y()],
        route_distance_m: 0.0,
        off_route_m: 0.0,
    });
    stops.extend(lodgings);
    stops.push(Stop {
        name: "Destination".into(),
        kind: StopKind::Destination,
        coordinates: [last.x(), last.y()],
        route_distance_m: total,
        off_route_m: 0.0,
    });
    stops
}

/// Indices of the cheapest start-to-destination chain. Each step must move
/// strictly forward along the route.
fn cheapest_chain(stops: &[Stop], target_m: f64) -> Vec<usize> {
    let n = stops.len();
    let mut cost = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    cost[0] = 0.0;

    for i in 0..n {
        if cost[i].is_infinite() {
            continue;
        }
        for j in (i + 1)..n {
            let day = stops[j].route_distance_m - stops[i].route_distance_m;
            if day <= 0.0 {
                continue;
            }
            let step = DAY_DISTANCE_WEIGHT * (day - target_m).abs()
                + DETOUR_WEIGHT * stops[j].off_route_m;
            if cost[i] + step < cost[j] {
                cost[j] = cost[i] + step;
                previous[j] = Some(i);
            }
        }
    }

    // The destination is always reachable from start, since the route has length.
    let mut chain = vec![n - 1];
    let mut current = n - 1;
    while let Some(p) = previous[current] {
        chain.push(p);
        current = p;
    }
    chain.reverse();
    chain
}

/// Lodgings closest to `stop` along the route, excluding the stop itself.
fn nearest_alternatives(stop: &Stop, candidates: &[Stop], count: usize) -> Vec<Stop> {
    let mut others: Vec<&Stop> = candidates
        .iter()
        .filter(|c| !matches!(c.kind, StopKind::Start | StopKind::Destination))
        .filter(|c| *c != stop)
        .collect();
    others.sort_by(|a, b| {
        let da = (a.route_distance_m - stop.route_distance_m).abs();
        let db = (b.route_distance_m - stop.route_distance_m).abs();
        da.total_cmp(&db)
    });
    others.into_iter().take(count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::lodging::Lodging;
    use serde_json::json;

    /// A straight route due east along 55.68°N, one vertex every 0.1° of
    /// longitude (about 6.3 km).
    fn eastward_route(vertices: usize) -> Vec<Value> {
        (0..vertices)
            .map(|i| json!([12.0 + i as f64 * 0.1, 55.68]))
            .collect()
    }

    fn lodging(name: &str, kind: LodgingKind, lon: f64, lat: f64) -> Lodging {
        Lodging {
            name: name.into(),
            kind,
            position: Point::new(lon, lat),
        }
    }

    fn body(coordinates: Vec<Value>, target_daily_km: f64) -> ItineraryBody {
        ItineraryBody {
            coordinates,
            target_daily_km,
            max_detour_m: None,
            alternatives: None,
        }
    }

    #[test]
    fn test_no_lodgings_is_one_day() {
        let plan = plan_itinerary(body(eastward_route(5), 50.0), &LodgingCatalog::default()).unwrap();

        assert_eq!(plan.days.len(), 1);
        let day = &plan.days[0];
        assert_eq!(day.stop.kind, StopKind::Destination);
        assert_eq!(day.start_distance_m, 0.0);
        assert_eq!(day.end_distance_m, plan.total_distance_m);
        assert!(day.alternatives.is_empty());
        // Four 0.1° steps at 55.68°N.
        assert!((plan.total_distance_m - 25_100.0).abs() < 200.0, "{}", plan.total_distance_m);
    }

    #[test]
    fn test_stops_near_daily_target() {
        // 21 vertices: about 126 km in total.
        let catalog = LodgingCatalog::new(vec![
            lodging("Hotel Early", LodgingKind::Hotel, 12.3, 55.681),
            lodging("Shelter Middle", LodgingKind::Shelter, 13.0, 55.681),
            lodging("Hotel Late", LodgingKind::Hotel, 13.7, 55.681),
            lodging("Off Route", LodgingKind::Hotel, 13.0, 56.2),
        ]);

        let plan = plan_itinerary(body(eastward_route(21), 63.0), &catalog).unwrap();

        assert_eq!(plan.days.len(), 2);
        assert_eq!(plan.days[0].stop.name, "Shelter Middle");
        assert_eq!(plan.days[0].stop.kind, StopKind::Shelter);
        assert!(plan.days[0].stop.off_route_m < 200.0);
        assert_eq!(plan.days[1].stop.kind, StopKind::Destination);
        assert_eq!(plan.days[1].start_distance_m, plan.days[0].end_distance_m);

        let alternatives: Vec<_> = plan.days[0].alternatives.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(alternatives.len(), 2);
        assert!(alternatives.contains(&"Hotel Early"));
        assert!(alternatives.contains(&"Hotel Late"));
        assert!(!alternatives.contains(&"Off Route"));
    }

    #[test]
    fn test_alternatives_limit() {
        let catalog = LodgingCatalog::new(
            (1..10)
                .map(|i| lodging(&format!("Shelter {i}"), LodgingKind::Shelter, 12.0 + i as f64 * 0.1, 55.68))
                .collect(),
        );
        let mut request = body(eastward_route(11), 30.0);
        request.alternatives = Some(2);

        let plan = plan_itinerary(request, &catalog).unwrap();
        assert!(plan.days.len() > 1);
        assert!(plan.days.iter().all(|d| d.alternatives.len() <= 2));
        assert!(plan.days.iter().all(|d| d.distance_m > 0.0));
        let last = plan.days.last().unwrap();
        assert_eq!(last.end_distance_m, plan.total_distance_m);
    }

    #[test]
    fn test_invalid_inputs() {
        let catalog = LodgingCatalog::default();

        let err = plan_itinerary(body(eastward_route(1), 50.0), &catalog).unwrap_err();
        assert!(matches!(err, RouteError::InvalidInput(_)));

        let err = plan_itinerary(body(eastward_route(3), 0.0), &catalog).unwrap_err();
        assert!(err.to_string().contains("target_daily_km"));

        let err = plan_itinerary(body(vec![json!([12.0, 55.0]), json!([12.0, 55.0])], 50.0), &catalog)
            .unwrap_err();
        assert_eq!(err, RouteError::invalid("Route has zero length"));

        let mut request = body(eastward_route(3), 50.0);
        request.max_detour_m = Some(-1.0);
        assert!(plan_itinerary(request, &catalog).is_err());
    }
}
