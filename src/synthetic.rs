//! Synthetic dataset generator for stress testing and benchmarking.
//!
//! Generates trajectory and origin-destination datasets with realistic
//! shapes: winding routes with speed and elevation columns, and a
//! hub-and-spoke flow network with bidirectional edges.
//!
//! Feature-gated behind `synthetic`; not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use geoencode::synthetic::{RoutePattern, SyntheticScenario};
//! use geoencode::{Dataset, GeoPoint};
//!
//! let scenario = SyntheticScenario {
//!     origin: GeoPoint::new(47.37, 8.55),
//!     route_count: 10,
//!     points_per_route: 50,
//!     step_meters: 200.0,
//!     pattern: RoutePattern::Winding,
//!     category_count: 3,
//!     hub_count: 8,
//!     edge_count: 40,
//!     seed: 42,
//! };
//!
//! let Dataset::TrajectoryPoints(records) = scenario.trajectory_points() else {
//!     unreachable!()
//! };
//! assert_eq!(records.len(), 500);
//! ```

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::record::Record;
use crate::{Dataset, GeoPoint};

// ============================================================================
// Types
// ============================================================================

/// Shape of generated routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePattern {
    /// Straight line with minor drift.
    Straight,
    /// Winding road (at most ~30 degrees of heading change per step).
    Winding,
    /// Curves back towards its start.
    Loop,
}

/// Scenario configuration for generating synthetic data.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// Center of all generated data.
    pub origin: GeoPoint,
    /// Number of routes (trajectory points) or segments.
    pub route_count: usize,
    pub points_per_route: usize,
    /// Distance between consecutive route points in meters.
    pub step_meters: f64,
    pub pattern: RoutePattern,
    /// Distinct `category` labels cycled across routes and edges.
    pub category_count: usize,
    /// Points in the connection table.
    pub hub_count: usize,
    /// Directed edges between hubs.
    pub edge_count: usize,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

// ============================================================================
// Coordinate Helpers
// ============================================================================

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

fn meters_to_deg_lon(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lon = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg_lon.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lon
}

/// Move `meters` along `heading` (radians, 0 = east).
fn advance(from: &GeoPoint, heading: f64, meters: f64) -> GeoPoint {
    GeoPoint::new(
        (from.lat + meters_to_deg_lat(meters * heading.sin())).clamp(-89.9, 89.9),
        from.lon + meters_to_deg_lon(meters * heading.cos(), from.lat),
    )
}

/// Standard normal sample (Box-Muller).
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn category(index: usize, count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!("cat_{}", index % count)
    }
}

// ============================================================================
// Generation
// ============================================================================

impl SyntheticScenario {
    /// One polyline per route, starting near the origin.
    fn route_polylines(&self, rng: &mut StdRng) -> Vec<Vec<GeoPoint>> {
        (0..self.route_count)
            .map(|route| {
                let spread = rng.gen_range(0.0..(2.0 * PI));
                let start = advance(&self.origin, spread, rng.gen_range(0.0..5_000.0));
                let mut heading = route as f64 * (2.0 * PI / 8.0) + rng.gen_range(-0.5..0.5);
                let mut current = start;
                let mut points = Vec::with_capacity(self.points_per_route);

                for i in 0..self.points_per_route {
                    points.push(current);
                    heading += match self.pattern {
                        RoutePattern::Straight => rng.gen_range(-0.02..0.02),
                        RoutePattern::Winding => {
                            (i as f64 * 0.05).sin() * 0.3 + rng.gen_range(-0.15..0.15)
                        }
                        RoutePattern::Loop => {
                            2.0 * PI / self.points_per_route.max(1) as f64
                                + rng.gen_range(-0.05..0.05)
                        }
                    };
                    current = advance(&current, heading, self.step_meters);
                }
                points
            })
            .collect()
    }

    /// Trajectory points with `speed`, `z` and `category` columns.
    pub fn trajectory_points(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let polylines = self.route_polylines(&mut rng);
        let mut records = Vec::with_capacity(self.route_count * self.points_per_route);

        for (route, points) in polylines.iter().enumerate() {
            let base_speed = rng.gen_range(8.0..40.0);
            for (i, p) in points.iter().enumerate() {
                records.push(
                    Record::new()
                        .with("route_id", route as f64)
                        .with("point_id", i as f64)
                        .with("lat", p.lat)
                        .with("lon", p.lon)
                        .with("speed", (base_speed + 3.0 * gaussian(&mut rng)).max(0.0))
                        .with("z", 300.0 + 50.0 * (i as f64 * 0.05).sin())
                        .with("category", category(route, self.category_count)),
                );
            }
        }

        Dataset::TrajectoryPoints(records)
    }

    fn segment_records(&self, id_field: &str) -> Vec<Record> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let polylines = self.route_polylines(&mut rng);
        let mut records = Vec::new();

        for (route, points) in polylines.iter().enumerate() {
            for pair in points.windows(2) {
                let id = records.len() as f64;
                records.push(
                    Record::new()
                        .with(id_field, id)
                        .with("start_lat", pair[0].lat)
                        .with("start_lon", pair[0].lon)
                        .with("end_lat", pair[1].lat)
                        .with("end_lon", pair[1].lon)
                        .with("value", rng.gen_range(0.0..100.0))
                        .with("category", category(route, self.category_count)),
                );
            }
        }
        records
    }

    /// Consecutive route legs as independent segments.
    pub fn trajectory_segments(&self) -> Dataset {
        Dataset::TrajectorySegments(self.segment_records("segment_id"))
    }

    /// Consecutive route legs with an `order` column, shuffled.
    pub fn ordered_trajectory(&self) -> Dataset {
        let mut records = self.segment_records("order");
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(1));
        // Fisher-Yates; the builder must restore the order.
        for i in (1..records.len()).rev() {
            records.swap(i, rng.gen_range(0..=i));
        }
        Dataset::OrderedTrajectory(records)
    }

    /// Hubs scattered around the origin and weighted directed edges between
    /// them. Roughly a third of the edges have a reverse partner.
    pub fn connections(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let points: Vec<Record> = (0..self.hub_count)
            .map(|id| {
                let p = advance(
                    &self.origin,
                    rng.gen_range(0.0..(2.0 * PI)),
                    rng.gen_range(10_000.0..2_000_000.0),
                );
                Record::new()
                    .with("id", id as f64)
                    .with("lat", p.lat)
                    .with("lon", p.lon)
                    .with("name", format!("hub_{id}"))
                    .with("population", rng.gen_range(1_000.0..5_000_000.0))
            })
            .collect();

        let mut edges = Vec::with_capacity(self.edge_count);
        if self.hub_count >= 2 {
            while edges.len() < self.edge_count {
                let source = rng.gen_range(0..self.hub_count);
                let mut destination = rng.gen_range(0..self.hub_count - 1);
                if destination >= source {
                    destination += 1;
                }
                let flow = rng.gen_range(1.0..1_000.0);
                let label = category(edges.len(), self.category_count);
                edges.push(edge(source, destination, flow, &label));
                if edges.len() < self.edge_count && rng.gen_bool(0.33) {
                    edges.push(edge(destination, source, flow * rng.gen_range(0.5..1.5), &label));
                }
            }
        }

        Dataset::Connections { points, edges }
    }
}

fn edge(source: usize, destination: usize, flow: f64, label: &str) -> Record {
    Record::new()
        .with("source", source as f64)
        .with("destination", destination as f64)
        .with("flow", flow)
        .with("category", label)
}

// ============================================================================
// Preset Scenarios
// ============================================================================

/// Zurich, Switzerland.
const ZURICH: GeoPoint = GeoPoint {
    lat: 47.37,
    lon: 8.55,
};

impl SyntheticScenario {
    /// 50 routes of 200 points, 300 edges between 40 hubs. Baseline benchmark.
    pub fn standard() -> Self {
        Self {
            origin: ZURICH,
            route_count: 50,
            points_per_route: 200,
            step_meters: 100.0,
            pattern: RoutePattern::Winding,
            category_count: 5,
            hub_count: 40,
            edge_count: 300,
            seed: 42,
        }
    }

    /// 1000 routes of 500 points, 20k edges between 500 hubs.
    pub fn extreme_scale() -> Self {
        Self {
            origin: ZURICH,
            route_count: 1000,
            points_per_route: 500,
            step_meters: 50.0,
            pattern: RoutePattern::Winding,
            category_count: 12,
            hub_count: 500,
            edge_count: 20_000,
            seed: 44,
        }
    }

    /// More categories than palette colors, to exercise wrap-around.
    pub fn many_categories() -> Self {
        Self {
            category_count: 20,
            route_count: 40,
            points_per_route: 20,
            seed: 45,
            ..Self::standard()
        }
    }

    /// Standard scenario scaled to `route_count` routes and `edge_count` edges.
    pub fn with_counts(route_count: usize, edge_count: usize) -> Self {
        Self {
            route_count,
            edge_count,
            hub_count: (edge_count / 5).clamp(2, 1_000),
            ..Self::standard()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
