use crate::dataset::{DatasetError, StopFrame};
use common::types::mode::Mode;
use common::util::distance::{haversine_distance_m, EARTH_RADIUS_M};
use log::debug;
use ordered_float::OrderedFloat;
use polars::frame::DataFrame;
use rstar::{RTree, RTreeObject, AABB};
use std::f64::consts::FRAC_PI_2;

/// One indexed stop with its attribute bag. The mode is derived exactly once,
/// at index build time.
#[derive(Debug, Clone)]
pub struct Stop {
    pub ordinal: usize,
    pub lat: f64,
    pub lon: f64,
    pub mode: Mode,
    pub stop_type: Option<String>,
    pub name: Option<String>,
    pub atco_code: Option<String>,
}

/// R-tree entry: degree coordinates plus the ordinal of the stop they belong to.
struct IndexedPoint {
    ordinal: usize,
    point: [f64; 2], // [lat, lon]
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// A stop within radius of a query point, annotated with its great-circle
/// distance. Borrows from the index; result sets are consumed immediately.
pub struct StopMatch<'a> {
    pub stop: &'a Stop,
    pub distance_m: f64,
}

/// Immutable spatial index over a stop dataset.
///
/// Radius queries run in two stages: an R-tree envelope prefilter in degree
/// space, then an exact haversine filter. The envelope is a (slightly padded)
/// superset of the search circle, so the haversine check alone decides
/// membership.
pub struct StopIndex {
    stops: Vec<Stop>,
    tree: RTree<IndexedPoint>,
}

impl StopIndex {
    pub fn build(stop_frame: StopFrame) -> Result<StopIndex, DatasetError> {
        let df = stop_frame.frame.collect()?;

        let lats = df.column("lat")?.f64()?.to_vec();
        let lons = df.column("lon")?.f64()?.to_vec();
        let stop_types = optional_str_column(&df, "stop_type")?;
        let names = optional_str_column(&df, "name")?;
        let codes = optional_str_column(&df, "atco_code")?;

        let mut stops = Vec::with_capacity(lats.len());
        for (row, (lat, lon)) in lats.into_iter().zip(lons).enumerate() {
            let (Some(lat), Some(lon)) = (lat, lon) else {
                continue;
            };
            let stop_type = stop_types.as_ref().and_then(|column| column[row].clone());
            let mode = Mode::from_stop_type(stop_type.as_deref());
            stops.push(Stop {
                ordinal: stops.len(),
                lat,
                lon,
                mode,
                stop_type,
                name: names.as_ref().and_then(|column| column[row].clone()),
                atco_code: codes.as_ref().and_then(|column| column[row].clone()),
            });
        }

        let tree = RTree::bulk_load(
            stops
                .iter()
                .map(|stop| IndexedPoint {
                    ordinal: stop.ordinal,
                    point: [stop.lat, stop.lon],
                })
                .collect(),
        );
        debug!(target: "index", "Built spatial index over {} stops", stops.len());

        Ok(StopIndex { stops, tree })
    }

    /// All stops within `radius_m` meters (inclusive) of the query point,
    /// sorted ascending by distance, ties broken by stop ordinal.
    pub fn within_radius(&self, lat: f64, lon: f64, radius_m: f64) -> Vec<StopMatch<'_>> {
        if self.stops.is_empty() || radius_m < 0.0 {
            return Vec::new();
        }

        let angular_radius = radius_m / EARTH_RADIUS_M;
        let envelope = search_envelope(lat, lon, angular_radius);

        let mut matches: Vec<StopMatch> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter_map(|entry| {
                let stop = &self.stops[entry.ordinal];
                let distance_m = haversine_distance_m(lat, lon, stop.lat, stop.lon);
                (distance_m <= radius_m).then_some(StopMatch { stop, distance_m })
            })
            .collect();

        matches.sort_by_key(|m| (OrderedFloat(m.distance_m), m.stop.ordinal));
        matches
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Bounding box in degrees that contains the circle of the given angular
/// radius around the query point. Padded marginally so that stops sitting
/// exactly on the boundary cannot be lost to rounding in the prefilter.
fn search_envelope(lat: f64, lon: f64, angular_radius: f64) -> AABB<[f64; 2]> {
    // The maximum latitude deviation on a great circle equals the angular
    // radius itself; the maximum longitude deviation is asin(sin r / cos lat).
    let pad = 1.0 + 1e-6;
    let lat_pad = angular_radius.to_degrees() * pad;

    let cos_lat = lat.to_radians().cos();
    let sin_radius = angular_radius.sin();
    let lon_pad = if angular_radius >= FRAC_PI_2 || cos_lat <= sin_radius {
        // Query circle reaches a pole (or wraps most of the sphere): every
        // longitude can contain matches
        180.0
    } else {
        (sin_radius / cos_lat).asin().to_degrees() * pad
    };

    let (lon_min, lon_max) = if lon - lon_pad < -180.0 || lon + lon_pad > 180.0 {
        // Crosses the antimeridian; fall back to the full longitude span
        // rather than splitting the query into two envelopes
        (-180.0, 180.0)
    } else {
        (lon - lon_pad, lon + lon_pad)
    };

    AABB::from_corners(
        [(lat - lat_pad).max(-90.0), lon_min],
        [(lat + lat_pad).min(90.0), lon_max],
    )
}

fn optional_str_column(
    df: &DataFrame,
    name: &str,
) -> Result<Option<Vec<Option<String>>>, DatasetError> {
    match df.column(name) {
        Ok(column) => {
            let values = column
                .str()?
                .into_iter()
                .map(|value| value.map(String::from))
                .collect();
            Ok(Some(values))
        }
        Err(_) => Ok(None),
    }
}
