use crate::index::StopMatch;
use crate::points::QueryPoint;
use common::types::mode::Mode;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// The closest stop of one mode.
#[derive(Debug, Clone, Serialize)]
pub struct NearestStop {
    pub distance_m: f64,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atco_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<String>,
}

/// One entry of the capped nearby-stop listing.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyStop {
    pub mode: Mode,
    pub distance_m: f64,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atco_code: Option<String>,
}

/// Output record for one query point. Modes without any stop in range are
/// absent from both maps rather than present with empty values.
#[derive(Debug, Serialize)]
pub struct PointRecord {
    pub id: serde_json::Value,
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
    pub counts_by_mode: BTreeMap<Mode, usize>,
    pub nearest_by_mode: BTreeMap<Mode, NearestStop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_stops: Option<Vec<NearbyStop>>,
}

/// Derives one point's output record from its (distance-sorted) result set.
/// Pure: no re-querying, no side effects.
pub fn aggregate(
    point: &QueryPoint,
    radius_m: f64,
    matches: &[StopMatch],
    include_nearby: bool,
    nearby_limit: usize,
) -> PointRecord {
    PointRecord {
        id: point.id.clone(),
        lat: point.lat,
        lon: point.lon,
        radius_m,
        counts_by_mode: counts_by_mode(matches),
        nearest_by_mode: nearest_by_mode(matches),
        nearby_stops: include_nearby.then(|| nearby_stops(matches, nearby_limit)),
    }
}

/// Tally of result-set members per mode. Zero-count modes are omitted.
pub fn counts_by_mode(matches: &[StopMatch]) -> BTreeMap<Mode, usize> {
    matches
        .iter()
        .map(|m| m.stop.mode)
        .counts()
        .into_iter()
        .collect()
}

/// The closest stop per mode present. Since the result set is already sorted
/// ascending by distance, the first occurrence of each mode wins.
pub fn nearest_by_mode(matches: &[StopMatch]) -> BTreeMap<Mode, NearestStop> {
    let mut nearest: BTreeMap<Mode, NearestStop> = BTreeMap::new();
    for m in matches {
        nearest.entry(m.stop.mode).or_insert_with(|| NearestStop {
            distance_m: m.distance_m,
            lat: m.stop.lat,
            lon: m.stop.lon,
            name: m.stop.name.clone(),
            atco_code: m.stop.atco_code.clone(),
            stop_type: m.stop.stop_type.clone(),
        });
    }
    nearest
}

/// The first `limit` members of the result set, rendered for output.
pub fn nearby_stops(matches: &[StopMatch], limit: usize) -> Vec<NearbyStop> {
    matches
        .iter()
        .take(limit)
        .map(|m| NearbyStop {
            mode: m.stop.mode,
            distance_m: m.distance_m,
            lat: m.stop.lat,
            lon: m.stop.lon,
            stop_type: m.stop.stop_type.clone(),
            name: m.stop.name.clone(),
            atco_code: m.stop.atco_code.clone(),
        })
        .collect()
}
