use serde::Deserialize;
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One input point to search around. `id` is opaque and echoed back into the
/// output record (`null` when absent). Coordinates are mandatory: a point
/// without numeric lat/lon is rejected before any querying starts, since the
/// radius-query math assumes finite input.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPoint {
    #[serde(default)]
    pub id: serde_json::Value,
    pub lat: f64,
    pub lon: f64,
}

/// Reads the query points file: a JSON list of `{id?, lat, lon}` objects.
/// Any other shape is fatal.
pub fn load_query_points(path: &Path) -> Result<Vec<QueryPoint>, PointsError> {
    let file = File::open(path)?;
    let points = serde_json::from_reader(BufReader::new(file))?;
    Ok(points)
}

#[derive(thiserror::Error, Debug)]
pub enum PointsError {
    File(#[from] std::io::Error),
    Parse(#[from] serde_json::Error),
}

impl Display for PointsError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            PointsError::File(err) => err,
            PointsError::Parse(err) => err,
        };
        write!(f, "{}", err)
    }
}
