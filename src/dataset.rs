use log::{debug, info};
use polars::error::PolarsError;
use polars::prelude::{col, lit, DataType, LazyCsvReader, LazyFileListReader, LazyFrame, Schema};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

// Column names vary between stop extracts, so each logical field is resolved
// by trying a fixed-priority candidate list against the dataset's schema.
const LATITUDE_CANDIDATES: &[&str] = &["Latitude", "latitude", "LATITUDE", "Lat", "lat"];
const LONGITUDE_CANDIDATES: &[&str] = &["Longitude", "longitude", "LONGITUDE", "Lon", "lon", "Long", "long"];
const STOP_TYPE_CANDIDATES: &[&str] = &["StopType", "StopTypeCode", "stop_type", "Stop_Type", "StopTypeRef"];
const NAME_CANDIDATES: &[&str] = &["CommonName", "commonname", "Name", "StopName", "Landmark", "LocalityName"];
const CODE_CANDIDATES: &[&str] = &["ATCOCode", "AtcoCode", "atcocode", "NaptanCode", "NaPTANCode"];

/// A cleaned stops frame with canonical column names: `lat` and `lon` are
/// always present (Float64, non-null, within valid coordinate ranges);
/// `stop_type`, `name` and `atco_code` exist only when the source dataset
/// had a resolvable column for them.
pub struct StopFrame {
    pub frame: LazyFrame,
}

/// Reads a stops CSV from disk. The schema is not inferred: every column is
/// read as a string and coerced afterwards, so a few malformed rows cannot
/// poison the whole file.
pub fn load_stops(path: &Path) -> Result<StopFrame, DatasetError> {
    debug!(target: "dataset", "Reading stops from {path:?}");

    let frame = LazyCsvReader::new(path.to_string_lossy().as_ref())
        .with_infer_schema_length(Some(0))
        .finish()?;

    resolve_stops(frame)
}

/// Resolves the coordinate/attribute columns of a raw stops frame and cleans
/// it up. Rows whose coordinates fail numeric coercion, are missing, or fall
/// outside [-90, 90] / [-180, 180] are dropped silently; the dataset is
/// assumed to be majority-valid and partial corruption must not abort a run.
pub fn resolve_stops(mut frame: LazyFrame) -> Result<StopFrame, DatasetError> {
    let schema = frame.collect_schema()?;

    let lat = resolve_column(&schema, LATITUDE_CANDIDATES);
    let lon = resolve_column(&schema, LONGITUDE_CANDIDATES);
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(DatasetError::MissingCoordinates {
            columns: schema.iter_names().map(|name| name.to_string()).collect(),
        });
    };

    let stop_type = resolve_column(&schema, STOP_TYPE_CANDIDATES);
    let name = resolve_column(&schema, NAME_CANDIDATES);
    let code = resolve_column(&schema, CODE_CANDIDATES);
    info!(
        target: "dataset",
        "Resolved columns: lat={lat}, lon={lon}, stop_type={stop_type:?}, name={name:?}, code={code:?}"
    );

    // Coordinate casts are non-strict: values that fail coercion become null
    // and are filtered out below.
    let mut selection = vec![
        col(lat.as_str()).cast(DataType::Float64).alias("lat"),
        col(lon.as_str()).cast(DataType::Float64).alias("lon"),
    ];
    if let Some(stop_type) = &stop_type {
        selection.push(col(stop_type.as_str()).cast(DataType::String).alias("stop_type"));
    }
    if let Some(name) = &name {
        selection.push(col(name.as_str()).cast(DataType::String).alias("name"));
    }
    if let Some(code) = &code {
        selection.push(col(code.as_str()).cast(DataType::String).alias("atco_code"));
    }

    let frame = frame
        .select(selection)
        .filter(col("lat").is_not_null().and(col("lon").is_not_null()))
        // NaN coordinates fail these comparisons and get dropped as well
        .filter(col("lat").gt_eq(lit(-90.0)).and(col("lat").lt_eq(lit(90.0))))
        .filter(col("lon").gt_eq(lit(-180.0)).and(col("lon").lt_eq(lit(180.0))));

    Ok(StopFrame { frame })
}

/// Returns the first candidate that exists in the schema, if any.
fn resolve_column(schema: &Schema, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| schema.iter_names().any(|name| name.as_str() == **candidate))
        .map(|candidate| candidate.to_string())
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    Polars(#[from] PolarsError),
    MissingCoordinates { columns: Vec<String> },
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DatasetError::Polars(err) => write!(f, "{}", err),
            DatasetError::MissingCoordinates { columns } => write!(
                f,
                "Could not find latitude/longitude columns. Found columns: {}",
                columns.join(", ")
            ),
        }
    }
}
