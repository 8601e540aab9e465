mod aggregate;
mod bootstrap_config;
mod dataset;
mod index;
mod points;

use crate::aggregate::PointRecord;
use crate::bootstrap_config::BootstrapConfig;
use crate::dataset::DatasetError;
use crate::index::StopIndex;
use crate::points::PointsError;
use common::util::logging;
use log::{error, info, warn};
use rayon::prelude::*;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() {
    let _ = run().inspect_err(|err| error!(target: "main", "{}", err));
}

fn run() -> Result<(), PtFinderError> {
    let config = BootstrapConfig::read();
    let multi = logging::initialize_logging(config.log_level.clone().into());

    let stop_frame = dataset::load_stops(&config.stops_csv)?;
    let index = logging::run_with_spinner(&multi, "index", "Building stop index", || {
        StopIndex::build(stop_frame)
    })?;
    if index.is_empty() {
        warn!(target: "index", "Stop index is empty; every query will come back with no results");
    } else {
        info!(target: "index", "Indexed {} stops", index.len());
    }

    let points = points::load_query_points(&config.points_json)?;
    info!(target: "query", "Querying {} points with radius {}m", points.len(), config.radius_m);

    // Points are independent and the index is read-only after construction,
    // so the per-point queries can run in parallel. Collecting the indexed
    // iterator keeps the output in input order.
    let records: Vec<PointRecord> = logging::run_with_pb(
        &multi,
        "query",
        "Querying nearby stops",
        points.len() as u64,
        true,
        |pb| {
            points
                .par_iter()
                .map(|point| {
                    let matches = index.within_radius(point.lat, point.lon, config.radius_m);
                    let record = aggregate::aggregate(
                        point,
                        config.radius_m,
                        &matches,
                        config.include_nearby,
                        config.nearby_limit,
                    );
                    pb.inc(1);
                    record
                })
                .collect()
        },
    );

    let out_file = File::create(&config.out_json)?;
    let mut writer = BufWriter::new(out_file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;
    info!(
        target: "main",
        "Wrote {} records to {}",
        records.len(),
        config.out_json.display()
    );

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum PtFinderError {
    Dataset(#[from] DatasetError),
    Points(#[from] PointsError),
    IO(#[from] std::io::Error),
    Output(#[from] serde_json::Error),
}

impl Display for PtFinderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            PtFinderError::Dataset(err) => err,
            PtFinderError::Points(err) => err,
            PtFinderError::IO(err) => err,
            PtFinderError::Output(err) => err,
        };
        let prefix = match self {
            PtFinderError::Dataset(_) => "Importing stops dataset",
            PtFinderError::Points(_) => "Reading query points",
            PtFinderError::IO(_) => "Error during IO",
            PtFinderError::Output(_) => "Writing output",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
