use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(version, about = "Find nearby public transport stops for a list of points and output JSON")]
pub struct BootstrapConfig {
    /// Path to the stops CSV (e.g. a NaPTAN extract)
    #[clap(short('s'), long("stops-csv"), env("PTFINDER_STOPS_CSV"))]
    pub stops_csv: PathBuf,
    /// Path to the query points JSON (a list of {id, lat, lon} objects)
    #[clap(short('p'), long("points-json"), env("PTFINDER_POINTS_JSON"))]
    pub points_json: PathBuf,
    /// Search radius in meters (defaults to one mile)
    #[clap(short('r'), long("radius-m"), env("PTFINDER_RADIUS_M"), default_value_t = 1609.34)]
    pub radius_m: f64,
    /// Include a capped list of nearby stops in each output record
    #[clap(long("include-nearby"), env("PTFINDER_INCLUDE_NEARBY"))]
    pub include_nearby: bool,
    /// Maximum number of nearby stops per record (only with --include-nearby)
    #[clap(long("nearby-limit"), env("PTFINDER_NEARBY_LIMIT"), default_value_t = 50)]
    pub nearby_limit: usize,
    /// Output JSON filename
    #[clap(short('o'), long("out-json"), env("PTFINDER_OUT_JSON"), default_value_os = "pt_nearby_output.json")]
    pub out_json: PathBuf,
    #[clap(short('l'), long("log-level"), env("PTFINDER_LOG_LEVEL"), default_value_t, value_enum)]
    pub log_level: LogLevel,
}

impl BootstrapConfig {
    pub fn read() -> Self {
        BootstrapConfig::parse()
    }
}


#[derive(clap::ValueEnum, Clone, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
