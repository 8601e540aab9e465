use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;

/// Coarse transport category, derived from a dataset-specific stop-type code.
///
/// Stop-type vocabularies vary between extracts (NaPTAN alone has several),
/// so classification is best-effort: known codes are matched exactly first,
/// then prefix/substring heuristics take over. The result is always one of
/// these six variants.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Bus,
    Rail,
    Metro,
    Tram,
    Ferry,
    Other,
}

impl Mode {
    /// Classify a raw stop-type code. Total: any input (including `None`,
    /// empty or gibberish) maps to exactly one mode.
    ///
    /// The heuristic checks run in a fixed order (bus, rail, metro, tram,
    /// ferry). Codes that merely share a leading letter with a mode will be
    /// classified as that mode; that imprecision is accepted.
    pub fn from_stop_type(stop_type: Option<&str>) -> Mode {
        let Some(raw) = stop_type else {
            return Mode::Other;
        };
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            return Mode::Other;
        }
        if let Some(mode) = Mode::from_known_code(&code) {
            return mode;
        }

        if code.starts_with('B') {
            return Mode::Bus;
        }
        if code.starts_with('R') {
            return Mode::Rail;
        }
        if code.starts_with('M') || code.contains("UNDER") || code.contains("METRO") {
            return Mode::Metro;
        }
        if code.starts_with('T') || code.contains("TRAM") || code.contains("LIGHT") {
            return Mode::Tram;
        }
        if code.starts_with('F') || code.contains("FERR") {
            return Mode::Ferry;
        }
        Mode::Other
    }

    /// Exact lookup of common NaPTAN-style stop-type codes.
    fn from_known_code(code: &str) -> Option<Mode> {
        match code {
            // Bus / Coach
            "BCT" | "BCS" | "BST" | "BCE" | "BCQ" => Some(Mode::Bus),
            // Rail
            "RLY" | "RSE" | "RPL" => Some(Mode::Rail),
            // Metro / Underground
            "MET" | "MTR" | "UND" => Some(Mode::Metro),
            // Tram / Light rail
            "TRM" | "LRT" => Some(Mode::Tram),
            // Ferry
            "FER" | "FTD" => Some(Mode::Ferry),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Bus => "bus",
            Mode::Rail => "rail",
            Mode::Metro => "metro",
            Mode::Tram => "tram",
            Mode::Ferry => "ferry",
            Mode::Other => "other",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
