pub mod distance;
pub mod logging;
