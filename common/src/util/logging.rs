use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter};
use std::time::{Duration, SystemTime};

/// Sets up env_logger bridged with indicatif, so that log lines and progress
/// bars don't trample each other. The returned `MultiProgress` must be passed
/// to `run_with_spinner` / `run_with_pb`.
pub fn initialize_logging(log_level: LevelFilter) -> MultiProgress {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();

    let multi = MultiProgress::new();

    let wrapper = LogWrapper::new(multi.clone(), logger);
    wrapper.try_init().unwrap();

    multi
}

/// Runs a task with an indeterminate spinner, logging the elapsed time once done.
pub fn run_with_spinner<'a, F, Out>(
    multi: &MultiProgress, target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = SystemTime::now();

    let pb = ProgressBar::new_spinner()
        .with_message(format!("{}...", task_desc))
        .with_style(ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}").unwrap());
    pb.enable_steady_tick(Duration::from_millis(100));
    multi.add(pb.clone());

    let out = function();

    pb.finish_and_clear();
    multi.remove(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed().unwrap_or_default());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}

/// Runs a task with a determinate progress bar. The task is handed the bar
/// and is responsible for advancing it.
pub fn run_with_pb<'a, F, Out>(
    multi: &MultiProgress, target: &'a str, task_desc: &'a str, total: u64, print_message: bool, function: F,
) -> Out where
    F: FnOnce(ProgressBar) -> Out,
{
    let start_time = SystemTime::now();

    let pb = ProgressBar::new(total)
        .with_message(format!("{}...", task_desc))
        .with_style(
            ProgressStyle::with_template("[{elapsed:.green}] {msg} [{wide_bar:.cyan/blue}] {human_pos}/{human_len} [{eta}]")
                .unwrap().progress_chars("=> ")
        );
    pb.enable_steady_tick(Duration::from_secs(1));
    multi.add(pb.clone());

    let out = function(pb.clone());

    pb.finish_and_clear();
    multi.remove(&pb);
    if print_message {
        let elapsed = indicatif::HumanDuration(start_time.elapsed().unwrap_or_default());
        info!(target: target, "{} finished (took {})", task_desc, elapsed);
    }

    out
}
