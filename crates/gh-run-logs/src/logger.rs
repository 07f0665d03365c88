/// Terminal logger setup
///
/// Progress and per-entry diagnostics are emitted through the `log` facade.
use log::LevelFilter;

/// Crates whose messages are shown by default
const OWN_MODULES: [&str; 2] = ["gh_run_logs", "gh_actions_log_demux"];

/// Initialize env_logger
///
/// # Filtering with RUST_LOG
///
/// - No RUST_LOG (default): this tool at Info level (Debug with `--verbose`),
///   dependencies like octocrab and hyper at Warn
/// - `RUST_LOG=debug`: Debug+ logs from all modules
/// - `RUST_LOG=gh_actions_log_demux=debug`: per-entry extraction details only
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = if std::env::var("RUST_LOG").is_ok() {
        env_logger::Builder::from_default_env()
    } else {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Warn);
        for module in OWN_MODULES {
            builder.filter_module(module, level);
        }
        builder
    };

    builder.format_timestamp(None).format_target(verbose).init();
}
