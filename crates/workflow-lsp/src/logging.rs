use log::LevelFilter;

/// Logger for the server process.
///
/// Without `RUST_LOG` the logger itself lets everything through and
/// `log::set_max_level` alone decides what is emitted, so the `logLevel`
/// setting can raise verbosity as well as lower it. With `RUST_LOG` its
/// directives apply as usual.
pub fn logger_builder(rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match rust_log {
        Some(filters) if !filters.trim().is_empty() => {
            builder.parse_filters(filters);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder
}

/// Install the process logger, starting at `info` until the client sends
/// its `logLevel`.
pub fn init_logging() {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filtered = rust_log.as_deref().is_some_and(|f| !f.trim().is_empty());

    if let Err(e) = logger_builder(rust_log.as_deref()).try_init() {
        eprintln!("Logger already initialized: {}", e);
        return;
    }
    if !env_filtered {
        log::set_max_level(LevelFilter::Info);
    }
}
