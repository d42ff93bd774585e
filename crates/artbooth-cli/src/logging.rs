use tracing_subscriber::EnvFilter;

pub fn init_logging(verbosity: u8) {
    // 0 = warnings only, 1 (-v) = info for artbooth crates, 2+ (-vv) = debug
    let filter = match verbosity {
        0 => "warn",
        1 => "warn,artbooth=info,artbooth_application=info,artbooth_infrastructure=info,artbooth_interaction=info",
        _ => "info,artbooth=debug,artbooth_application=debug,artbooth_infrastructure=debug,artbooth_interaction=debug,artbooth_core=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
