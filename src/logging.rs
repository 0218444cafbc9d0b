use tracing_subscriber::EnvFilter;

/// Installs a compact fmt subscriber writing to stderr, so stdout carries
/// only the human-readable training report.
///
/// Filtering follows `RUST_LOG`; without it this crate logs at `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("glyph_nn=info"));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
