//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
//! Logs go to stderr so stdout stays clean for `--json`.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
pub fn directive_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "mupship=info",
        2 => "mupship=debug",
        _ => "mupship=trace",
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive_for(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_directives() {
        assert_eq!(directive_for(0), "warn");
        assert_eq!(directive_for(1), "mupship=info");
        assert_eq!(directive_for(2), "mupship=debug");
        assert_eq!(directive_for(7), "mupship=trace");
    }
}
