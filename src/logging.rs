use tracing_subscriber::EnvFilter;

fn fallback_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr so stdout carries nothing but JSON.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_directive(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_directive() {
        assert_eq!(fallback_directive(0), "warn");
        assert_eq!(fallback_directive(2), "debug");
        assert_eq!(fallback_directive(9), "trace");
    }
}
