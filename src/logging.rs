use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `verbose` lowers the default level to debug, `trace` goes one further and
/// shows every control tick. `RUST_LOG` overrides both.
pub fn init(verbose: bool, trace: bool) {
    let level = if trace {
        LevelFilter::Trace
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Only fails if a logger is already installed; tests may init repeatedly.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init(false, false);
        init(true, true);
        log::debug!("logger still usable");
    }
}
