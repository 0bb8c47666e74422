use log::LevelFilter;

/// Install the global logger. `--verbose` forces debug output for this crate;
/// otherwise RUST_LOG applies, defaulting to warnings only.
pub fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if verbose {
        builder.filter_module("rollcall", LevelFilter::Debug);
    }

    // A second init (e.g. from tests) keeps the first logger
    let _ = builder.format_timestamp(None).try_init();
}

pub fn print_verbose(verbose: bool, msg: &str) {
    if verbose {
        println!("Verbose: {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_repeatable() {
        init_logger(true);
        init_logger(false);
        log::debug!("logger initialised twice without panicking");
    }
}
