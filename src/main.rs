//! `gcaptcha` - Randomized image CAPTCHA generator.
//!
//! Copyright (C) 2026 Maverick
//! SPDX-License-Identifier: AGPL-3.0-only
//!
//! Loads configuration, sets up logging, builds one challenge and writes its
//! PNG to disk.

use gcaptcha::{Config, Result, build_challenge};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn run(config: &Config) -> Result<()> {
    let challenge = build_challenge(config)?;
    let png = challenge.render()?;
    std::fs::write(&config.output_path, &png)?;
    info!(
        solution = ?challenge.solution(),
        bytes = png.len(),
        path = %config.output_path.display(),
        "Challenge written"
    );
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    let config = Config::from_env();
    info!(
        kind = ?config.kind,
        output = %config.output_path.display(),
        seed = ?config.seed,
        log_format = %config.log_format,
        "Generator initialized"
    );

    let code = match run(&config) {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "Challenge generation failed");
            1
        }
    };

    drop(guard);
    std::process::exit(code);
}
