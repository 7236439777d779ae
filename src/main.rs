//! Looks up the default postal code against every default source and prints
//! whichever answer arrives first.

use cep_race::{Config, Racer};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    // stdout carries only the verdict; diagnostics go to stderr
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let racer = match Racer::new(Config::default()) {
        Ok(racer) => racer,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    match racer.race().await {
        Ok(resolved) => {
            println!("API: {}", resolved.source_name);
            println!("Address: {}", resolved.address);
        }
        Err(e) => println!("Error: {}", e),
    }
}
