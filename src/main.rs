use std::env;
use std::error::Error;

use clap::Parser;

use joybridge::cli::{self, Args, Commands};
use joybridge::input::manager::Manager;
use joybridge::input::target::create_sink;
use joybridge::led::StatusIndicator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    match args.cmd.clone().unwrap_or(Commands::Run) {
        Commands::Run => run(cli::load_config(&args)?).await,
        Commands::Probe => cli::handle_probe(&cli::load_config(&args)?),
        Commands::Descriptor => cli::handle_descriptor(),
    }
}

async fn run(config: joybridge::config::AdapterConfig) -> Result<(), Box<dyn Error>> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting joybridge v{}", VERSION);
    log::info!(
        "{} with {} port(s), {:?} backend, {:?} sink",
        config.name,
        config.ports.len(),
        config.backend,
        config.sink
    );

    let sink = create_sink(config.sink, config.ports.len())?;
    let mut backend = cli::create_backend(&config);
    let mut manager = Manager::new(&config, backend.as_mut(), sink);
    let mut leds = StatusIndicator::new(&config);

    let mut interval = tokio::time::interval(config.poll_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                manager.poll();
                leds.update(manager.is_ready(), manager.init_ok(), &manager.connected_states());
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log::error!("Unable to listen for shutdown signal: {e}");
                }
                break;
            }
        }
    }

    log::info!("Shutting down");
    manager.shutdown();
    leds.update(false, manager.init_ok(), &[]);
    log::info!("joybridge stopped");

    Ok(())
}
