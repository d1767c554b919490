use anyhow::Result;
use clap::Parser;
use grid_chase::game::GameConfig;
use grid_chase::modes::PlayMode;

#[derive(Parser)]
#[command(name = "grid-chase")]
#[command(version, about = "Grid chase: collect bonuses, dodge hazards")]
struct Cli {
    /// Side length of the square grid (minimum 3)
    #[arg(long, default_value = "10")]
    grid_size: usize,

    /// Tick interval at score 0, in milliseconds
    #[arg(long, default_value = "500")]
    tick_ms: u64,

    /// RNG seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = GameConfig {
        grid_size: cli.grid_size,
        base_tick_ms: cli.tick_ms,
    };

    let mut play_mode = PlayMode::new(config, cli.seed)?;
    play_mode.run().await?;

    Ok(())
}
