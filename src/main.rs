use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ml_2048::config::AppConfig;
use ml_2048::game::HighScoreStore;
use ml_2048::modes::{AutoplayPolicy, ConsoleMode, HumanMode, TrainMode, WatchMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ml_2048")]
#[command(version, about = "2048 with a Q-learning autoplay agent")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// TOML config file; defaults are used when it does not exist
    #[arg(long, default_value = "ml_2048.toml")]
    config: PathBuf,

    /// Directory for the high score and the saved model (overrides the config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Number of training games (overrides the config)
    #[arg(long)]
    episodes: Option<usize>,

    /// Seed for deterministic training
    #[arg(long)]
    seed: Option<u64>,

    /// Policy used for autoplay and watch mode
    #[arg(long, default_value = "q-learning")]
    policy: Policy,

    /// Print the default config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play in the terminal UI with keyboard controls
    Human,
    /// Play by typing W/A/S/D commands
    Console,
    /// Train the Q-learning agent without a UI
    Train,
    /// Watch the selected policy play
    Watch,
}

#[derive(Clone, ValueEnum)]
enum Policy {
    /// Tabular Q-learning agent, learns while it plays
    QLearning,
    /// Fixed right/down/up/left preference
    Heuristic,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml().context("Failed to serialize config")?);
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(episodes) = cli.episodes {
        config.train.episodes = episodes;
    }

    let policy = || match cli.policy {
        Policy::QLearning => {
            AutoplayPolicy::q_learning(config.q_learning.clone(), config.data_dir.clone())
        }
        Policy::Heuristic => AutoplayPolicy::heuristic(),
    };
    let high_scores = HighScoreStore::in_dir(&config.data_dir);

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config.game.clone(), high_scores, policy());
            human_mode.run().await?;
        }
        Mode::Console => {
            let mut console_mode = ConsoleMode::new(config.game.clone(), high_scores);
            console_mode.run(std::io::stdin().lock(), std::io::stdout())?;
        }
        Mode::Train => {
            let mut train_mode = TrainMode::new(&config, cli.seed);
            train_mode.run()?;
        }
        Mode::Watch => {
            let mut watch_mode = WatchMode::new(config.game.clone(), high_scores, policy());
            watch_mode.run().await?;
        }
    }

    Ok(())
}
