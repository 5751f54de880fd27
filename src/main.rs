#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::sync::{Arc, Mutex};

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use textadv_client::{
    init_logging,
    terminal::{spawn_key_reader, RawModeGuard, TerminalScreen},
    ClientConfig, GameClient, HttpTransport, PollOutcome, SessionId, SharedScreen,
    DEFAULT_SERVER,
};
#[cfg(feature = "std")]
use tokio::time::Duration;
#[cfg(feature = "std")]
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(author, version, about = "Terminal client for the text adventure server", long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// Log level (error, warn, info, debug, trace). Overrides TEXTADV_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// List the games the server offers.
    Games {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Start a new game, or attach to a running session, and play.
    Play {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
        #[arg(long, help = "Game to start (e.g., --game cloak)", required_unless_present = "session", conflicts_with = "session")]
        game: Option<String>,
        #[arg(long, help = "Existing session id to attach to")]
        session: Option<String>,
        #[arg(long, default_value_t = 10)]
        ping_interval_secs: u64,
        #[arg(long, default_value_t = 60)]
        poll_timeout_secs: u64,
    },
}

#[cfg(feature = "std")]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Games { server } => {
            let transport = HttpTransport::new(&ClientConfig::with_server(server))?;
            let games = transport.list_games().await?;
            if games.is_empty() {
                println!("No games available on {}", transport.base_url());
            }
            for game in games {
                println!("{}", game);
            }
        }
        Commands::Play {
            server,
            game,
            session,
            ping_interval_secs,
            poll_timeout_secs,
        } => {
            let config = ClientConfig {
                ping_interval: Duration::from_secs(ping_interval_secs.max(1)),
                poll_timeout: Duration::from_secs(poll_timeout_secs.max(1)),
                ..ClientConfig::with_server(server)
            };
            let transport = HttpTransport::new(&config)?;
            let session = match (game, session) {
                (Some(game), _) => transport.start_game(&game).await?,
                (None, Some(id)) => SessionId::new(id)?,
                (None, None) => return Err(anyhow::anyhow!("Either --game or --session is required")),
            };
            println!("Connected to {} (Esc or Ctrl-C to quit)", transport.base_url());

            let screen: SharedScreen = Arc::new(Mutex::new(TerminalScreen::new()?));
            let client = GameClient::new(config, Arc::new(transport), session, screen);

            let (key_tx, key_rx) = tokio::sync::mpsc::unbounded_channel();
            let summary = {
                let _raw = RawModeGuard::enable()?;
                let _reader = spawn_key_reader(key_tx);
                client.run(key_rx, CancellationToken::new()).await?
            };

            println!();
            match summary.outcome {
                PollOutcome::Cancelled => println!("Goodbye."),
                PollOutcome::ConnectionLost(reason) => {
                    eprintln!("Connection to the game was lost: {}", reason);
                }
            }
        }
    }
    Ok(())
}
