use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use danmaku_client::{Session, SessionConfig, SessionState};
use tracing_subscriber::EnvFilter;

/// Print the chat of a Panda TV room until interrupted
#[derive(Parser)]
struct Args {
    /// Numeric room id from the room's URL
    room_id: u64,

    /// How often to poll for new messages, in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let session = Session::start(args.room_id.to_string(), SessionConfig::default());
    let mut poll = tokio::time::interval(Duration::from_millis(args.poll_ms));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                session.stop();
                break;
            }
            _ = poll.tick() => {
                while let Some(msg) = session.pop() {
                    println!("@{}: {}", msg.nickname(), msg.content());
                }
                if session.state().is_terminal() {
                    break;
                }
            }
        }
    }

    if session.state() == SessionState::Closed && !session.is_stopped() {
        eprintln!("Connection closed by server");
    }
    session.join().await?;
    Ok(())
}
