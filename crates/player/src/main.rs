//! FSF Player - headless client binary.
//!
//! Connects, joins the configured game, reduces the event stream and logs
//! snapshot changes until the server closes the connection or Ctrl-C.

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use futures_util::StreamExt;

    use fsf_player::animation::Rect;
    use fsf_player::infrastructure::websocket;
    use fsf_player::ports::outbound::TransportEvent;
    use fsf_player::{ClientConfig, GameSession, JoinContext};

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fsf_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FSF Player");

    let config = ClientConfig::from_env()?;
    let player_name = config
        .player_name
        .clone()
        .context("FSF_PLAYER_NAME environment variable is required")?;
    let join = match config.game_id.clone() {
        Some(game_id) => Some(JoinContext::new(game_id, player_name.clone())),
        None => {
            tracing::warn!("FSF_GAME_ID not set; connecting without joining a game");
            None
        }
    };

    let (socket, mut events) = websocket::connect(
        config.server_url.as_str(),
        join,
        || tracing::info!("Joined; waiting for INIT"),
        || tracing::info!("Connection closed"),
    )?;
    // No anchors are ever registered here, so motion events are not consumed
    let session: GameSession<Rect> = GameSession::mount_headless(socket, player_name);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_version = session.version();
    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                let closed = matches!(event, TransportEvent::Closed { .. });
                session.handle_transport_event(event);

                for signal in session.take_signals() {
                    tracing::info!(?signal, "View signal");
                }
                if session.version() != last_version {
                    last_version = session.version();
                    if let Some(snapshot) = session.snapshot() {
                        tracing::info!(
                            game = %snapshot.game_name,
                            status = ?snapshot.status,
                            players = snapshot.players.len(),
                            active = ?snapshot.active_player,
                            phase = ?snapshot.phase,
                            hand = snapshot.hand.len(),
                            "Snapshot updated"
                        );
                    }
                }
                if closed {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    session.unmount();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    fsf_player::init_wasm_logging();
    tracing::info!("FSF Player core loaded");
}
