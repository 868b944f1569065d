//! Minimal interactive session against a running DM service.
//!
//! Usage: `cargo run --example solo_session -- <host:port>`
//! (defaults to `127.0.0.1:8000`).

use std::time::Duration;

use gridlink::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let host = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8000".to_string());

    let session = GameSessionBuilder::new().map("default").connect(&host).await?;
    if let Some(id) = session.session_id() {
        eprintln!("session {id} connected to {host}");
    }

    // Put a party member down and hand control to the DM.
    session.place_random_token().await?;
    session.enable_ai_control().await?;
    session.user_input("Hello Dungeon Master").await?;

    // Follow the conversation for a while, answering dice requests.
    let mut seen = 0;
    for _ in 0..60 {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let chat = session.chat().await?;
        for msg in &chat[seen..] {
            let who = match msg.role {
                Role::User => "you",
                Role::Dm => " dm",
            };
            println!("[{who}] {}", msg.content);
        }
        seen = chat.len();

        if session.link_state().await? == LinkState::AwaitingDiceRoll {
            let roll = session.roll_dice(None).await?;
            println!("[you] rolled {} -> {}", roll.spec, roll.total);
        }
        if session.link_state().await? == LinkState::Disconnected {
            eprintln!("DM hung up");
            break;
        }
    }

    session.shutdown().await?;
    Ok(())
}
