use futures_util::{SinkExt, StreamExt};
use shared::{ClientMessage, Direction, ServerMessage};
use std::time::Duration;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

// Manual smoke-test client: connects, prints the init message, then walks
// the shared player in a square while printing periodic snapshots.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:8080".to_string());

    println!("Connecting to {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    let (mut sender, mut receiver) = ws_stream.split();

    // The first message is the bootstrap
    match receiver.next().await {
        Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerMessage>(&text)? {
            ServerMessage::Init {
                player_pos,
                map_size,
                bot_count,
            } => {
                println!(
                    "Init received: player at ({:.0}, {:.0}), map {}x{}, {} bots",
                    player_pos.x, player_pos.y, map_size, map_size, bot_count
                );
            }
            other => println!("Expected init but got: {:?}", other),
        },
        other => println!("Expected init message, got: {:?}", other),
    }

    // Print every tenth snapshot so the output stays readable
    let reader = tokio::spawn(async move {
        let mut updates = 0u32;
        while let Some(Ok(message)) = receiver.next().await {
            if let Message::Text(text) = message {
                if let Ok(ServerMessage::Update { player, bots }) = serde_json::from_str(&text) {
                    updates += 1;
                    if updates % 10 == 0 {
                        println!(
                            "Update {}: player at ({:.0}, {:.0}), {} bots",
                            updates, player.x, player.y, bots.len()
                        );
                    }
                }
            }
        }
        updates
    });

    // Walk a small square: five steps in each direction
    let directions = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    for &direction in &directions {
        for _ in 0..5 {
            let command = ClientMessage::Move { direction };
            sender
                .send(Message::Text(serde_json::to_string(&command)?))
                .await?;
            sleep(Duration::from_millis(200)).await;
        }
    }

    println!("Sending close");
    sender.send(Message::Close(None)).await?;

    let updates = reader.await?;
    println!("Test client finished after {} updates", updates);

    Ok(())
}
