//! Types and constants shared between the game server and its clients.
//!
//! Everything both ends of the wire must agree on lives here: the world
//! constants, the `Position` type with its map-bounds invariant, and the
//! JSON message shapes exchanged over the WebSocket.

use serde::{Deserialize, Serialize};

/// Side length of the square map. Positions live in `[0, MAP_SIZE]²`.
pub const MAP_SIZE: f32 = 1000.0;
/// Distance the shared player entity moves per accepted move command.
pub const PLAYER_SPEED: f32 = 5.0;
/// Distance a bot travels per tick. Also its arrival threshold: a bot that
/// is within one step of its target on both axes has arrived.
pub const BOT_SPEED: f32 = 3.0;
/// Default number of wandering bots simulated by the server.
pub const BOT_COUNT: usize = 100;
/// Default broadcast interval in milliseconds (10 Hz).
pub const TICK_INTERVAL_MS: u64 = 100;

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Map center, where the shared player entity spawns.
    pub fn center() -> Self {
        Self {
            x: MAP_SIZE / 2.0,
            y: MAP_SIZE / 2.0,
        }
    }

    /// Restores the map-bounds invariant after a mutation.
    pub fn clamp_to_map(&mut self) {
        self.x = self.x.clamp(0.0, MAP_SIZE);
        self.y = self.y.clamp(0.0, MAP_SIZE);
    }
}

/// Movement direction carried by a move command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A bot as it appears in an outbound snapshot. Coordinates are rounded to
/// integers to keep the payload small; the authoritative world keeps floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSnapshot {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

/// Server → client messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Sent once per connection so the client can bootstrap its render
    /// without waiting for the first tick.
    Init {
        player_pos: Position,
        map_size: u32,
        bot_count: usize,
    },
    /// Broadcast to every live session on each tick.
    Update {
        player: Position,
        bots: Vec<BotSnapshot>,
    },
}

/// Client → server messages.
///
/// Commands with an unrecognized `type` decode to `Unknown` and are ignored,
/// so newer clients can keep talking to older servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Move { direction: Direction },
    #[serde(other)]
    Unknown,
}
