//! Wandering bot simulation.

use rand::Rng;
use shared::{BotSnapshot, Position, BOT_SPEED, MAP_SIZE};

/// An autonomously wandering entity.
///
/// A bot walks in a straight line toward its current target at `BOT_SPEED`
/// per tick. Once within one step of the target on both axes it has arrived:
/// it draws a new uniformly random target and stands still for that tick.
#[derive(Debug, Clone)]
pub struct Bot {
    id: String,
    position: Position,
    target: Position,
}

impl Bot {
    /// Spawns bot number `index` at a random position with a random target.
    pub fn spawn(index: usize, rng: &mut impl Rng) -> Self {
        Self {
            id: format!("bot_{}", index),
            position: random_point(rng),
            target: random_point(rng),
        }
    }

    /// Advances the bot one tick.
    pub fn step(&mut self, rng: &mut impl Rng) {
        let dx = self.target.x - self.position.x;
        let dy = self.target.y - self.position.y;

        if dx.abs() < BOT_SPEED && dy.abs() < BOT_SPEED {
            self.target = random_point(rng);
            return;
        }

        // Normalize so the bot moves at constant speed regardless of how
        // far away the target is.
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > 0.0 {
            self.position.x += dx / distance * BOT_SPEED;
            self.position.y += dy / distance * BOT_SPEED;
        }

        self.position.clamp_to_map();
    }

    /// The bot as it appears in an outbound update, coordinates rounded.
    pub fn snapshot(&self) -> BotSnapshot {
        BotSnapshot {
            id: self.id.clone(),
            x: self.position.x.round() as i32,
            y: self.position.y.round() as i32,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

fn random_point(rng: &mut impl Rng) -> Position {
    Position::new(
        rng.gen_range(0.0..=MAP_SIZE),
        rng.gen_range(0.0..=MAP_SIZE),
    )
}
