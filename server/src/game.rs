use crate::bot::Bot;
use rand::Rng;
use shared::{Direction, Position, ServerMessage, MAP_SIZE, PLAYER_SPEED};

/// The canonical world state: the single shared player entity plus the bot
/// population. Bot membership is fixed at startup; only contents mutate.
///
/// All access goes through an `Arc<RwLock<World>>`, so callers of the
/// mutating methods hold the write lock and see a consistent view.
#[derive(Debug, Clone)]
pub struct World {
    player: Position,
    bots: Vec<Bot>,
}

impl World {
    /// Creates a world with the player at map center and `bot_count` bots
    /// scattered uniformly.
    pub fn new(bot_count: usize) -> Self {
        let mut rng = rand::thread_rng();
        Self::with_rng(bot_count, &mut rng)
    }

    pub fn with_rng(bot_count: usize, rng: &mut impl Rng) -> Self {
        Self {
            player: Position::center(),
            bots: (0..bot_count).map(|index| Bot::spawn(index, rng)).collect(),
        }
    }

    /// Applies a move command to the shared player entity.
    ///
    /// Every connection mutates the same position; last writer wins.
    pub fn apply_move(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.player.y -= PLAYER_SPEED,
            Direction::Down => self.player.y += PLAYER_SPEED,
            Direction::Left => self.player.x -= PLAYER_SPEED,
            Direction::Right => self.player.x += PLAYER_SPEED,
        }
        self.player.clamp_to_map();
    }

    /// Advances every bot one tick.
    pub fn step_bots(&mut self) {
        let mut rng = rand::thread_rng();
        for bot in &mut self.bots {
            bot.step(&mut rng);
        }
    }

    /// The per-tick snapshot broadcast to every session.
    pub fn snapshot(&self) -> ServerMessage {
        ServerMessage::Update {
            player: self.player,
            bots: self.bots.iter().map(Bot::snapshot).collect(),
        }
    }

    /// The one-time bootstrap message for a newly active session.
    pub fn init_message(&self) -> ServerMessage {
        ServerMessage::Init {
            player_pos: self.player,
            map_size: MAP_SIZE as u32,
            bot_count: self.bots.len(),
        }
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::BOT_COUNT;

    #[test]
    fn test_player_spawns_at_center() {
        let world = World::new(0);
        assert_eq!(world.player(), Position::new(500.0, 500.0));
    }

    #[test]
    fn test_apply_move_each_direction() {
        let mut world = World::new(0);

        world.apply_move(Direction::Up);
        assert_eq!(world.player(), Position::new(500.0, 495.0));

        world.apply_move(Direction::Down);
        assert_eq!(world.player(), Position::new(500.0, 500.0));

        world.apply_move(Direction::Left);
        assert_eq!(world.player(), Position::new(495.0, 500.0));

        world.apply_move(Direction::Right);
        assert_eq!(world.player(), Position::new(500.0, 500.0));
    }

    #[test]
    fn test_repeated_moves_clamp_at_top_edge() {
        let mut world = World::new(0);

        // 100 moves reach y = 0; the rest must not push past it.
        for _ in 0..200 {
            world.apply_move(Direction::Up);
        }

        assert_eq!(world.player().y, 0.0);
        assert_eq!(world.player().x, 500.0);
    }

    #[test]
    fn test_moves_stay_in_bounds_at_every_edge() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let mut world = World::new(0);
            for _ in 0..500 {
                world.apply_move(direction);
                let pos = world.player();
                assert!((0.0..=MAP_SIZE).contains(&pos.x));
                assert!((0.0..=MAP_SIZE).contains(&pos.y));
            }
        }
    }

    #[test]
    fn test_bot_population_is_fixed() {
        let mut world = World::new(BOT_COUNT);
        assert_eq!(world.bots().len(), BOT_COUNT);

        for _ in 0..50 {
            world.step_bots();
        }

        assert_eq!(world.bots().len(), BOT_COUNT);
        for bot in world.bots() {
            let pos = bot.position();
            assert!((0.0..=MAP_SIZE).contains(&pos.x));
            assert!((0.0..=MAP_SIZE).contains(&pos.y));
        }
    }

    #[test]
    fn test_snapshot_reflects_world() {
        let mut world = World::new(10);
        world.apply_move(Direction::Up);

        match world.snapshot() {
            ServerMessage::Update { player, bots } => {
                assert_eq!(player, Position::new(500.0, 495.0));
                assert_eq!(bots.len(), 10);
                for bot in &bots {
                    assert!((0..=MAP_SIZE as i32).contains(&bot.x));
                    assert!((0..=MAP_SIZE as i32).contains(&bot.y));
                }
            }
            _ => panic!("Expected an update message"),
        }
    }

    #[test]
    fn test_init_message_reports_configuration() {
        let world = World::new(25);

        match world.init_message() {
            ServerMessage::Init {
                player_pos,
                map_size,
                bot_count,
            } => {
                assert_eq!(player_pos, Position::center());
                assert_eq!(map_size, 1000);
                assert_eq!(bot_count, 25);
            }
            _ => panic!("Expected an init message"),
        }
    }
}
