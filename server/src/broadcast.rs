//! The fixed-period broadcast loop.

use crate::game::World;
use crate::registry::ConnectionRegistry;
use log::{debug, error};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{interval, MissedTickBehavior};

/// Steps the world and fans the resulting snapshot out to every session,
/// forever. The cadence is best-effort: a missed tick is skipped, not
/// caught up.
pub async fn run(
    world: Arc<RwLock<World>>,
    registry: Arc<RwLock<ConnectionRegistry>>,
    tick_duration: Duration,
) {
    let mut ticker = interval(tick_duration);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        tick(&world, &registry).await;
    }
}

/// One broadcast tick: advance the bots, snapshot, serialize once, fan out.
pub async fn tick(world: &Arc<RwLock<World>>, registry: &Arc<RwLock<ConnectionRegistry>>) {
    // The world lock covers the step and the snapshot read so every
    // recipient sees the same consistent state; it is released before any
    // delivery work happens.
    let snapshot = {
        let mut world = world.write().await;
        world.step_bots();
        world.snapshot()
    };

    match serde_json::to_string(&snapshot) {
        Ok(payload) => {
            let delivered = registry.write().await.broadcast(&payload);
            debug!("Tick broadcast to {} sessions", delivered);
        }
        Err(e) => error!("Failed to serialize snapshot: {}", e),
    }
}
