//! # Position-Broadcast Game Server
//!
//! Authoritative server for a small multiplayer world: one shared
//! player-controlled entity plus a population of autonomously wandering
//! bots. Clients connect over WebSocket, send directional move commands,
//! and receive a JSON snapshot of the world ten times per second.
//!
//! ## Architecture
//!
//! Two long-lived tasks plus one task per connection:
//!
//! - The **broadcast loop** ([`broadcast`]) owns the tick cadence. Each tick
//!   it steps every bot, builds one snapshot of the world, serializes it
//!   once and fans it out to all live sessions. The world lock is released
//!   before any delivery, and fan-out is a non-blocking channel push per
//!   session, so a slow client can never stall the simulation.
//! - The **accept loop** ([`network`]) spawns a session task per incoming
//!   connection. A session registers itself with the
//!   [`registry::ConnectionRegistry`], receives a one-time init message and
//!   then decodes inbound move commands until the peer goes away, at which
//!   point it unregisters itself. Malformed payloads are logged and
//!   dropped; a session only ends when its channel does.
//!
//! The only shared mutable state is the [`game::World`] and the
//! [`registry::ConnectionRegistry`], each behind its own
//! `tokio::sync::RwLock`. No fault short of failing to bind the listener is
//! fatal: a bad payload costs one message, a dead peer costs one session.
//!
//! ## One player, many hands
//!
//! There is deliberately exactly one player entity shared by every
//! connection: move commands from all clients mutate the same position and
//! the last writer wins. Scaling to per-client entities would need a player
//! roster keyed by session id and a wider wire protocol; out of scope for
//! this server.

pub mod bot;
pub mod broadcast;
pub mod game;
pub mod network;
pub mod registry;
