//! Core business logic - framework-agnostic repository operations.
//!
//! Every function here is a short-lived transactional unit against the shared
//! store; no state is held between calls. The Discord layer maps each gateway
//! event or command to exactly one of these operations and owns all
//! user-facing text.

/// Guild configuration repository
pub mod guilds;
/// Bot-side ban and filter repository
pub mod moderation;
/// Starboard repository - stars, snapshots, promotion
pub mod starboard;
/// Guild tag repository
pub mod tags;
