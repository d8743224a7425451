//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Bot-side moderation commands (bans, filters)
pub mod moderation;

/// Starboard configuration and manual star commands
pub mod starboard;

/// Tag commands
pub mod tag;
