//! Discord interaction handlers (gateway events, autocomplete).

/// Autocomplete providers for slash command parameters
pub mod autocomplete;
/// Reaction and message lifecycle handlers driving the starboard
pub mod reactions;
