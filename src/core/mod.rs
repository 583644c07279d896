//! Core business logic - framework-agnostic temp-voice operations.
//!
//! Nothing in here touches serenity types; the bot layer turns gateway
//! events into the plain snapshots these modules consume, which keeps the
//! lifecycle and authorization rules unit-testable without a Discord
//! connection.

/// Authorization gate for control actions
pub mod authorize;
/// Guild container/lobby configuration store
pub mod guild_config;
/// Temp-channel creation/teardown state machine
pub mod lifecycle;
/// Channel-name derivation from member presence
pub mod presence;
