//! Slash command implementations organized by category.

/// General utility commands
pub mod general;

/// Guild configuration commands
pub mod setup;

/// Temp-voice commands
pub mod voice;

// Export commands
pub use general::*;
pub use setup::*;
pub use voice::*;
