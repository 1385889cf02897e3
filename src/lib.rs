//! Chess rules engine: legal move generation, check and terminal state
//! detection, and the textual notations built around it (FEN, SAN, PGN and
//! UCI).
//!
//! ```
//! use rankfile::chess::game::Game;
//!
//! let mut game = Game::new();
//! for san in ["f3", "e5", "g4", "Qh4#"] {
//!     game.play_san(san).unwrap();
//! }
//! assert!(game.analysis().is_checkmate());
//! ```

pub mod chess;
pub mod notation;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the crate was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}
