//! Deterministic session module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as a monotonic millisecond counter, never read from a clock
//! - Randomness comes in through `RandomSource` only
//! - No rendering, audio, storage or platform dependencies

pub mod layout;
pub mod placement;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod state;
pub mod tick;

pub use layout::FieldLayout;
pub use placement::{min_separation, sample_position};
pub use rng::{RandomSource, SeededRng};
pub use scheduler::{is_final_target, schedule_next_delay};
pub use scoring::{accuracy, average_reaction_time, compute_score};
pub use state::{GamePhase, GameResult, Session, SessionEvent, SessionSettings, Target};
pub use tick::{TickInput, tick};
