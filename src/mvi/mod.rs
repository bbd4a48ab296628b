//! Model-View-Intent primitives shared by the coordinators.
//!
//! State changes flow in one direction:
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ subscribers
//!    ↑                               │
//!    └───────── effects ─────────────┘
//! ```
//!
//! Reducers stay pure. Timers, catalog calls and storage writes live in the
//! coordinator that owns the state and feeds their outcomes back as intents.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
