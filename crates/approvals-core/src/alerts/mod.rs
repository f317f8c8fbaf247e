//! Alert bookkeeping.
//!
//! `state` holds the per-request alert maps owned by the confirmation
//! machine; `lifecycle` is the deck that sequences a dismissed callout
//! through its removal delay before the entry is purged.

pub mod lifecycle;
pub mod state;

pub use lifecycle::{AlertDeck, Callout, CalloutPhase, DeckIntent};
pub use state::AlertState;
