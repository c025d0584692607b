//! Participant identity for Corridor.
//!
//! This crate answers two questions for the rest of the server:
//!
//! 1. **Who is connected?** ([`IdentityRegistry`]): every live connection,
//!    its display nickname, and when it connected.
//! 2. **How do I reach them?** ([`PlayerSender`]): each connection's
//!    outbound queue, drained by that connection's writer task.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← looks up nicknames and senders when a player joins
//!     ↕
//! Session Layer (this crate)  ← connection id → nickname + outbound queue
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId, ServerMessage
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::IdentityRegistry;
pub use session::{PlayerSender, Session, DEFAULT_NICKNAME};
