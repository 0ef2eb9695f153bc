//! Reactive local mirror of the hub's state.
//!
//! Every slice is remote-owned: the mirror is a cache plus optimistic
//! overlay, never an authority. Reads are synchronous snapshots; change
//! notification is push-based via `watch` channels.

mod mirror;
mod pending;

pub use mirror::Mirror;
pub(crate) use mirror::WriteTicket;
