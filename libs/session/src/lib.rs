//! # Viewing Key Session
//!
//! Process-local viewing keys for confidential token balances. A session is
//! created when a wallet connects and is passed explicitly to whoever needs
//! keys; nothing here is global.
//!
//! ## Guarantees
//!
//! - `get` never submits a transaction; only `request` does
//! - At most one `set_viewing_key` is in flight per `(token, account)`
//! - Cancelling a request returns its slot to `Unissued`
//! - Keys are never logged and never written to disk

pub mod session;

pub use session::{KeyState, SessionOptions, ViewingKeySession};
