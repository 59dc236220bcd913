//! Concurrency Gate Module
//!
//! Bounds how many requests may be in flight at the same time. A gate built
//! with a capacity of zero or less is disabled: acquiring never waits.
//!
//! Slots are handed out as [`ConcurrencySlot`] guards. Dropping the guard
//! returns the slot, so a slot cannot leak on an error path, on a panic, or
//! when the future holding it is dropped mid-flight.
//!
//! # Example
//!
//! ```rust
//! use pooled_http::utility::concurrency_gate::ConcurrencyGate;
//!
//! # async fn example() {
//! let gate = ConcurrencyGate::new(2);
//! let slot = gate.acquire().await;
//! assert_eq!(gate.in_flight(), 1);
//! slot.release();
//! assert_eq!(gate.in_flight(), 0);
//! # }
//! ```

pub mod impls;
pub mod types;

pub use types::{ConcurrencyGate, ConcurrencySlot};
