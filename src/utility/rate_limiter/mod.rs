//! Rate Gate Module
//!
//! Spaces request admissions evenly: a gate configured for `n` requests per
//! second emits one admission tick every `1s / n`, and every admitted caller
//! consumes exactly one tick. A rate of zero or less disables the gate.
//!
//! Ticks are produced by a background task started with the gate. At most one
//! unclaimed tick is kept; ticks that find the buffer full are dropped, so an
//! idle gate admits one caller immediately and then returns to the regular
//! spacing instead of releasing a burst.
//!
//! The ticker holds a timer until [`RateGate::shutdown`] is called or the gate
//! is dropped.

pub mod constants;
pub mod errors;
pub mod impls;
pub mod types;

pub use errors::RateGateClosed;
pub use types::RateGate;
