//! Scenario and property test suite for divpool.
//!
//! Integration tests drive a deployed pool and locker over an in-memory
//! ledger, checking exact payouts, time-lock behaviour and conservation of
//! funds across arbitrary operation sequences.

pub mod helpers;
