//! # Event subscribers for the runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Reaper/Supervisor/Coordinator ── publish(Event) ──► Bus ──► event listener
//!                                                                   │
//!                                                          SubscriberSet::emit(&Event)
//!                                                                   │
//!                                                        ┌──────────┴──────────┐
//!                                                        ▼                     ▼
//!                                                    LogWriter              Custom
//!                                                  (Journal file)
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
