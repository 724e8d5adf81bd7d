//! # Run event handlers.
//!
//! The coordinator's listener hands every run event to a [`SubscriberSet`],
//! which feeds each [`Subscribe`] implementation from its own queue. The
//! journal writer ([`LogWriter`]) is always installed; further handlers come
//! in through [`Coordinator::with_subscriber`].
//!
//! A handler may block on file I/O. It only delays its own queue, and once
//! that queue is full its events are dropped and reported.
//!
//! [`SubscriberSet`]: crate::subscribers::SubscriberSet
//! [`LogWriter`]: crate::subscribers::LogWriter
//! [`Coordinator::with_subscriber`]: crate::core::Coordinator::with_subscriber

use async_trait::async_trait;

use crate::events::Event;

/// Handler for run events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Events queued for this handler before new ones are dropped.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
