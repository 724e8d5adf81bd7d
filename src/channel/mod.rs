//! Channels: named FIFOs carrying fixed-size integer records.
//!
//! A [`Channel`] is a filesystem-visible, unidirectional byte conduit. Opening
//! either end blocks until the other end is opened too (rendezvous-on-open),
//! which is the only synchronization the workers rely on before exchanging
//! data.
//!
//! ## Contents
//! - [`Channel`] create / open / remove by path
//! - [`ChannelWriter`], [`ChannelReader`] one end each, moving [`RECORD_SIZE`]-byte records
//!
//! ## Lifecycle
//! ```text
//! Coordinator: recreate(a), recreate(b)
//!     ├─► Producer: open_read(a) ── read, read ── open_write(b) ── write
//!     ├─► Consumer: open_read(b) ── read
//!     └─► Coordinator: open_write(a) ── write, write
//! Coordinator: remove(a), remove(b)
//! ```

mod fifo;

pub use fifo::{Channel, ChannelReader, ChannelWriter, RECORD_SIZE};
