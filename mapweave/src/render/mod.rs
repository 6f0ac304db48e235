//! Batched incremental attach.
//!
//! Attaching hundreds of overlays in one go stalls the UI thread. The
//! scheduler attaches a layer in chunks and yields between them:
//!
//! ```text
//! ids: [0 .. 236]            chunk_size = 50, yield = 10ms
//!
//!   attach 0..49  ─ yield ─ attach 50..99 ─ yield ─ ... ─ attach 200..236
//!   progress:  50              100                          237 (done)
//! ```
//!
//! Scheduling a layer again, hiding it, or replacing its data cancels the
//! running batch. Cancelled batches never touch progress again.

mod profile;
mod scheduler;

pub use profile::{BatchProfile, RenderConfig, DEFAULT_SYNC_ATTACH_LIMIT};
pub use scheduler::{BatchOutcome, BatchScheduler, BatchSink, BatchTicket, RenderProgress};
