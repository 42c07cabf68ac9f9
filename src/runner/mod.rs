//! Bounded-concurrency request batches with per-request latency capture.
mod batch;
mod transport;
mod types;


pub use batch::BatchRequestRunner;
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use types::{Action, BatchResult, Request, RequestOutcome};
