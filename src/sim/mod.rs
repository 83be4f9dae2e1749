//! Simulated IP blocks
//!
//! Used by the `mock_ip` executable, by `uad run --simulate`, and by tests.

mod block;
mod transport;

pub use block::{Faults, IpBlock, SimError, BUFFER_DEPTH, COEFFICIENT_ADDRESS};
pub use transport::ModelTransport;
