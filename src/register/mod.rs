//! Register access: CSR bitfields, retry policy and the per-instance client

mod client;
pub mod csr;
mod retry;

pub use client::{RegisterClient, DEFAULT_SETTLE};
pub use csr::{decode_active_flags, get_field, set_field, ActiveFlags, CsrField, CSR_ADDRESS};
pub use retry::RetryPolicy;
