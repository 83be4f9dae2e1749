//! UAD harness - register protocol client and test orchestrator
//!
//! Drives simulated IP block instances through a process-per-call command
//! protocol, decodes their control/status register, and runs a fixed battery
//! of functional scenarios against each instance.

pub mod cli;
pub mod commands;
pub mod common;
pub mod instance;
pub mod register;
pub mod sim;
pub mod testing;
pub mod transport;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use instance::Instance;
pub use register::{RegisterClient, RetryPolicy};
