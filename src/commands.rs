//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::Subcommand;

use crate::common::parse_literal_arg;
use crate::transport::ControlAction;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full scenario battery against each instance
    Run {
        /// Instances to test, in order (default: the configured list)
        instances: Vec<String>,

        /// Print reports as JSON instead of a summary table
        #[arg(long)]
        json: bool,

        /// Exit non-zero if any scenario fails or any instance is unreachable
        #[arg(long)]
        strict: bool,

        /// Test in-memory simulated instances instead of executables
        #[arg(long)]
        simulate: bool,
    },

    /// Check whether an instance answers a single CSR read
    Probe {
        /// Instance name
        instance: String,
    },

    /// Read one register (CSR reads are retried and decoded)
    Read {
        /// Instance name
        instance: String,

        /// Register address, decimal or 0x-hex
        #[arg(value_parser = literal)]
        address: u32,
    },

    /// Write one register
    Write {
        /// Instance name
        instance: String,

        /// Register address, decimal or 0x-hex
        #[arg(value_parser = literal)]
        address: u32,

        /// Value to write, decimal or 0x-hex
        #[arg(value_parser = literal)]
        value: u32,
    },

    /// Send a control action (reset, enable, disable)
    Control {
        /// Instance name
        instance: String,

        /// Action to send
        action: ControlAction,
    },

    /// Decode a CSR value without touching any instance
    Decode {
        /// CSR value, decimal or 0x-hex
        #[arg(value_parser = literal)]
        value: u32,
    },
}

fn literal(s: &str) -> Result<u32, String> {
    parse_literal_arg(s).map_err(|e| e.to_string())
}
