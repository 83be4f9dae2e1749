//! Mock IP block executable for integration testing
//!
//! Implements the instance command-line protocol on top of the in-memory
//! model. Each invocation is a separate process, so the model state is kept
//! in `<argv0>.state.json`; symlinking this binary under several names gives
//! several independent instances. Faults can be injected by pre-seeding the
//! state file, e.g. `{"faults": {"ignore_enable": true}}`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use uad::common::parse_literal_arg;
use uad::sim::IpBlock;
use uad::transport::{ChannelCommand, ControlAction};

#[derive(Parser)]
#[command(name = "mock_ip", about = "Simulated IP block instance")]
struct Args {
    #[command(subcommand)]
    channel: Channel,
}

#[derive(Subcommand)]
enum Channel {
    /// Control channel
    Com {
        #[arg(long)]
        action: ControlAction,
    },
    /// Register read (no --data) or write
    Cfg {
        #[arg(long, value_parser = literal)]
        address: u32,
        #[arg(long, value_parser = literal)]
        data: Option<u32>,
    },
    /// Signal channel
    Sig {
        #[arg(long, value_parser = literal)]
        data: u32,
    },
}

fn literal(s: &str) -> Result<u32, String> {
    parse_literal_arg(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let command = match args.channel {
        Channel::Com { action } => ChannelCommand::Control(action),
        Channel::Cfg {
            address,
            data: None,
        } => ChannelCommand::ReadConfig { address },
        Channel::Cfg {
            address,
            data: Some(data),
        } => ChannelCommand::WriteConfig { address, data },
        Channel::Sig { data } => ChannelCommand::Signal { data },
    };

    let state_path = state_path();
    let mut block = load_state(&state_path);

    let result = block.handle(&command);

    if let Err(e) = save_state(&state_path, &block) {
        eprintln!("mock_ip: failed to save state: {}", e);
        return ExitCode::FAILURE;
    }

    match result {
        Ok(Some(value)) => {
            println!("{:#x}", value);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mock_ip: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// State file next to the path this process was invoked as
fn state_path() -> PathBuf {
    let invoked = std::env::args_os()
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("mock_ip"));
    let mut name = invoked.into_os_string();
    name.push(".state.json");
    PathBuf::from(name)
}

fn load_state(path: &Path) -> IpBlock {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

fn save_state(path: &Path, block: &IpBlock) -> std::io::Result<()> {
    let content = serde_json::to_string(block)?;
    std::fs::write(path, content)
}
