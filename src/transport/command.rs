//! Command-line protocol spoken by an instance executable
//!
//! Three channels, one process invocation per command:
//!
//! ```text
//! <exe> com --action reset|enable|disable
//! <exe> cfg --address 0x0                  -> prints a numeric literal
//! <exe> cfg --address 0x4 --data 0x12345678
//! <exe> sig --data 0x1234                  -> prints a numeric literal
//! ```

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Action carried on the control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Reset,
    Enable,
    Disable,
}

impl ControlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Reset => "reset",
            ControlAction::Enable => "enable",
            ControlAction::Disable => "disable",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(ControlAction::Reset),
            "enable" => Ok(ControlAction::Enable),
            "disable" => Ok(ControlAction::Disable),
            other => Err(format!(
                "unknown action '{}'. Supported actions: reset, enable, disable",
                other
            )),
        }
    }
}

/// A single command addressed to one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCommand {
    /// `com --action <action>`
    Control(ControlAction),
    /// `cfg --address <hex>`
    ReadConfig { address: u32 },
    /// `cfg --address <hex> --data <hex>`
    WriteConfig { address: u32, data: u32 },
    /// `sig --data <hex>`
    Signal { data: u32 },
}

impl ChannelCommand {
    /// Argument vector passed to the instance executable
    pub fn to_args(&self) -> Vec<String> {
        match self {
            ChannelCommand::Control(action) => {
                vec!["com".into(), "--action".into(), action.as_str().into()]
            }
            ChannelCommand::ReadConfig { address } => {
                vec!["cfg".into(), "--address".into(), hex(*address)]
            }
            ChannelCommand::WriteConfig { address, data } => vec![
                "cfg".into(),
                "--address".into(),
                hex(*address),
                "--data".into(),
                hex(*data),
            ],
            ChannelCommand::Signal { data } => vec!["sig".into(), "--data".into(), hex(*data)],
        }
    }
}

impl fmt::Display for ChannelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}

fn hex(value: u32) -> String {
    format!("{:#x}", value)
}
