//! CLI command handling
//!
//! Dispatches CLI commands against instance executables and formats output.

mod render;

use crate::commands::Commands;
use crate::common::config::{Config, Timing};
use crate::common::{Error, Result};
use crate::instance::Instance;
use crate::register::{decode_active_flags, RegisterClient, CSR_ADDRESS};
use crate::sim::ModelTransport;
use crate::testing::{is_alive, InstanceReport, Runner, Verdict};
use crate::transport::{ProcessTransport, Transport};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Run {
            instances,
            json,
            strict,
            simulate,
        } => {
            let names = if instances.is_empty() {
                config.instances.clone()
            } else {
                instances
            };
            if names.is_empty() {
                return Err(Error::Config("No instances to test".to_string()));
            }

            let instances: Vec<Instance> = names
                .iter()
                .map(|name| Instance::resolve(name, &config))
                .collect();

            let reports = if simulate {
                let transport = ModelTransport::new();
                for instance in &instances {
                    transport.add(instance.target());
                }
                Runner::new(&transport, &config)
                    .with_timing(Timing::immediate())
                    .run(&instances)
                    .await
            } else {
                let transport = ProcessTransport::new();
                Runner::new(&transport, &config).run(&instances).await
            };

            if json {
                render::print_json(&reports)?;
            } else {
                render::print_summary(&reports);
            }

            let failing = count_failing(&reports);
            if strict && failing > 0 {
                return Err(Error::RunFailed(failing));
            }
            Ok(())
        }

        Commands::Probe { instance } => {
            let instance = Instance::resolve(&instance, &config);
            let transport = ProcessTransport::new();
            let client = client(&transport, &instance, &config);

            if !is_alive(&client).await {
                return Err(Error::unreachable(instance.name(), instance.target()));
            }
            println!("{} is alive", instance.name());
            Ok(())
        }

        Commands::Read { instance, address } => {
            let instance = Instance::resolve(&instance, &config);
            let transport = ProcessTransport::new();
            let client = client(&transport, &instance, &config);

            if address == CSR_ADDRESS {
                let value = client.read_csr(config.retry_policy()).await;
                let value = value.ok_or_else(|| Error::operation_failed("CSR read", instance.name()))?;
                println!("{:#x}", value);
                println!("Decoded: {}", decode_active_flags(Some(value)));
            } else {
                let value = client
                    .read_register(address)
                    .await
                    .ok_or_else(|| Error::operation_failed("Register read", instance.name()))?;
                println!("{:#x}", value);
            }
            Ok(())
        }

        Commands::Write {
            instance,
            address,
            value,
        } => {
            let instance = Instance::resolve(&instance, &config);
            let transport = ProcessTransport::new();
            let client = client(&transport, &instance, &config);

            if !client.write_register(address, value).await {
                return Err(Error::operation_failed("Register write", instance.name()));
            }
            println!("Wrote {:#x} to {:#x}", value, address);
            Ok(())
        }

        Commands::Control { instance, action } => {
            let instance = Instance::resolve(&instance, &config);
            let transport = ProcessTransport::new();
            let client = client(&transport, &instance, &config);

            if !client.control(action).await {
                return Err(Error::operation_failed(action.as_str(), instance.name()));
            }
            println!("{}: {}", instance.name(), action);
            Ok(())
        }

        Commands::Decode { value } => {
            render::print_csr(value);
            Ok(())
        }
    }
}

fn client<'a>(
    transport: &'a dyn Transport,
    instance: &'a Instance,
    config: &Config,
) -> RegisterClient<'a> {
    RegisterClient::new(transport, instance).with_settle(config.timing.settle())
}

/// Instances that were unreachable or had a failing scenario
fn count_failing(reports: &[InstanceReport]) -> usize {
    reports
        .iter()
        .filter(|r| matches!(r.verdict(), Verdict::Fail | Verdict::Skipped))
        .count()
}
