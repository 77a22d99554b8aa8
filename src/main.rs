use anyhow::Context;
use axtl_rs::{init_logger, list_ports};
use clap::Parser;

#[derive(Parser)]
#[command(name = "axtl-ports")]
#[command(about = "List serial ports addressable by the Ataraxis transport layer")]
struct Cli {}

fn main() -> anyhow::Result<()> {
    init_logger();
    Cli::parse();

    let ports = list_ports().context("failed to enumerate serial ports")?;

    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    for port in ports {
        println!("{}\t{}", port.name, port.description);
    }

    Ok(())
}
