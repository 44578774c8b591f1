//! mbrforge: raw block-level tools for preparing boot media.
//!
//! The binary dispatches here. Everything below [`run`] returns typed
//! errors so the operations stay testable without a terminal attached.

pub mod cli;
pub mod dump;
pub mod errors;
pub mod flash;
pub mod list;
pub mod logging;
pub mod merge;

use clap::Parser;
use mbrforge_hal::LinuxCatalog;
use std::io;

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init();

    match &cli.command {
        cli::Command::Dump { device } => {
            let stdout = io::stdout();
            dump::run(device, &mut stdout.lock())?;
        }
        cli::Command::List => {
            list::run(&LinuxCatalog::new())?;
        }
        cli::Command::Write { dry_run } => {
            flash::run_interactive(&LinuxCatalog::new(), *dry_run)?;
        }
        cli::Command::Merge {
            bootloader,
            disk_image,
            output,
        } => {
            merge::run(bootloader, disk_image, output)?;
        }
        cli::Command::DangerousWrite {
            binary,
            class_identifier,
            yes_i_know,
            dry_run,
        } => {
            flash::run_dangerous(
                &LinuxCatalog::new(),
                binary,
                class_identifier,
                *yes_i_know,
                *dry_run,
            )?;
        }
    }

    Ok(())
}
