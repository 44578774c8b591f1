use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Raw block-level tools for provisioning mbrforge boot media"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dump the first sector of a device to stdout
    Dump {
        /// Device node to read from
        #[arg(long, default_value = crate::dump::DEFAULT_DEVICE)]
        device: PathBuf,
    },
    /// List attached disks as `physical path <TAB> class identifier`
    List,
    /// Pick a disk interactively and flash an image onto it
    Write {
        #[arg(long)]
        dry_run: bool,
    },
    /// Splice a bootloader into a boot sector, keeping the partition table
    Merge {
        /// 512-byte bootloader image
        bootloader: PathBuf,
        /// 512-byte boot sector carrying the partition table to keep
        disk_image: PathBuf,
        /// Where to write the merged sector
        output: PathBuf,
    },
    /// Flash without prompts; requires --yes-i-know
    DangerousWrite {
        /// Image file to write
        binary: PathBuf,
        /// Class identifier of the target disk (see `list`)
        class_identifier: String,
        #[arg(long)]
        yes_i_know: bool,
        #[arg(long)]
        dry_run: bool,
    },
}
