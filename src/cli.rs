use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::events::Kind;

#[derive(Parser, Debug)]
#[command(name = "faaah", version, about = "Audible punishment for editor errors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, value_name = "PATH", help = "Read config from this file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Listen(ListenArgs),
    TestSound(TestSoundArgs),
    Status,
    Toggle,
    Pack(PackArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[arg(long, help = "Host reports terminal command exit codes")]
    pub shell_integration: bool,

    #[arg(long, help = "Print play requests instead of playing them")]
    pub dry_run: bool,

    #[arg(long, default_value_t = 60, help = "Seconds between status refreshes")]
    pub status_interval: u64,
}

#[derive(Args, Debug)]
pub struct TestSoundArgs {
    #[arg(long, value_enum, default_value = "error", help = "Which cue to play")]
    pub kind: Kind,

    #[arg(long, help = "Tier for error (1-3) or warning (1-2) cues")]
    pub tier: Option<u8>,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    #[arg(value_name = "NAME", help = "Sound pack to activate")]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, help = "Show current config as JSON")]
    pub show: bool,

    #[arg(long, help = "Create default config file")]
    pub init: bool,

    #[arg(long, help = "Validate configuration")]
    pub validate: bool,
}
