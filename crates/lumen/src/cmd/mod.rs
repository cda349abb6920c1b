use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use lumen_wire::ProtocolVersion;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod compile;
pub mod frames;
pub mod tokens;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a script to an instruction-stream payload.
    Compile(CompileArgs),
    /// Dump the token stream for a script.
    Tokens(TokensArgs),
    /// Show the frame plan for a payload at a given MTU.
    Frames(FramesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Compile(args) => compile::run(args, format),
        Command::Tokens(args) => tokens::run(args, format),
        Command::Frames(args) => frames::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Opcode-table generation selector.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum TableVersion {
    V1,
    V2,
}

impl From<TableVersion> for ProtocolVersion {
    fn from(value: TableVersion) -> Self {
        match value {
            TableVersion::V1 => ProtocolVersion::V1,
            TableVersion::V2 => ProtocolVersion::V2,
        }
    }
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Script file to compile.
    pub file: PathBuf,
    /// Opcode-table generation to pin.
    #[arg(long, value_enum, default_value = "v2")]
    pub table: TableVersion,
    /// Write the payload bytes to this file.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Fail (exit 60) when any token was dropped.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Script file to tokenize.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Script file (or raw payload with --raw).
    pub file: PathBuf,
    /// Maximum transmission unit, frame header included.
    #[arg(long, default_value_t = lumen_wire::DEFAULT_MTU)]
    pub mtu: usize,
    /// Treat the file as an already-built payload instead of compiling it.
    #[arg(long)]
    pub raw: bool,
    /// Opcode-table generation used when compiling.
    #[arg(long, value_enum, default_value = "v2")]
    pub table: TableVersion,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
