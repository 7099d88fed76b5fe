use clap::{Args, Parser, Subcommand, ValueEnum};
use psynth_common::SynthesisMode;
use std::path::PathBuf;

/// CLI arguments for the psynth binary.
#[derive(Parser, Debug)]
#[command(
    name = "psynth",
    version,
    about = "Synthesize Polly resilience decorators for C# interfaces"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the members a class needs to decorate its interfaces.
    Synthesize(SynthesizeArgs),
    /// Report interface members a class does not implement.
    Check(ClassArgs),
    /// List the editor code actions offered for a class.
    Actions(ClassArgs),
}

/// Where declarations and options come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Declaration workspace file (JSON).
    #[arg(short = 'm', long = "model", value_name = "PATH")]
    pub model: PathBuf,

    /// Options file. Defaults to `psynth.json` next to the model, if present.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csharp)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ClassArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Target class, qualified (`Acme.FooDecorator`) or simple.
    #[arg(long = "class", value_name = "NAME")]
    pub class: String,
}

#[derive(Args, Debug, Clone)]
pub struct SynthesizeArgs {
    #[command(flatten)]
    pub target: ClassArgs,

    /// Only this interface from the class's base list.
    #[arg(short = 'i', long = "interface", value_name = "TYPE")]
    pub interface: Option<String>,

    /// Synthesis mode; overrides the configured default.
    #[arg(long, value_enum, ignore_case = true)]
    pub mode: Option<Mode>,

    /// Policy-holder type, e.g. `Polly.IAsyncPolicy`; overrides the config.
    #[arg(long = "policy-type", value_name = "TYPE")]
    pub policy_type: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Return helper tasks directly.
    Elided,
    /// Mark async members `async` and await the helper.
    Explicit,
}

impl From<Mode> for SynthesisMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Elided => Self::Elided,
            Mode::Explicit => Self::Explicit,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// C# source text (or plain diagnostics for `check`).
    Csharp,
    /// JSON documents.
    Json,
}
