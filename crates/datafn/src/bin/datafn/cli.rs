//! datafn cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; datafn ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a collection function
    ///
    /// The subject is read as YAML (or JSON) from stdin unless --input is given.
    /// Parameters are parsed as JSON, anything that is not valid JSON is taken as a string.
    Apply(ApplyCommand),

    /// Resolve a datasource url
    Resolve(ResolveCommand),

    /// List available functions
    Functions,
}

#[derive(Parser, Debug)]
pub struct ApplyCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Read the subject from a file
    #[clap(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Function name, the `coll.` prefix may be left out
    pub function: String,

    /// Function parameters (the subject is added where the function expects it)
    #[clap(allow_hyphen_values(true))]
    pub params: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ResolveCommand {
    #[clap(flatten)]
    pub backend: BackendArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Datasource url, e.g. gcp+sm:///projects/123
    pub url: Url,

    /// Path appended to the url
    pub path: Option<String>,
}

#[derive(Parser, Debug)]
pub struct BackendArgs {
    /// Secret store api endpoint
    #[arg(
        long = "endpoint",
        env = "DATAFN_SECRET_MANAGER_ENDPOINT",
        default_value = datafn::datasource::http::DEFAULT_ENDPOINT
    )]
    pub endpoint: String,

    /// Bearer token sent with every request
    #[arg(long = "access-token", env = "DATAFN_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    pub timeout: u64,
}

impl BackendArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
