//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "docpreview",
    version,
    about = "Headless documentation preview webview",
    long_about = "Runs the documentation preview state store as a headless webview.\n\n\
                  Host messages and driver commands are read as JSON lines from stdin;\n\
                  messages for the host are written as JSON lines to stdout."
)]
pub struct Cli {
    /// File the view state is persisted to between runs.
    #[arg(long = "state-file", value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `dp_core=debug` (overrides RUST_LOG).
    #[arg(long = "log-level", value_name = "FILTER")]
    pub log_level: Option<String>,
}
