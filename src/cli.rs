use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bundlemap")]
#[command(about = "Render hierarchical edge-bundling charts from flat tabular data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the interactive chart over HTTP
    Serve(ServeArgs),

    /// Export the chart as a self-contained HTML file
    Render(RenderArgs),

    /// Dump the chart payload as JSON
    Data(DataArgs),

    /// Print a summary of groups, leaves and links
    Summary(SummaryArgs),

    /// Generate a starter .bundlemap.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// JSON file containing an array of flat objects
    pub input: PathBuf,

    /// Port for the HTTP server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Re-read the input file on change and push updates to the page
    #[arg(short, long)]
    pub watch: bool,

    /// Config file (defaults to .bundlemap.toml next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// JSON file containing an array of flat objects
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "chart.html")]
    pub output: PathBuf,

    /// Config file (defaults to .bundlemap.toml next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct DataArgs {
    /// JSON file containing an array of flat objects
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to .bundlemap.toml next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {
    /// JSON file containing an array of flat objects
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to .bundlemap.toml next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Leaves shown per group before folding into a remainder row
    #[arg(long, default_value = "10")]
    pub rows: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .bundlemap.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
