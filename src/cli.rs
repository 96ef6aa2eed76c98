//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "dyabledex", about = "Offline inverted-index pipeline")]
/// Holds every command that is callable by the `dyabledex` command.
pub enum Dyabledex {
    #[structopt(about = "Run every declared stage of the pipeline in topological order")]
    Pipeline(Pipeline),
    #[structopt(about = "Run a single named stage")]
    Stage(Stage),
}

#[derive(Debug, StructOpt)]
/// Pipeline command and parameters.
///
/// ```sh
/// dyabledex-pipeline 1.0.0
/// Run every declared stage of the pipeline in topological order
///
/// USAGE:
///     dyabledex pipeline <config>
///
/// ARGS:
///     <config>    pipeline configuration (TOML)
/// ```
pub struct Pipeline {
    #[structopt(parse(from_os_str), help = "pipeline configuration (TOML)")]
    pub config: PathBuf,
}

#[derive(Debug, StructOpt)]
/// Stage command and parameters. Runs one named stage
/// (`lexicon`, `hitlist`, `linkgraph`, `pulserank`, `clustering`,
/// `abtree`, `sortedhits`, `assoc`) using the in-process rayon
/// execution mode, sharded per [`crate::pipeline::StageName::shard_count`].
pub struct Stage {
    #[structopt(parse(from_os_str), help = "pipeline configuration (TOML)")]
    pub config: PathBuf,
    #[structopt(help = "stage name")]
    pub name: String,
}
