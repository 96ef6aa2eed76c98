#![doc = include_str!("../README.md")]
use log::LevelFilter;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod abtree;
mod assoc;
mod cli;
mod clustering;
mod config;
mod dispatch;
mod error;
mod hitlist;
mod ids;
mod lexicon;
mod linkgraph;
mod mapreduce;
mod pipeline;
mod pulserank;
mod segio;
mod sortedhits;

use crate::config::{PipelineConfig, StageSpec};

#[cfg(not(tarpaulin_include))]
fn main() {
    // set default log level to info
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_env("RUST_LOG");
    builder.init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), error::Error> {
    let opt = cli::Dyabledex::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Dyabledex::Pipeline(p) => {
            let config = PipelineConfig::load(&p.config)?;
            info!("running {} declared stage(s)", config.stages.len());
            pipeline::run_pipeline(&config)?;
        }
        cli::Dyabledex::Stage(s) => {
            let mut config = PipelineConfig::load(&s.config)?;
            info!("running stage {:?}", s.name);
            config.stages = vec![StageSpec {
                name: s.name,
                inputs: Vec::new(),
                outputs: Vec::new(),
            }];
            pipeline::run_pipeline(&config)?;
        }
    };
    Ok(())
}
