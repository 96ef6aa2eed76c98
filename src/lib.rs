#![doc = include_str!("../README.md")]
pub mod abtree;
pub mod assoc;
pub(crate) mod cli;
pub mod clustering;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hitlist;
pub mod ids;
pub mod lexicon;
pub mod linkgraph;
pub mod mapreduce;
pub mod pipeline;
pub mod pulserank;
pub mod segio;
pub mod sortedhits;
