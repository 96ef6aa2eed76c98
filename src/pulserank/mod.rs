/*! Pulse-rank (spec.md §4.4): a fixed-point iteration over the integrated
link graph producing a per-node stationary-distribution score.
!*/
pub mod iterate;
pub mod record;
pub mod stage;

pub use iterate::{gaussian_reinit_back_buffer, pulse_rank};
pub use record::PulseMap;
pub use stage::run_stage;
