/*! Work dispatch: the coordinator/worker contract (spec.md §5, §6) plus
the in-process `rayon` execution mode used for tests and small corpora
(§4.1.e).
!*/
pub mod coordinator;
pub mod heartbeat;
pub mod local;
pub mod worker_cmd;

pub use coordinator::Coordinator;
pub use heartbeat::{HeartbeatMsg, HeartbeatSender};
pub use local::run_stage_local;
pub use worker_cmd::WorkerCommand;
