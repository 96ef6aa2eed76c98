/*! The dispatch coordinator (spec.md §5, §6): plans block→worker
assignments from a segment's `.comp_size` index, bounds concurrent
workers at `max_process_num`, and restarts a worker that misses its
heartbeat deadline. Re-spawn is safe because a worker's output path is
deterministic and is only renamed into place on success
([`crate::segio::SegmentWriter`]).
!*/
use crate::config::PipelineConfig;
use crate::dispatch::heartbeat::HeartbeatMsg;
use crate::dispatch::worker_cmd::WorkerCommand;
use crate::error::Error;
use log::warn;
use std::net::UdpSocket;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

/// One unit of dispatchable work: a worker command plus bookkeeping the
/// coordinator needs to track its lifecycle.
struct Assignment {
    cmd: WorkerCommand,
    attempts: u32,
}

enum Slot {
    Empty,
    Running { assignment_idx: usize, child: Child, started_at: Instant },
}

pub struct Coordinator {
    max_process_num: usize,
    timeout: Duration,
    stage_binary: PathBuf,
    socket: UdpSocket,
}

impl Coordinator {
    pub fn new(config: &PipelineConfig, stage_binary: PathBuf, listen_port: u16) -> Result<Self, Error> {
        let socket = UdpSocket::bind(("0.0.0.0", listen_port))?;
        socket.set_read_timeout(Some(Duration::from_millis(config.heartbeat_tick_ms)))?;
        Ok(Coordinator {
            max_process_num: config.max_process_num as usize,
            timeout: Duration::from_millis(config.heartbeat_tick_ms * config.worker_timeout_ticks as u64),
            stage_binary,
            socket,
        })
    }

    /// Runs `assignments` to completion, respawning any worker that times
    /// out, and returns an error if any worker exits non-zero more than
    /// once (spec.md §6 "Exit codes": a coordinator that observes any
    /// non-zero child exit halts the pipeline).
    pub fn run(&self, commands: Vec<WorkerCommand>) -> Result<(), Error> {
        let mut assignments: Vec<Assignment> = commands
            .into_iter()
            .map(|cmd| Assignment { cmd, attempts: 0 })
            .collect();
        let mut pending: Vec<usize> = (0..assignments.len()).rev().collect();
        let mut slots: Vec<Slot> = (0..self.max_process_num).map(|_| Slot::Empty).collect();
        let mut done = vec![false; assignments.len()];

        while !pending.is_empty() || slots.iter().any(|s| matches!(s, Slot::Running { .. })) {
            // Fill empty slots from the pending queue.
            for slot in slots.iter_mut() {
                if matches!(slot, Slot::Empty) {
                    if let Some(idx) = pending.pop() {
                        *slot = self.spawn(idx, &mut assignments)?;
                    }
                }
            }

            // Drain any heartbeat/finish datagrams that arrived.
            let mut buf = [0u8; 256];
            if let Ok((n, _)) = self.socket.recv_from(&mut buf) {
                if let Some(msg) = HeartbeatMsg::parse(&String::from_utf8_lossy(&buf[..n])) {
                    if let HeartbeatMsg::Finished { worker_id } = msg {
                        for slot in slots.iter_mut() {
                            if let Slot::Running { assignment_idx, .. } = slot {
                                if assignments[*assignment_idx].cmd.shard_id == worker_id {
                                    done[*assignment_idx] = true;
                                    *slot = Slot::Empty;
                                }
                            }
                        }
                    }
                }
            }

            // Reap children and detect timeouts.
            for slot in slots.iter_mut() {
                let should_clear = match slot {
                    Slot::Running { assignment_idx, child, started_at } => {
                        if let Ok(Some(status)) = child.try_wait() {
                            if !status.success() {
                                return Err(Error::Custom(format!(
                                    "worker {} exited with status {:?}",
                                    assignments[*assignment_idx].cmd.shard_id, status
                                )));
                            }
                            done[*assignment_idx] = true;
                            true
                        } else if started_at.elapsed() > self.timeout {
                            let _ = child.kill();
                            warn!(
                                "worker {} missed its heartbeat deadline, respawning (attempt {})",
                                assignments[*assignment_idx].cmd.shard_id,
                                assignments[*assignment_idx].attempts + 1
                            );
                            pending.push(*assignment_idx);
                            true
                        } else {
                            false
                        }
                    }
                    Slot::Empty => false,
                };
                if should_clear {
                    *slot = Slot::Empty;
                }
            }

            if done.iter().all(|d| *d) {
                break;
            }
        }
        Ok(())
    }

    fn spawn(&self, idx: usize, assignments: &mut [Assignment]) -> Result<Slot, Error> {
        assignments[idx].attempts += 1;
        let child = Command::new(&self.stage_binary)
            .args(assignments[idx].cmd.to_args())
            .spawn()
            .map_err(|e| Error::Transient(format!("spawn failed: {e}")))?;
        Ok(Slot::Running {
            assignment_idx: idx,
            child,
            started_at: Instant::now(),
        })
    }
}
