/*! In-process execution mode (spec.md §4.1.e): runs a stage's per-shard
work on a `rayon` thread pool instead of spawning one OS process per
worker. Grounded directly in the teacher pipeline's own shard loop
(`results.enumerate().par_bridge()` in `Pipeline::run`): each hash
division becomes a unit of work handed to `rayon::prelude::*` rather than
a CLI-invoked child process. This is the execution mode the `dyabledex`
binary drives every stage through; the process-spawning
[`super::coordinator::Coordinator`] is the distributed-deployment path,
built but not wired into the CLI.
!*/
use crate::error::Error;
use rayon::prelude::*;

/// Runs `work` once per shard in `0..hash_div_num`, in parallel, and
/// collects the first error if any shard fails — matching the
/// coordinator's "any non-zero child exit halts the pipeline" semantics
/// (spec.md §6) without actually spawning processes.
pub fn run_stage_local<F>(hash_div_num: u32, work: F) -> Result<(), Error>
where
    F: Fn(u32) -> Result<(), Error> + Sync,
{
    (0..hash_div_num)
        .into_par_iter()
        .map(|shard| work(shard))
        .find_first(|r| r.is_err())
        .unwrap_or(Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn runs_every_shard_exactly_once() {
        let counter = AtomicU32::new(0);
        run_stage_local(8, |_shard| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn propagates_first_error() {
        let result = run_stage_local(4, |shard| {
            if shard == 2 {
                Err(Error::Custom("boom".into()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
    }
}
