/*! Pipeline configuration.

Every tunable named across §4–§6 of the specification lives here rather
than as a scattered constant, and the stage DAG itself (spec.md §9 Open
Question 1) is data: `PipelineConfig::stages` declares each stage's
input/output file-sets and `Pipeline::topo_order` (see [`crate::pipeline`])
derives execution order from them instead of a hard-coded call sequence.
!*/
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One node of the declared stage DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    /// Named file-sets this stage requires to already exist.
    pub inputs: Vec<String>,
    /// Named file-sets this stage produces.
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory holding `GlobalData/` and `LocalData/`.
    pub pipeline_root: std::path::PathBuf,

    /// Number of hash-partition shards used by the shuffle/merge substrate.
    pub hash_div_num: u32,
    /// Upper bound on concurrently live dispatch-coordinator workers.
    pub max_process_num: u32,
    /// Number of log divisions tokenizer output is sharded into.
    pub log_div_count: u32,
    /// Number of shards the hit-list assembly stage writes to.
    pub hit_list_breadth: u32,
    /// Number of tokenizer clients (parallel producers of per-doc logs).
    pub client_count: u32,

    /// Fixed pulse-rank iteration count (no per-iteration delta test).
    pub pulse_rank_cycles: u32,
    /// Total base (spidered) document count, seeding every node's initial
    /// pulse-rank score at `1 / base_node_count`.
    pub base_node_count: u64,

    /// Label-propagation outer cycle count.
    pub wave_pass_cycles: u32,
    /// Label-propagation inner instance count per cycle.
    pub wave_pass_inst: u32,
    /// Hard cap on base nodes per cluster during label propagation / orphan grouping.
    pub max_clus_node_num: u32,
    /// Max children an orphan-node synthetic group may hold.
    pub max_child_count: u32,

    /// Max surviving association pairs after the k-th-order-statistic cutoff.
    pub max_assoc_num: u32,
    /// Grouped-term expansion cycle count.
    pub group_cycle_count: u32,
    /// Sliding window size used when re-scoring candidate term pairs.
    pub scan_window_size: u32,
    /// Keywords retained per excerpt after keyword-set reduction.
    pub final_keyword_count: u32,
    /// Minimum number of new keywords a grouped-term cycle must add to continue.
    pub group_cycle_min_new: u32,

    /// Spatial byte boundary between successive lookup-index records.
    pub max_spat_num: u32,

    /// Number of 13-byte... er, runs merged per external-sort merge pass.
    pub merge_pass_window: u32,

    /// Percentile used by the k-th-order-statistic pass that culls
    /// excerpt-term candidates by occurrence count.
    pub excerpt_occurrence_percentile: f32,

    /// Worker heartbeat timeout, in heartbeat ticks of `heartbeat_tick_ms`.
    pub worker_timeout_ticks: u32,
    pub heartbeat_tick_ms: u64,

    /// RNG seed for the WavePass back-buffer Gaussian re-initialization
    /// (spec.md §9 Open Question 2). Required: there is no wall-clock
    /// fallback, so output stays deterministic across runs.
    pub rng_seed: u64,

    /// Declared stage DAG; execution order is a topological sort over
    /// `inputs`/`outputs`, never a hard-coded sequence.
    pub stages: Vec<StageSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            pipeline_root: std::path::PathBuf::from("."),
            hash_div_num: 16,
            max_process_num: 8,
            log_div_count: 16,
            hit_list_breadth: 16,
            client_count: 16,
            pulse_rank_cycles: 20,
            base_node_count: 0,
            wave_pass_cycles: 6,
            wave_pass_inst: 1,
            max_clus_node_num: 64,
            max_child_count: 16,
            max_assoc_num: 1_000_000,
            group_cycle_count: 4,
            scan_window_size: 5,
            final_keyword_count: 17,
            group_cycle_min_new: 100,
            max_spat_num: 255,
            merge_pass_window: 64,
            excerpt_occurrence_percentile: 0.95,
            worker_timeout_ticks: 20,
            heartbeat_tick_ms: 100,
            rng_seed: 0x5EED_D1CE,
            stages: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Custom(format!("invalid config: {e}")))
    }

    /// Path beneath `pipeline_root` for a named segmented-file family
    /// (e.g. `GlobalData/HitList`).
    pub fn data_dir(&self, sub: &str) -> std::path::PathBuf {
        self.pipeline_root.join(sub)
    }
}
