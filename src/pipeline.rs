/*! Stage DAG orchestration (spec.md §9 Open Question 1): the execution
order of the pipeline's stages is data — [`PipelineConfig::stages`] lists
each stage's declared input/output file-sets — rather than a hard-coded
call sequence, so a deployment can reorder or skip stages by editing
config alone. [`topo_order`] derives a valid execution order from those
declarations via Kahn's algorithm; [`run_pipeline`] then dispatches each
stage by name to its module's `run_stage` entry point, executed locally
through [`crate::dispatch::run_stage_local`].
!*/
use crate::config::{PipelineConfig, StageSpec};
use crate::error::Error;
use crate::{abtree, assoc, clustering, dispatch, hitlist, lexicon, linkgraph, pulserank, sortedhits};
use std::collections::{HashMap, HashSet, VecDeque};

/// Returns `stages` reordered so that every stage producing a file-set
/// another stage consumes runs first. Ties (stages with no dependency
/// relationship) keep their relative input order for determinism.
/// Errors if the declared dependencies contain a cycle.
pub fn topo_order(stages: &[StageSpec]) -> Result<Vec<usize>, Error> {
    let producer_of: HashMap<&str, usize> = stages
        .iter()
        .enumerate()
        .flat_map(|(i, s)| s.outputs.iter().map(move |o| (o.as_str(), i)))
        .collect();

    let mut deps: Vec<HashSet<usize>> = vec![HashSet::new(); stages.len()];
    for (i, stage) in stages.iter().enumerate() {
        for input in &stage.inputs {
            if let Some(&producer) = producer_of.get(input.as_str()) {
                if producer != i {
                    deps[i].insert(producer);
                }
            }
        }
    }

    let mut in_degree: Vec<usize> = deps.iter().map(|d| d.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); stages.len()];
    for (i, d) in deps.iter().enumerate() {
        for &p in d {
            dependents[p].push(i);
        }
    }

    let mut queue: VecDeque<usize> =
        (0..stages.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(stages.len());
    while let Some(i) = queue.pop_front() {
        order.push(i);
        for &next in &dependents[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() != stages.len() {
        return Err(Error::Custom("stage DAG has a cycle".into()));
    }
    Ok(order)
}

/// The known stage implementations, matched against [`StageSpec::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Lexicon,
    HitList,
    LinkGraph,
    PulseRank,
    Clustering,
    AbTree,
    SortedHits,
    Assoc,
}

impl StageName {
    fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "lexicon" => Ok(StageName::Lexicon),
            "hitlist" => Ok(StageName::HitList),
            "linkgraph" => Ok(StageName::LinkGraph),
            "pulserank" => Ok(StageName::PulseRank),
            "clustering" => Ok(StageName::Clustering),
            "abtree" => Ok(StageName::AbTree),
            "sortedhits" => Ok(StageName::SortedHits),
            "assoc" => Ok(StageName::Assoc),
            other => Err(Error::Custom(format!("unknown stage name {other}"))),
        }
    }

    /// How many parallel shards this stage's implementation is sharded
    /// into. Global (whole-corpus) stages report 1.
    fn shard_count(self, config: &PipelineConfig) -> u32 {
        match self {
            StageName::Lexicon | StageName::PulseRank | StageName::Clustering | StageName::AbTree => 1,
            StageName::HitList => config.log_div_count,
            StageName::LinkGraph => config.client_count,
            StageName::SortedHits => config.hit_list_breadth,
            StageName::Assoc => 1,
        }
    }

    fn dispatch(self, config: &PipelineConfig, shard: u32) -> Result<(), Error> {
        match self {
            StageName::Lexicon => lexicon::run_stage(config),
            StageName::HitList => hitlist::run_stage(config, shard),
            StageName::LinkGraph => linkgraph::run_stage(config, shard),
            StageName::PulseRank => pulserank::run_stage(config),
            StageName::Clustering => clustering::run_stage(config),
            StageName::AbTree => abtree::run_stage(config),
            StageName::SortedHits => sortedhits::run_stage(config, shard),
            StageName::Assoc => assoc::run_stage(config),
        }
    }
}

/// Runs every stage in `config.stages` to completion, in declared order,
/// using the in-process execution mode (spec.md §4.1.e). Each stage's
/// shards run concurrently via `rayon`; stages themselves run
/// sequentially in topological order.
pub fn run_pipeline(config: &PipelineConfig) -> Result<(), Error> {
    let order = topo_order(&config.stages)?;
    for idx in order {
        let stage = &config.stages[idx];
        let name = StageName::parse(&stage.name)?;
        let shards = name.shard_count(config);
        dispatch::run_stage_local(shards, |shard| name.dispatch(config, shard))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(name: &str, inputs: &[&str], outputs: &[&str]) -> StageSpec {
        StageSpec {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn independent_stages_keep_declared_order() {
        let stages = vec![stage("a", &[], &["x"]), stage("b", &[], &["y"])];
        let order = topo_order(&stages).unwrap();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn a_consumer_runs_after_its_producer_regardless_of_declared_order() {
        let stages = vec![
            stage("consumer", &["links"], &["ranked"]),
            stage("producer", &[], &["links"]),
        ];
        let order = topo_order(&stages).unwrap();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn a_cycle_is_rejected() {
        let stages = vec![stage("a", &["y"], &["x"]), stage("b", &["x"], &["y"])];
        assert!(topo_order(&stages).is_err());
    }

    #[test]
    fn diamond_dependency_resolves() {
        // hitlist -> {linkgraph, assoc} -> pulserank-ish sink
        let stages = vec![
            stage("sink", &["a", "b"], &["done"]),
            stage("hitlist", &[], &["base"]),
            stage("left", &["base"], &["a"]),
            stage("right", &["base"], &["b"]),
        ];
        let order = topo_order(&stages).unwrap();
        let pos = |name: &str| order.iter().position(|&i| stages[i].name == name).unwrap();
        assert!(pos("hitlist") < pos("left"));
        assert!(pos("hitlist") < pos("right"));
        assert!(pos("left") < pos("sink"));
        assert!(pos("right") < pos("sink"));
    }
}
