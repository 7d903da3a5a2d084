use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};

use subgraph_sampler::{BatchRequest, BatchSampler, StrategyRegistry};

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn parse_args() -> Result<(PathBuf, Option<PathBuf>)> {
    let mut args = env::args().skip(1);
    let request = args
        .next()
        .context("usage: subgraph-sampler <request.json> [output.json]")?;
    let output = args.next().map(PathBuf::from);
    if let Some(extra) = args.next() {
        anyhow::bail!("Unexpected extra argument: {extra}");
    }
    Ok((PathBuf::from(request), output))
}

fn main() -> Result<()> {
    init_logging();
    let (request_path, output_path) = parse_args()?;

    let request = BatchRequest::from_path(&request_path)?;
    let registry = StrategyRegistry::with_builtin();
    debug!(
        "Registered strategies: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );
    let sampler = BatchSampler::new(request.config.clone(), registry)
        .context("configure sampler from request")?;

    let batch = request.graph_batch(sampler.domain())?;
    let scores = request.score_matrix()?;
    info!(
        "Request {:?}: {} graphs, scores {}x{}, policy {}",
        request_path,
        batch.len(),
        scores.nrows(),
        scores.ncols(),
        sampler.policy().name()
    );

    let start = Instant::now();
    let masks = sampler
        .sample(&batch, scores.view())
        .with_context(|| format!("sample masks for {:?}", request_path))?;
    info!("Sampling finished in {:?}", start.elapsed());

    let json = serde_json::to_string_pretty(&masks.to_document())?;
    match output_path {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("write masks to {:?}", path))?;
            info!("Masks written to {:?}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}
