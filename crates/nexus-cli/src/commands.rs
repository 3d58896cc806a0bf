use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info_span};

use nexus_cli::demo::run_demo;
use nexus_cli::summary::{pipelines_table, stats_table};
use nexus_core::{NexusConfig, PipelineManager};
use nexus_model::Record;

use crate::cli::{ChainArgs, InputArgs, RunArgs};

/// Build the manager from a registry file, or the demo registry when none is
/// given.
pub fn load_manager(config_path: Option<&Path>) -> Result<PipelineManager> {
    let config = match config_path {
        Some(path) => NexusConfig::load(path)
            .with_context(|| format!("load registry {}", path.display()))?,
        None => NexusConfig::demo(),
    };
    let manager = config.build_manager().context("build pipeline registry")?;
    debug!(pipelines = manager.len(), "pipeline registry ready");
    Ok(manager)
}

pub fn run_demo_command(manager: &mut PipelineManager) -> Result<()> {
    let transcript = run_demo(manager).context("demo walkthrough")?;
    for line in transcript {
        println!("{line}");
    }
    println!();
    println!("{}", stats_table(&manager.all_stats()));
    Ok(())
}

pub fn run_pipeline(manager: &mut PipelineManager, args: &RunArgs) -> Result<()> {
    let _span = info_span!("run", pipeline_id = %args.pipeline).entered();
    let raw = parse_input(&args.input)?;
    let output = manager.execute(&args.pipeline, raw)?;
    print_record(output)?;
    if args.input.stats {
        print_stats(manager, [args.pipeline.as_str()]);
    }
    Ok(())
}

pub fn run_chain(manager: &mut PipelineManager, args: &ChainArgs) -> Result<()> {
    let ids = split_ids(&args.pipelines);
    if ids.is_empty() {
        bail!("no pipelines given to chain");
    }
    let raw = parse_input(&args.input)?;
    let output = manager.chain(ids.as_slice(), raw)?;
    print_record(output)?;
    if args.input.stats {
        print_stats(manager, ids.iter().copied());
    }
    Ok(())
}

pub fn run_pipelines(manager: &PipelineManager) {
    println!("{}", pipelines_table(manager));
}

fn parse_input(args: &InputArgs) -> Result<Record> {
    if args.json {
        let value: serde_json::Value =
            serde_json::from_str(&args.input).context("decode --json input")?;
        Ok(Record::from(value))
    } else {
        Ok(Record::from(args.input.as_str()))
    }
}

fn split_ids(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}

fn print_record(record: Record) -> Result<()> {
    match record {
        Record::Text(text) => println!("{text}"),
        other => {
            let rendered = serde_json::to_string_pretty(&other.into_value())
                .context("render structured result")?;
            println!("{rendered}");
        }
    }
    Ok(())
}

/// Print stats for each distinct primary in `ids`, plus its backup if any.
fn print_stats<'a>(manager: &PipelineManager, ids: impl IntoIterator<Item = &'a str>) {
    let mut seen = Vec::new();
    let mut stats = Vec::new();
    for id in ids {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        stats.extend(manager.stats(id));
        stats.extend(manager.backup_stats(id));
    }
    println!("{}", stats_table(&stats));
}
