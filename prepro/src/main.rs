use anyhow::{Context, Result};
use env_param::EnvParam;
use prepro_causal::CausalGraph;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use structopt::StructOpt;
use tracing::info;

/// When set, relevance pruning is skipped and every Variable is treated as relevant. The CLI's
/// "any extra argument" convention sets this directly; the environment variable lets it be
/// forced without touching argv (e.g. from a test harness).
static DO_NOT_PRUNE_VARIABLES: EnvParam<bool> = EnvParam::new("PREPRO_DO_NOT_PRUNE_VARIABLES", "false");

#[derive(Debug, StructOpt)]
#[structopt(name = "prepro", rename_all = "kebab-case")]
struct Opt {
    /// Path to the grounded task in the tool's wire format.
    input: PathBuf,
    /// Any further argument disables relevance pruning (kept variadic to match the historic
    /// "presence of an extra argument" convention rather than a named flag).
    extra: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let opt = Opt::from_args();

    let do_not_prune_variables = if !opt.extra.is_empty() {
        info!("extra argument present, disabling relevance pruning");
        true
    } else {
        DO_NOT_PRUNE_VARIABLES.get()
    };

    let src = fs::read_to_string(&opt.input).with_context(|| format!("reading {}", opt.input.display()))?;
    let mut problem = prepro_io::read_problem(&src)?;

    info!("building causal graph");
    let causal_graph = CausalGraph::build(&mut problem, do_not_prune_variables);
    info!(acyclic = causal_graph.is_acyclic(), "causal graph built");

    let (after, before) = prepro_causal::strip::strip_operators(&mut problem);
    info!(before, after, "stripped operators with no surviving effects");
    let (axioms_after, axioms_before) = prepro_causal::strip::strip_axioms(&mut problem);
    info!(before = axioms_before, after = axioms_after, "stripped axioms with no surviving effect");

    info!("building domain transition graphs");
    let dtgs = prepro_dtg::build_dtgs(&problem, causal_graph.variable_ordering());
    let tractable = prepro_dtg::tractable(causal_graph.is_acyclic(), &dtgs, &problem.vars);
    info!(tractable, "solvable in poly time");

    info!("building successor generator");
    let generator = prepro_succgen::build(&problem.vars, causal_graph.variable_ordering(), &problem.operators);

    info!("writing output");
    let mut out = String::new();
    prepro_io::write_problem(&mut out, &problem, tractable, &causal_graph, &generator, &dtgs)?;

    let output_path = output_file_name(&opt.input, &problem.name);
    fs::write(&output_path, out).with_context(|| format!("writing {}", output_path.display()))?;

    info!("done");
    Ok(())
}

/// `[<prefix>_]output_prepro<name>`, where `<prefix>` is the input filename's leading segment
/// up to its first `_` — unless that segment is itself `output`, in which case no prefix is
/// added (an input already named `output_something` doesn't get doubled up).
fn output_file_name(input: &std::path::Path, name: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let leading_segment = stem.split('_').next().unwrap_or("");

    let base = format!("output_prepro{name}");
    let file_name = if !leading_segment.is_empty() && leading_segment != "output" {
        format!("{leading_segment}_{base}")
    } else {
        base
    };

    input.parent().map(|p| p.join(&file_name)).unwrap_or_else(|| PathBuf::from(&file_name))
}
