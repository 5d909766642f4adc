use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rigbake", version)]
struct Cli {
    /// Log more (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate definitions, printing every finding.
    Validate(ValidateArgs),
    /// Bake a chain of layer definitions into one definition.
    Bake(BakeArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Definition JSON files.
    #[arg(long = "in", required = true)]
    in_paths: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct BakeArgs {
    /// Layer definition JSON, first layer first. Repeat for each layer.
    #[arg(long = "layer", required = true)]
    layers: Vec<PathBuf>,

    /// Output path for the baked definition JSON.
    #[arg(long)]
    out: PathBuf,

    /// Rebuild shared sub-graphs at every occurrence instead of reusing them.
    #[arg(long)]
    no_memoize: bool,

    /// Deepest name resolution allowed before baking fails.
    #[arg(long, default_value_t = rigbake::BakeOpts::default().max_depth)]
    max_depth: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Bake(args) => cmd_bake(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_definition(path: &Path) -> anyhow::Result<rigbake::Definition> {
    rigbake::Definition::from_path(path)
        .with_context(|| format!("load definition '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let mut invalid = 0usize;
    for path in &args.in_paths {
        let def = read_definition(path)?;
        let report = def.validation_report();
        for warning in &report.warnings {
            println!("{}: warning: {warning}", path.display());
        }
        for issue in &report.issues {
            println!("{}: {issue}", path.display());
        }
        if report.is_valid() {
            println!("{}: ok", path.display());
        } else {
            invalid += 1;
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} of {} definitions are invalid", args.in_paths.len());
    }
    Ok(())
}

fn cmd_bake(args: BakeArgs) -> anyhow::Result<()> {
    let mut store = rigbake::DefinitionStore::new();
    let mut ids = Vec::with_capacity(args.layers.len());
    for path in &args.layers {
        ids.push(store.insert(read_definition(path)?));
    }

    let mut linked = rigbake::LinkedDefinitions::new(ids);
    linked.validate_links(&store).context("link layers")?;

    let opts = rigbake::BakeOpts {
        memoize: !args.no_memoize,
        max_depth: args.max_depth,
    };
    let summary = linked.bake(&mut store, &opts).context("bake layers")?;
    if !summary.baked_valid {
        eprintln!("warning: baked definition does not validate");
    }

    let baked = linked
        .baked_definition()
        .context("bake produced no definition")?;
    let json = baked.to_json_string_pretty()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json).with_context(|| format!("write '{}'", args.out.display()))?;

    eprintln!(
        "baked {} outputs ({} null, {} features)",
        summary.baked_outputs.len(),
        summary.null_outputs.len(),
        summary.feature_count
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
