use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fibtree::reveal::RevealEvent;
use fibtree::{BuildMode, RevealStep, Speed, Visualizer, VisualizerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fibtree", about = "Fibonacci recursion tree: naive vs memoized calls")]
struct Cli {
    /// Emit debug-level logs (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Argument to F (non-negative integer).
    #[arg(allow_hyphen_values = true)]
    n: String,
    /// Use memoized recursion instead of naive recursion.
    #[arg(long)]
    memo: bool,
    /// Largest n accepted in naive mode (at most 25).
    #[arg(
        long,
        default_value_t = fibtree::tree::DEFAULT_NAIVE_CEILING,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(fibtree::tree::MAX_NAIVE_CEILING))
    )]
    naive_ceiling: u32,
    /// Pixels between depth levels.
    #[arg(long, default_value_t = fibtree::layout::DEFAULT_VERTICAL_GAP)]
    vertical_gap: f64,
    /// Pixels per leaf slot.
    #[arg(long, default_value_t = fibtree::layout::DEFAULT_HORIZONTAL_UNIT)]
    horizontal_unit: f64,
}

impl TreeArgs {
    fn mode(&self) -> BuildMode {
        if self.memo {
            BuildMode::Memoized
        } else {
            BuildMode::Naive
        }
    }

    fn config(&self) -> VisualizerConfig {
        VisualizerConfig::default()
            .with_naive_ceiling(self.naive_ceiling)
            .with_vertical_gap(self.vertical_gap)
            .with_horizontal_unit(self.horizontal_unit)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the call tree and print its statistics and positioned nodes.
    Build {
        #[command(flatten)]
        tree: TreeArgs,
        /// Reveal only the root instead of the whole tree.
        #[arg(long)]
        animate: bool,
    },
    /// Reveal the tree node by node at the chosen speed.
    Play {
        #[command(flatten)]
        tree: TreeArgs,
        /// Speed level 1 (slow) to 10 (fast).
        #[arg(long, default_value_t = 5)]
        speed: u8,
        /// Fast-forward instead of normal playback.
        #[arg(long)]
        skip: bool,
        /// Skip interval in milliseconds.
        #[arg(long, default_value_t = 60)]
        fast_interval_ms: u64,
    },
    /// Print the positioned tree and summary as JSON.
    #[cfg(feature = "visualize")]
    Export {
        #[command(flatten)]
        tree: TreeArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { tree, animate } => run_build(tree, animate)?,
        Commands::Play {
            tree,
            speed,
            skip,
            fast_interval_ms,
        } => run_play(tree, Speed::new(speed), skip, fast_interval_ms)?,
        #[cfg(feature = "visualize")]
        Commands::Export { tree } => run_export(tree)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "fibtree=debug" } else { "fibtree=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_build(args: TreeArgs, animate: bool) -> Result<()> {
    let mut vis = Visualizer::new(args.config());
    vis.build_from_input(&args.n, args.mode(), animate)
        .with_context(|| format!("cannot build tree for n = '{}'", args.n.trim()))?;

    let session = vis.session().context("session missing after build")?;
    println!("{}", session.summary());
    println!();

    let layout = session.layout();
    println!(
        "layout: width={} slots\tdepth={}\textent={}",
        layout.width, layout.max_depth, layout.extent
    );
    for item in session.controller().node_items() {
        println!(
            "{}\t{}\t{}\t{:?}\t{}{}",
            item.id,
            item.label,
            item.value_label,
            item.kind,
            item.position,
            if item.visible { "" } else { "\t(hidden)" }
        );
    }

    if let Some(detail) = session.detail() {
        println!();
        println!("{detail}");
    }

    Ok(())
}

fn run_play(args: TreeArgs, speed: Speed, skip: bool, fast_interval_ms: u64) -> Result<()> {
    let config = args
        .config()
        .with_speed(speed)
        .with_fast_interval(Duration::from_millis(fast_interval_ms));
    let mut vis = Visualizer::new(config);

    let first = vis
        .build_from_input(&args.n, args.mode(), true)
        .with_context(|| format!("cannot build tree for n = '{}'", args.n.trim()))?;
    for step in &first {
        print_step(step);
    }

    let armed = if skip { vis.skip() } else { vis.play() };
    if armed {
        tracing::info!(speed = %speed, skip, "playing");
    }

    // Cooperative loop: wait one interval, deliver one tick
    while let Some(interval) = vis.pending_interval() {
        thread::sleep(interval);
        if let Some(step) = vis.tick() {
            print_step(&step);
        }
    }

    if let Some(summary) = vis.summary() {
        println!("{summary}");
    }
    Ok(())
}

fn print_step(step: &RevealStep) {
    for event in &step.events {
        match event {
            RevealEvent::Node {
                id,
                position,
                label,
                value_label,
                cached,
                ..
            } => println!(
                "node {id}\t{label} {value_label}\tat {position}{}",
                if *cached { "\t[cached]" } else { "" }
            ),
            RevealEvent::Edge {
                parent_id,
                child_id,
                dashed,
                ..
            } => println!(
                "edge {parent_id} -> {child_id}{}",
                if *dashed { "\t[dashed]" } else { "" }
            ),
        }
    }
    println!("{}", step.detail);
    println!("---");
}

#[cfg(feature = "visualize")]
fn run_export(args: TreeArgs) -> Result<()> {
    let mut vis = Visualizer::new(args.config());
    vis.build_from_input(&args.n, args.mode(), false)
        .with_context(|| format!("cannot build tree for n = '{}'", args.n.trim()))?;
    let session = vis.session().context("session missing after build")?;

    let document = serde_json::json!({
        "request": session.request(),
        "summary": session.summary(),
        "layout": session.layout(),
        "nodes": session.controller().node_items(),
        "edges": session.controller().edge_items(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&document).context("failed to serialize tree")?
    );
    Ok(())
}
