use std::path::PathBuf;

use anyhow::ensure;
use argex_tree::{GameTree, TreeSpec};
use rand::Rng as _;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateTreeArg {
    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Depth of the tree; leaves are at this depth
    #[arg(long, default_value_t = 3)]
    depth: usize,
    /// Number of children of every internal node
    #[arg(long, default_value_t = 2)]
    branching: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateTreeArg) -> anyhow::Result<()> {
    ensure!(arg.branching > 0, "Branching factor must be positive");
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());

    eprintln!(
        "Generating tree (seed: {seed}, depth: {}, branching: {})...",
        arg.depth, arg.branching
    );
    let spec = TreeSpec::random(seed, arg.depth, arg.branching);
    let tree = GameTree::from_spec(&spec)?;
    eprintln!("Root score: {}", tree.root().score());
    Output::save_json(&spec, arg.output.clone())?;
    eprintln!("Generated {} nodes", tree.len());
    Ok(())
}
