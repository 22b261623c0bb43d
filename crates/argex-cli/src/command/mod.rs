use clap::{Parser, Subcommand};

use self::{
    ask::AskArg, describe::DescribeArg, explain::ExplainArg, generate_tree::GenerateTreeArg,
};

mod ask;
mod describe;
mod explain;
mod generate_tree;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Explain why a node of a game tree has an adjective
    Explain(#[clap(flatten)] ExplainArg),
    /// Answer a free-text question about a node of a game tree
    Ask(#[clap(flatten)] AskArg),
    /// Print the propositions and implications of the frameworks
    Describe(#[clap(flatten)] DescribeArg),
    /// Generate a random game tree
    GenerateTree(#[clap(flatten)] GenerateTreeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Explain(arg) => explain::run(&arg)?,
        Mode::Ask(arg) => ask::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::GenerateTree(arg) => generate_tree::run(&arg)?,
    }
    Ok(())
}
