use std::path::PathBuf;

use argex_tree::minimax_explainer;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AskArg {
    /// Game tree JSON file
    #[arg(long)]
    tree: PathBuf,
    /// Label of the node the question is about
    #[arg(long)]
    node: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Question, e.g. "Why is child1 the best?"
    question: String,
}

pub(crate) fn run(arg: &AskArg) -> anyhow::Result<()> {
    let tree = util::read_tree_file(&arg.tree)?;
    let node = util::find_node(&tree, &arg.node)?;
    let explainer = minimax_explainer()?;

    let Some(argument) = explainer.query_explanation(&node, &arg.question) else {
        anyhow::bail!("Question not understood: {}", arg.question);
    };
    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_text(&argument.render())?;
    Ok(())
}
