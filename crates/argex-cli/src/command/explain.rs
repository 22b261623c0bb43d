use std::path::PathBuf;

use anyhow::Context as _;
use argex_engine::{
    PrintMode,
    settings::{AssumptionsVerbosity, SettingsPatch},
};
use argex_tree::minimax_explainer;
use tracing::info;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExplainArg {
    /// Game tree JSON file
    #[arg(long)]
    tree: PathBuf,
    /// Label of the node to explain
    #[arg(long)]
    node: String,
    /// Adjective to explain (defaults to the framework's main adjective)
    #[arg(long)]
    adjective: Option<String>,
    /// Label of the node to compare with, for comparison adjectives
    #[arg(long)]
    compare_to: Option<String>,
    /// Framework to explain with
    #[arg(long)]
    framework: Option<String>,
    /// Maximum explanation depth
    #[arg(long)]
    depth: Option<u32>,
    /// Print mode (`verbal` or `logic`)
    #[arg(long)]
    print_mode: Option<PrintMode>,
    /// Assumptions verbosity (`verbose`, `minimal`, `no` or `if_asked`)
    #[arg(long)]
    verbosity: Option<AssumptionsVerbosity>,
    /// Print implicit assumptions
    #[arg(long)]
    implicit_assumptions: bool,
    /// Prefix every implication with its depth
    #[arg(long)]
    print_depth: bool,
    /// Settings JSON file applied before the options above
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExplainArg {
    fn overrides(&self) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        if let Some(framework) = &self.framework {
            patch = patch.with_framework(framework.as_str());
        }
        if let Some(depth) = self.depth {
            patch = patch.explanation_depth(depth);
        }
        if let Some(mode) = self.print_mode {
            patch = patch.print_mode(mode);
        }
        if let Some(verbosity) = self.verbosity {
            patch = patch.assumptions_verbosity(verbosity);
        }
        if self.implicit_assumptions {
            patch = patch.print_implicit_assumptions(true);
        }
        if self.print_depth {
            patch = patch.print_depth(true);
        }
        patch
    }
}

pub(crate) fn run(arg: &ExplainArg) -> anyhow::Result<()> {
    let tree = util::read_tree_file(&arg.tree)?;
    let node = util::find_node(&tree, &arg.node)?;
    let other = arg
        .compare_to
        .as_deref()
        .map(|label| util::find_node(&tree, label))
        .transpose()?;

    let mut explainer = minimax_explainer()?;
    if let Some(path) = &arg.settings {
        let settings: serde_json::Value = util::read_json_file("settings", path)?;
        explainer.configure_settings_json(settings)?;
    }

    let overrides = arg.overrides();
    let adjective = match &arg.adjective {
        Some(adjective) => adjective.clone(),
        None => {
            let (framework, settings) = explainer.resolve(&overrides)?;
            framework
                .main_adjective()
                .map(str::to_owned)
                .with_context(|| {
                    format!(
                        "Framework {} has no main adjective; pass --adjective",
                        settings.with_framework.unwrap_or_default()
                    )
                })?
        }
    };

    info!(node = %node, adjective, "explaining");
    let argument = explainer.explain_with(&node, &adjective, other.as_ref(), &overrides)?;
    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_text(&argument.render())?;
    Ok(())
}
