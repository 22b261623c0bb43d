use std::path::PathBuf;

use anyhow::Context as _;
use argex_tree::minimax_explainer;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DescribeArg {
    /// Framework to describe (all frameworks if omitted)
    #[arg(long)]
    framework: Option<String>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let explainer = minimax_explainer()?;
    let keys: Vec<&str> = match &arg.framework {
        Some(key) => vec![key.as_str()],
        None => explainer.framework_keys().collect(),
    };

    let mut output = Output::from_output_path(arg.output.clone())?;
    for key in keys {
        let framework = explainer
            .framework(key)
            .with_context(|| format!("Unknown framework: {key}"))?;
        output.write_text(&format!("# {key}\n{framework}"))?;
    }
    Ok(())
}
