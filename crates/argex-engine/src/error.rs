use crate::node::GetterError;

/// An adjective could not be evaluated on a node.
///
/// These errors never abort an explanation: the branch they occur in is
/// rendered as a failure leaf and its siblings are still explained.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
pub enum EvaluationError {
    #[display("no getter is set for adjective \"{adjective}\"")]
    MissingGetter { adjective: String },
    #[display("{source}")]
    Getter {
        adjective: String,
        node: String,
        source: GetterError,
    },
    #[display("adjective \"{adjective}\" should evaluate to {expected} on {node}, got {found}")]
    UnexpectedValue {
        adjective: String,
        node: String,
        expected: &'static str,
        found: &'static str,
    },
    #[display("comparison adjective \"{adjective}\" needs two nodes")]
    RequiresTwoNodes { adjective: String },
    #[display("adjective \"{adjective}\" is not a comparison")]
    NotAComparison { adjective: String },
    #[display("unknown adjective \"{adjective}\"")]
    UnknownReference { adjective: String },
    #[display(
        "the adjective \"{adjective}\" cannot be evaluated on {node} because dependent adjective \"{dependency}\" cannot be evaluated ({source})"
    )]
    Dependent {
        adjective: String,
        node: String,
        dependency: String,
        source: Box<EvaluationError>,
    },
}

impl EvaluationError {
    pub(crate) fn dependent(
        adjective: &str,
        node: &impl std::fmt::Display,
        dependency: &str,
        source: EvaluationError,
    ) -> Self {
        EvaluationError::Dependent {
            adjective: adjective.to_owned(),
            node: node.to_string(),
            dependency: dependency.to_owned(),
            source: Box::new(source),
        }
    }

    /// Name of the adjective that failed first along the causal chain.
    #[must_use]
    pub fn root_adjective(&self) -> &str {
        match self {
            EvaluationError::Dependent { source, .. } => source.root_adjective(),
            EvaluationError::MissingGetter { adjective }
            | EvaluationError::Getter { adjective, .. }
            | EvaluationError::UnexpectedValue { adjective, .. }
            | EvaluationError::RequiresTwoNodes { adjective }
            | EvaluationError::NotAComparison { adjective }
            | EvaluationError::UnknownReference { adjective } => adjective,
        }
    }
}

/// A framework definition is inconsistent.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
pub enum FrameworkError {
    #[display("adjective names must not be empty")]
    EmptyName,
    #[display("adjective \"{name}\" is already defined")]
    DuplicateAdjective { name: String },
    #[display("unknown adjective \"{name}\"")]
    UnknownAdjective { name: String },
    #[display("explanation of \"{adjective}\" refers to unknown adjective \"{reference}\"")]
    MalformedExplanation { adjective: String, reference: String },
    #[display("\"{adjective}\" refers to \"{reference}\", which is {found} instead of {expected}")]
    WrongKind {
        adjective: String,
        reference: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A settings object could not be read.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
#[display("invalid settings: {source}")]
pub struct SettingsError {
    source: serde_json::Error,
}

/// A setting value given as text is not one of the accepted names.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("invalid {kind} \"{value}\" (expected one of: {expected})")]
pub struct ParseSettingError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Errors that abort an `explain` call.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ExplainError {
    #[display("framework \"{framework}\" has no adjective \"{name}\"")]
    UnknownAdjective { framework: String, name: String },
    #[display("unknown framework \"{key}\"")]
    UnknownFramework { key: String },
    #[display("no framework has been registered")]
    NoFramework,
    #[display("framework \"{key}\" is already registered")]
    DuplicateFramework { key: String },
    #[display("no registered framework has an adjective \"{name}\"")]
    NoSuchGetterTarget { name: String },
    #[display("comparison adjective \"{adjective}\" needs a node to compare to")]
    MissingComparisonTarget { adjective: String },
    #[display("adjective \"{adjective}\" is not a comparison and takes no node to compare to")]
    UnexpectedComparisonTarget { adjective: String },
    #[display("{_0}")]
    #[from]
    Framework(FrameworkError),
    #[display("{_0}")]
    #[from]
    Settings(SettingsError),
}
