//! Explanation settings.
//!
//! [`Settings`] is the fully resolved configuration of one explanation.
//! [`SettingsPatch`] is a partial configuration, as stored by frameworks and
//! explainers or given per call; patches are applied on top of the defaults
//! in order of precedence.

use std::str::FromStr;

use argex_logic::render::{PrintMode, RenderOptions};

use crate::error::{ParseSettingError, SettingsError};

/// How assumptions are printed.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionsVerbosity {
    /// `(assumption) <text>`
    #[display("verbose")]
    Verbose,
    /// `(from assumptions)`
    #[display("minimal")]
    Minimal,
    /// Omitted.
    #[display("no")]
    No,
    /// Verbose for the asked adjective's own explanation, omitted deeper.
    #[default]
    #[display("if_asked")]
    IfAsked,
}

impl FromStr for AssumptionsVerbosity {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verbose" => Ok(AssumptionsVerbosity::Verbose),
            "minimal" => Ok(AssumptionsVerbosity::Minimal),
            "no" => Ok(AssumptionsVerbosity::No),
            "if_asked" => Ok(AssumptionsVerbosity::IfAsked),
            _ => Err(ParseSettingError {
                kind: "assumptions verbosity",
                value: s.to_owned(),
                expected: "verbose, minimal, no, if_asked",
            }),
        }
    }
}

pub const DEFAULT_EXPLANATION_DEPTH: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Deepest explanation level that is expanded; deeper claims render as `<node> has <adjective> = ?`.
    pub explanation_depth: u32,
    pub print_implicit_assumptions: bool,
    pub assumptions_verbosity: AssumptionsVerbosity,
    pub print_mode: PrintMode,
    /// Framework used for the explanation; the first registered one when unset.
    pub with_framework: Option<String>,
    pub print_depth: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            explanation_depth: DEFAULT_EXPLANATION_DEPTH,
            print_implicit_assumptions: false,
            assumptions_verbosity: AssumptionsVerbosity::default(),
            print_mode: PrintMode::default(),
            with_framework: None,
            print_depth: false,
        }
    }
}

impl Settings {
    /// Overwrites every field the patch sets.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(depth) = patch.explanation_depth {
            self.explanation_depth = depth;
        }
        if let Some(print) = patch.print_implicit_assumptions {
            self.print_implicit_assumptions = print;
        }
        if let Some(verbosity) = patch.assumptions_verbosity {
            self.assumptions_verbosity = verbosity;
        }
        if let Some(mode) = patch.print_mode {
            self.print_mode = mode;
        }
        if let Some(framework) = &patch.with_framework {
            self.with_framework = Some(framework.clone());
        }
        if let Some(print) = patch.print_depth {
            self.print_depth = print;
        }
    }

    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.print_mode).with_print_depth(self.print_depth)
    }
}

/// Partial settings; unset fields leave the underlying value untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_implicit_assumptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions_verbosity: Option<AssumptionsVerbosity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_mode: Option<PrintMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_depth: Option<bool>,
}

impl SettingsPatch {
    /// Reads the dictionary form, e.g. `{"explanation_depth": 3, "print_mode": "verbal"}`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, SettingsError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Layers `other` on top of `self`: fields set in `other` win.
    pub fn merge(&mut self, other: &SettingsPatch) {
        fn layer<T: Clone>(base: &mut Option<T>, top: &Option<T>) {
            if top.is_some() {
                base.clone_from(top);
            }
        }
        layer(&mut self.explanation_depth, &other.explanation_depth);
        layer(
            &mut self.print_implicit_assumptions,
            &other.print_implicit_assumptions,
        );
        layer(&mut self.assumptions_verbosity, &other.assumptions_verbosity);
        layer(&mut self.print_mode, &other.print_mode);
        layer(&mut self.with_framework, &other.with_framework);
        layer(&mut self.print_depth, &other.print_depth);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    #[must_use]
    pub fn explanation_depth(mut self, depth: u32) -> Self {
        self.explanation_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn print_implicit_assumptions(mut self, print: bool) -> Self {
        self.print_implicit_assumptions = Some(print);
        self
    }

    #[must_use]
    pub fn assumptions_verbosity(mut self, verbosity: AssumptionsVerbosity) -> Self {
        self.assumptions_verbosity = Some(verbosity);
        self
    }

    #[must_use]
    pub fn print_mode(mut self, mode: PrintMode) -> Self {
        self.print_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_framework(mut self, key: impl Into<String>) -> Self {
        self.with_framework = Some(key.into());
        self
    }

    #[must_use]
    pub fn print_depth(mut self, print: bool) -> Self {
        self.print_depth = Some(print);
        self
    }
}
