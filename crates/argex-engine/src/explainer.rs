//! The explainer: a registry of frameworks answering "why" questions about nodes.

use std::fmt;

use argex_logic::{
    expr::Expr,
    render::{RenderOptions, Rendered},
};
use tracing::{debug, info};

use crate::{
    error::ExplainError,
    framework::ArgumentationFramework,
    instantiate::Instantiation,
    node::{Getter, Node},
    query,
    settings::{Settings, SettingsPatch},
};

/// A finished explanation, ready to be rendered.
#[derive(Debug, Clone)]
pub struct Argument {
    expr: Expr,
    options: RenderOptions,
}

impl Argument {
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    #[must_use]
    pub fn into_expr(self) -> Expr {
        self.expr
    }

    /// Print mode and depth markers resolved for this explanation.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Rendered::new(&self.expr, self.options), f)
    }
}

/// Explains adjectives of nodes with registered frameworks.
///
/// The first registered framework is used unless the settings select
/// another one with `with_framework`.
#[derive(Debug, Clone)]
pub struct ArgumentativeExplainer<N> {
    frameworks: Vec<(String, ArgumentationFramework<N>)>,
    settings: SettingsPatch,
}

impl<N> Default for ArgumentativeExplainer<N> {
    fn default() -> Self {
        Self {
            frameworks: vec![],
            settings: SettingsPatch::default(),
        }
    }
}

impl<N> ArgumentativeExplainer<N>
where
    N: Node,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a framework under `key` after validating it.
    pub fn add_framework(
        &mut self,
        key: impl Into<String>,
        framework: ArgumentationFramework<N>,
    ) -> Result<(), ExplainError> {
        let key = key.into();
        if self.framework(&key).is_some() {
            return Err(ExplainError::DuplicateFramework { key });
        }
        framework.validate()?;
        info!(
            framework = %key,
            adjectives = framework.adjectives().count(),
            "registered framework"
        );
        self.frameworks.push((key, framework));
        Ok(())
    }

    #[must_use]
    pub fn framework(&self, key: &str) -> Option<&ArgumentationFramework<N>> {
        self.frameworks
            .iter()
            .find_map(|(k, framework)| (k == key).then_some(framework))
    }

    pub fn framework_keys(&self) -> impl Iterator<Item = &str> {
        self.frameworks.iter().map(|(key, _)| key.as_str())
    }

    /// Settings configured on the explainer so far.
    #[must_use]
    pub fn settings(&self) -> &SettingsPatch {
        &self.settings
    }

    /// Layers `patch` over the settings configured so far.
    pub fn configure_settings(&mut self, patch: &SettingsPatch) -> Result<(), ExplainError> {
        if let Some(key) = &patch.with_framework {
            if self.framework(key).is_none() {
                return Err(ExplainError::UnknownFramework { key: key.clone() });
            }
        }
        self.settings.merge(patch);
        Ok(())
    }

    /// [`Self::configure_settings`] from the dictionary form.
    pub fn configure_settings_json(&mut self, value: serde_json::Value) -> Result<(), ExplainError> {
        let patch = SettingsPatch::from_json(value)?;
        self.configure_settings(&patch)
    }

    /// Sets the getter of adjective `name` in every framework that defines it.
    pub fn set_getter(&mut self, name: &str, getter: &Getter<N>) -> Result<(), ExplainError> {
        let mut found = false;
        for (_, framework) in &mut self.frameworks {
            if framework.adjective(name).is_some() {
                framework.set_getter(name, getter.clone())?;
                found = true;
            }
        }
        if !found {
            return Err(ExplainError::NoSuchGetterTarget {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    /// Picks the framework for a call and resolves its settings: defaults,
    /// then framework defaults, then configured settings, then `overrides`.
    pub fn resolve(
        &self,
        overrides: &SettingsPatch,
    ) -> Result<(&ArgumentationFramework<N>, Settings), ExplainError> {
        let selected = overrides
            .with_framework
            .as_deref()
            .or(self.settings.with_framework.as_deref());
        let (key, framework) = match selected {
            Some(key) => self
                .frameworks
                .iter()
                .find(|(k, _)| k == key)
                .ok_or_else(|| ExplainError::UnknownFramework {
                    key: key.to_owned(),
                })?,
            None => self.frameworks.first().ok_or(ExplainError::NoFramework)?,
        };
        let mut settings = Settings::default();
        settings.apply(framework.settings());
        settings.apply(&self.settings);
        settings.apply(overrides);
        settings.with_framework = Some(key.clone());
        Ok((framework, settings))
    }

    /// Explains why `node` has the value it has for `adjective`, or, for a
    /// comparison adjective, how `node` compares to `compare_to`.
    pub fn explain(
        &self,
        node: &N,
        adjective: &str,
        compare_to: Option<&N>,
    ) -> Result<Argument, ExplainError> {
        self.explain_with(node, adjective, compare_to, &SettingsPatch::default())
    }

    /// [`Self::explain`] with settings overridden for this call only.
    pub fn explain_with(
        &self,
        node: &N,
        adjective: &str,
        compare_to: Option<&N>,
        overrides: &SettingsPatch,
    ) -> Result<Argument, ExplainError> {
        let (framework, settings) = self.resolve(overrides)?;
        let Some(definition) = framework.adjective(adjective) else {
            return Err(ExplainError::UnknownAdjective {
                framework: settings.with_framework.unwrap_or_default(),
                name: adjective.to_owned(),
            });
        };
        debug!(
            adjective,
            %node,
            depth = settings.explanation_depth,
            framework = settings.with_framework.as_deref().unwrap_or_default(),
            "explaining"
        );
        let mut instantiation = Instantiation::new(framework, &settings);
        let expr = match (definition.is_comparison(), compare_to) {
            (true, Some(other)) => instantiation.comparison(node, other, adjective, 1),
            (true, None) => {
                return Err(ExplainError::MissingComparisonTarget {
                    adjective: adjective.to_owned(),
                });
            }
            (false, Some(_)) => {
                return Err(ExplainError::UnexpectedComparisonTarget {
                    adjective: adjective.to_owned(),
                });
            }
            (false, None) => instantiation.adjective(node, adjective, 1),
        };
        let expr = framework
            .tactics()
            .iter()
            .fold(expr, |expr, tactic| tactic.apply(expr))
            .normalize();
        Ok(Argument {
            expr,
            options: settings.render_options(),
        })
    }

    /// Answers a free-text question such as "Why is child1 best?".
    ///
    /// Returns `None` when the phrasing is not recognized or the explanation
    /// cannot be produced.
    #[must_use]
    pub fn query_explanation(&self, node: &N, question: &str) -> Option<Argument> {
        let (framework, _) = self.resolve(&SettingsPatch::default()).ok()?;
        let query = query::parse(framework, node, question)?;
        debug!(question, adjective = %query.adjective, "recognized question");
        self.explain(node, &query.adjective, query.compare_to.as_ref())
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use argex_logic::render::PrintMode;

    use super::*;
    use crate::{
        adjective::{Adjective, ComparisonOperator},
        error::FrameworkError,
        explanation::Explanation,
        node::tests::TestNode,
        settings::AssumptionsVerbosity,
        tactic::Tactic,
    };

    fn framework() -> ArgumentationFramework<TestNode> {
        let mut framework = ArgumentationFramework::new("node")
            .with_settings(
                SettingsPatch::default()
                    .explanation_depth(3)
                    .assumptions_verbosity(AssumptionsVerbosity::Verbose),
            )
            .with_main_adjective("best");
        framework
            .add_adjectives([
                Adjective::quantitative("score")
                    .with_getter(Getter::number(|n: &TestNode| n.0.score))
                    .with_explanation(Explanation::assumption("scores are given")),
                Adjective::nodes_group("group")
                    .with_getter(Getter::nodes(|n: &TestNode| n.0.group.clone())),
                Adjective::comparison("better", "score", ComparisonOperator::Greater),
                Adjective::max_rank("best", "better", "group"),
            ])
            .unwrap();
        framework
    }

    fn explainer() -> ArgumentativeExplainer<TestNode> {
        let mut explainer = ArgumentativeExplainer::new();
        explainer.add_framework("plain", framework()).unwrap();
        explainer
    }

    #[test]
    fn test_registration_errors() {
        let mut explainer = explainer();
        assert!(matches!(
            explainer.add_framework("plain", framework()),
            Err(ExplainError::DuplicateFramework { .. })
        ));

        let mut broken = framework();
        broken
            .add_adjective(Adjective::boolean("odd").with_explanation(Explanation::possession("even")))
            .unwrap();
        assert!(matches!(
            explainer.add_framework("broken", broken),
            Err(ExplainError::Framework(FrameworkError::MalformedExplanation { .. }))
        ));
        assert_eq!(explainer.framework_keys().collect::<Vec<_>>(), ["plain"]);
    }

    #[test]
    fn test_no_framework() {
        let explainer = ArgumentativeExplainer::<TestNode>::new();
        let a = TestNode::new("a", 1.0);
        assert!(matches!(
            explainer.explain(&a, "score", None),
            Err(ExplainError::NoFramework)
        ));
    }

    #[test]
    fn test_unknown_names() {
        let mut explainer = explainer();
        let a = TestNode::new("a", 1.0);
        assert_eq!(
            explainer.explain(&a, "worst", None).unwrap_err().to_string(),
            "framework \"plain\" has no adjective \"worst\""
        );
        assert!(matches!(
            explainer.configure_settings(&SettingsPatch::default().with_framework("fancy")),
            Err(ExplainError::UnknownFramework { .. })
        ));
        assert!(matches!(
            explainer.explain_with(
                &a,
                "score",
                None,
                &SettingsPatch::default().with_framework("fancy")
            ),
            Err(ExplainError::UnknownFramework { .. })
        ));
    }

    #[test]
    fn test_comparison_target_is_checked() {
        let explainer = explainer();
        let a = TestNode::new("a", 3.0);
        let b = TestNode::new("b", 4.0);
        assert!(matches!(
            explainer.explain(&a, "better", None),
            Err(ExplainError::MissingComparisonTarget { .. })
        ));
        assert!(matches!(
            explainer.explain(&a, "score", Some(&b)),
            Err(ExplainError::UnexpectedComparisonTarget { .. })
        ));
        let argument = explainer.explain(&a, "better", Some(&b)).unwrap();
        assert_eq!(
            argument.render(),
            "[[(assumption) scores are given → a has score = 3] ∧ [(assumption) scores are given → b has score = 4] → ¬(a is better than b)]"
        );
    }

    #[test]
    fn test_settings_precedence() {
        let mut explainer = explainer();
        let a = TestNode::new("a", 3.0);

        let resolved = explainer.resolve(&SettingsPatch::default()).unwrap().1;
        assert_eq!(resolved.explanation_depth, 3);
        assert_eq!(resolved.with_framework.as_deref(), Some("plain"));

        explainer
            .configure_settings_json(serde_json::json!({ "explanation_depth": 0 }))
            .unwrap();
        assert_eq!(explainer.explain(&a, "score", None).unwrap().render(), "a has score = ?");

        let call = SettingsPatch::default()
            .explanation_depth(1)
            .print_mode(PrintMode::Verbal);
        assert_eq!(
            explainer.explain_with(&a, "score", None, &call).unwrap().render(),
            "a has score = 3 (because (assumption) scores are given)"
        );

        assert!(matches!(
            explainer.configure_settings_json(serde_json::json!({ "depth": 2 })),
            Err(ExplainError::Settings(_))
        ));
    }

    #[test]
    fn test_set_getter_reaches_every_framework() {
        let mut explainer = explainer();
        explainer.add_framework("other", framework()).unwrap();
        explainer
            .set_getter("score", &Getter::number(|_: &TestNode| 7.0))
            .unwrap();
        let a = TestNode::new("a", 3.0);
        for key in ["plain", "other"] {
            let score = explainer
                .framework(key)
                .unwrap()
                .evaluate("score", &a)
                .unwrap();
            assert_eq!(score.as_number(), Some(7.0));
        }
        assert!(matches!(
            explainer.set_getter("height", &Getter::number(|_: &TestNode| 1.0)),
            Err(ExplainError::NoSuchGetterTarget { .. })
        ));
    }

    #[test]
    fn test_framework_tactics_apply_to_the_whole_tree() {
        let mut explainer = ArgumentativeExplainer::new();
        explainer
            .add_framework(
                "terse",
                framework().with_tactic(Tactic::SkipQuantitativeExplanations),
            )
            .unwrap();
        let a = TestNode::new("a", 3.0);
        let b = TestNode::new("b", 4.0);
        assert_eq!(
            explainer.explain(&a, "better", Some(&b)).unwrap().render(),
            "[a has score = 3 ∧ b has score = 4 → ¬(a is better than b)]"
        );
    }

    #[test]
    fn test_explain_is_deterministic() {
        let explainer = explainer();
        let b = TestNode::new("b", 1.0);
        let a = TestNode::with("a", 3.0, false, None, vec![b]);
        let first = explainer.explain(&a, "best", None).unwrap();
        let second = explainer.explain(&a, "best", None).unwrap();
        assert_eq!(first.expr(), second.expr());
        assert_eq!(first.render(), second.render());
    }
}
