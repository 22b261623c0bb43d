//! The boundary with the host domain: nodes, values and getters.

use std::{fmt, rc::Rc};

/// An object adjectives talk about (a game state, a move, ...).
///
/// The engine never mutates nodes and only reads them through getters.
/// `Display` gives the label used in rendered claims.
pub trait Node: Clone + fmt::Debug + fmt::Display {
    /// Identity comparison. Two nodes with equal attributes are still distinct.
    fn same_node(&self, other: &Self) -> bool;
}

/// Raw value of an adjective on a node.
#[derive(Debug, Clone)]
pub enum Value<N> {
    Bool(bool),
    Number(f64),
    Text(String),
    Node(N),
    Nodes(Vec<N>),
    None,
}

impl<N> Value<N> {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_node(&self) -> Option<&N> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_nodes(&self) -> Option<&[N]> {
        match self {
            Value::Nodes(ns) => Some(ns),
            _ => None,
        }
    }

    /// Short description of the variant, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::Text(_) => "a text",
            Value::Node(_) => "a node",
            Value::Nodes(_) => "a list of nodes",
            Value::None => "nothing",
        }
    }
}

impl<N> Value<N>
where
    N: fmt::Display,
{
    /// Whether this value equals the expected literal of a condition.
    ///
    /// Nodes match a text literal equal to their label.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, expected: &Literal) -> bool {
        match (self, expected) {
            (Value::Bool(a), Literal::Bool(b)) => a == b,
            (Value::Number(a), Literal::Number(b)) => a == b,
            (Value::Text(a), Literal::Text(b)) => a == b,
            (Value::Node(n), Literal::Text(b)) => n.to_string() == *b,
            _ => false,
        }
    }
}

impl<N> fmt::Display for Value<N>
where
    N: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Node(n) => write!(f, "{n}"),
            Value::Nodes(ns) if ns.is_empty() => f.write_str("none"),
            Value::Nodes(ns) => {
                for (i, n) in ns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{n}")?;
                }
                Ok(())
            }
            Value::None => f.write_str("?"),
        }
    }
}

/// Formats integral numbers without a fractional part.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Node-free value a condition can expect.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::From)]
pub enum Literal {
    #[display("{_0}")]
    Bool(bool),
    #[display("{}", format_number(*_0))]
    Number(f64),
    #[display("{_0}")]
    Text(String),
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_owned())
    }
}

/// Error returned by a getter that cannot produce a value for a node.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("{message}")]
pub struct GetterError {
    message: String,
}

impl GetterError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

type GetterFn<N> = dyn Fn(&N) -> Result<Value<N>, GetterError>;

/// Function mapping a node to the raw value of an adjective.
pub struct Getter<N>(Rc<GetterFn<N>>);

impl<N> Clone for Getter<N> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<N> fmt::Debug for Getter<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Getter(..)")
    }
}

impl<N> Getter<N>
where
    N: 'static,
{
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&N) -> Result<Value<N>, GetterError> + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn boolean<F>(f: F) -> Self
    where
        F: Fn(&N) -> bool + 'static,
    {
        Self::new(move |n| Ok(Value::Bool(f(n))))
    }

    pub fn number<F>(f: F) -> Self
    where
        F: Fn(&N) -> f64 + 'static,
    {
        Self::new(move |n| Ok(Value::Number(f(n))))
    }

    /// Pointer getter; `None` means the node points nowhere.
    pub fn node<F>(f: F) -> Self
    where
        F: Fn(&N) -> Option<N> + 'static,
    {
        Self::new(move |n| Ok(f(n).map_or(Value::None, Value::Node)))
    }

    pub fn nodes<F>(f: F) -> Self
    where
        F: Fn(&N) -> Vec<N> + 'static,
    {
        Self::new(move |n| Ok(Value::Nodes(f(n))))
    }
}

impl<N> Getter<N> {
    pub fn call(&self, node: &N) -> Result<Value<N>, GetterError> {
        (self.0)(node)
    }
}
