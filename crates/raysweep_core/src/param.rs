//! Parameter tree data model
//!
//! Sweeps are described as trees mixing three node kinds: scalar leaves,
//! alternative lists (independent choices to enumerate), and named groups.
//! The kinds are resolved once at construction time into the [`ParamSpec`]
//! tagged union, so the expansion engine matches on structure instead of
//! re-checking value shapes at every recursive call.
//!
//! [`ParamTree`] is the post-expansion form: the same tree shape with all
//! alternatives resolved away, only scalars at the leaves. A [`SweepConfig`]
//! is one fully-resolved configuration, keyed by target element name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque leaf value, assigned verbatim onto a target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view of the scalar, coercing integers to floats.
    ///
    /// Returns `None` for booleans and text. Adapters over targets whose
    /// fields are all doubles use this to accept integer spec values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Bool(_) | Scalar::Text(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// An unexpanded sweep description.
///
/// Keys of a [`ParamSpec::Group`] may be dot-separated paths
/// (`"Slit.openingWidth"`); they are interpreted by the nesting pass in
/// [`crate::normalize`], not by the expansion itself.
///
/// The serde representation is untagged, so the JSON shape is the natural
/// encoding: arrays become alternatives, objects become groups, primitives
/// become scalar leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSpec {
    /// A single fixed value.
    Value(Scalar),
    /// Independent candidates, each expanded on its own and concatenated.
    Alternatives(Vec<ParamSpec>),
    /// Named children. Sibling keys of equal expansion length pair in
    /// lockstep; unequal lengths are an error, never a cross product.
    Group(BTreeMap<String, ParamSpec>),
}

impl ParamSpec {
    /// A scalar leaf.
    pub fn value(v: impl Into<Scalar>) -> Self {
        ParamSpec::Value(v.into())
    }

    /// An alternative list from any iterator of specs.
    pub fn alternatives(items: impl IntoIterator<Item = ParamSpec>) -> Self {
        ParamSpec::Alternatives(items.into_iter().collect())
    }

    /// A group from `(key, spec)` pairs.
    pub fn group<K: Into<String>>(entries: impl IntoIterator<Item = (K, ParamSpec)>) -> Self {
        ParamSpec::Group(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }
}

impl From<Scalar> for ParamSpec {
    fn from(v: Scalar) -> Self {
        ParamSpec::Value(v)
    }
}

impl From<f64> for ParamSpec {
    fn from(v: f64) -> Self {
        ParamSpec::Value(v.into())
    }
}

impl From<i64> for ParamSpec {
    fn from(v: i64) -> Self {
        ParamSpec::Value(v.into())
    }
}

impl From<&str> for ParamSpec {
    fn from(v: &str) -> Self {
        ParamSpec::Value(v.into())
    }
}

/// A fully-expanded tree: only groups and scalar leaves remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamTree {
    Value(Scalar),
    Group(BTreeMap<String, ParamTree>),
}

impl fmt::Display for ParamTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamTree::Value(v) => write!(f, "{v}"),
            ParamTree::Group(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<Scalar> for ParamTree {
    fn from(v: Scalar) -> Self {
        ParamTree::Value(v)
    }
}

/// One fully-resolved configuration: element name to attribute tree.
///
/// `BTreeMap` keeps key iteration deterministic, which both the lockstep
/// expansion order and the sweep driver's path walk rely on.
pub type SweepConfig = BTreeMap<String, ParamTree>;

/// Render a configuration the way [`ParamTree::Group`] renders, for log
/// lines and error messages.
#[must_use]
pub fn display_config(config: &SweepConfig) -> String {
    ParamTree::Group(config.clone()).to_string()
}
