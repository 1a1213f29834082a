//! Config values, their type tags and tagged key parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single configuration value.
///
/// Stored untagged, so a TOML document reads naturally
/// (`horizontal_size = 14`, `enabled = true`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// Double-precision number.
    Double(f64),
    /// Free text.
    Str(String),
}

impl ConfigValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The double, if this is one.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The text, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Type of a config value, named by a one-character tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `B`
    Bool,
    /// `I`
    Int,
    /// `D`
    Double,
    /// `S`
    Str,
}

impl ValueKind {
    /// The tag character for this kind.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Bool => 'B',
            Self::Int => 'I',
            Self::Double => 'D',
            Self::Str => 'S',
        }
    }

    /// Looks up a kind by tag character.
    #[must_use]
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'B' => Some(Self::Bool),
            'I' => Some(Self::Int),
            'D' => Some(Self::Double),
            'S' => Some(Self::Str),
            _ => None,
        }
    }

    /// Parses `raw` as this kind.
    ///
    /// Booleans are permissive: `true` in any ASCII case is `true`, anything
    /// else is `false`. Integers must be bare digits with an optional sign;
    /// doubles ignore surrounding whitespace. Strings are taken verbatim.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<ConfigValue> {
        match self {
            Self::Bool => Some(ConfigValue::Bool(raw.eq_ignore_ascii_case("true"))),
            Self::Int => raw.parse().ok().map(ConfigValue::Int),
            Self::Double => raw.trim().parse().ok().map(ConfigValue::Double),
            Self::Str => Some(ConfigValue::Str(raw.to_owned())),
        }
    }
}

/// A mutation key of the form `T:name`.
///
/// The first character is the type tag, the second a separator (any
/// character, conventionally `:`), and the rest the bare key name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypedKey<'a> {
    /// Declared kind.
    pub kind: ValueKind,
    /// Bare key name.
    pub name: &'a str,
}

impl<'a> TypedKey<'a> {
    /// Splits a tagged key. Returns `None` for an unknown tag or an empty name.
    #[must_use]
    pub fn parse(key: &'a str) -> Option<Self> {
        let mut chars = key.char_indices();
        let (_, tag) = chars.next()?;
        let (separator_at, separator) = chars.next()?;
        let name = &key[separator_at + separator.len_utf8()..];

        if name.is_empty() {
            return None;
        }

        Some(Self {
            kind: ValueKind::from_tag(tag)?,
            name,
        })
    }
}

impl fmt::Display for TypedKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.tag(), self.name)
    }
}
