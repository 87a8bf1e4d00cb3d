use core::fmt;

use rkyv::{Archive, Deserialize, Serialize};
use thiserror::Error;

use crate::ids::TokenId;
use crate::morphology::{LexicalEntry, PosTag};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Suffix shared by every label that marks a non-projective attachment.
pub const MARKER_SUFFIX: &str = "-nproj";

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
    pub start: u32,
    pub end: u32,
    /// Elided or inserted token with no surface text of its own.
    pub empty: bool,
    pub tag: PosTag,
    pub entries: Vec<LexicalEntry>,
}

impl Token {
    /// The synthetic root prepended to every sentence.
    pub fn root() -> Self {
        Self {
            id: TokenId::ROOT,
            text: String::new(),
            start: 0,
            end: 0,
            empty: false,
            tag: PosTag::Root,
            entries: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.tag == PosTag::Root
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.id, self.text, self.tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct DependencyArc {
    pub head: TokenId,
    pub dependent: TokenId,
    pub label: String,
}

impl DependencyArc {
    pub fn new(head: TokenId, dependent: TokenId, label: impl Into<String>) -> Self {
        Self {
            head,
            dependent,
            label: label.into(),
        }
    }
}

impl fmt::Display for DependencyArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.label, self.head, self.dependent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("flattening label is empty")]
    Empty,
    #[error("flattening label '{0}' contains whitespace")]
    Whitespace(String),
    #[error("flattening label '{0}' must be a base label followed by '{MARKER_SUFFIX}'")]
    MissingMarker(String),
}

/// The reserved label that marks projectified adjective and numeral
/// attachments, e.g. `Dep-nproj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlatteningLabel {
    label: String,
}

impl FlatteningLabel {
    pub fn new(label: impl Into<String>) -> Result<Self, LabelError> {
        let label = label.into();
        if label.is_empty() {
            return Err(LabelError::Empty);
        }
        if label.chars().any(char::is_whitespace) {
            return Err(LabelError::Whitespace(label));
        }
        match label.strip_suffix(MARKER_SUFFIX) {
            Some(base) if !base.is_empty() => Ok(Self { label }),
            _ => Err(LabelError::MissingMarker(label)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// The label without its marker suffix (`Dep` for `Dep-nproj`).
    pub fn base(&self) -> &str {
        &self.label[..self.label.len() - MARKER_SUFFIX.len()]
    }

    pub fn matches(&self, label: &str) -> bool {
        self.label == label
    }
}

impl fmt::Display for FlatteningLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl core::str::FromStr for FlatteningLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
