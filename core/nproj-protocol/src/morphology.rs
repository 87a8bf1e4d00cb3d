use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Lexicon value meaning "unspecified". Never takes part in a comparison.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unknown part-of-speech tag '{0}'")]
    UnknownTag(String),
    #[error("no coarse category for tag {0}")]
    NoCoarseCategory(PosTag),
}

/// Fine-grained part-of-speech tags of the Serbian tagset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PosTag {
    Root = 0,
    Adjective = 1,     // A
    Abbreviation = 2,  // Abr
    Adverb = 3,        // Adv
    CoordConj = 4,     // C_coord
    SubConj = 5,       // C_sub
    Interjection = 6,  // I
    Letter = 7,        // L
    Noun = 8,          // N
    Numeral = 9,       // Num
    Pronoun = 10,      // P
    Particle = 11,     // Part
    Preposition = 12,  // Prep
    MainVerb = 13,     // V_main
    AuxVerb = 14,      // V_aux
    Residual = 15,     // X
    Punctuation = 16,  // Z
}

impl PosTag {
    pub const ALL: [PosTag; 17] = [
        PosTag::Root,
        PosTag::Adjective,
        PosTag::Abbreviation,
        PosTag::Adverb,
        PosTag::CoordConj,
        PosTag::SubConj,
        PosTag::Interjection,
        PosTag::Letter,
        PosTag::Noun,
        PosTag::Numeral,
        PosTag::Pronoun,
        PosTag::Particle,
        PosTag::Preposition,
        PosTag::MainVerb,
        PosTag::AuxVerb,
        PosTag::Residual,
        PosTag::Punctuation,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            PosTag::Root => "ROOT",
            PosTag::Adjective => "A",
            PosTag::Abbreviation => "Abr",
            PosTag::Adverb => "Adv",
            PosTag::CoordConj => "C_coord",
            PosTag::SubConj => "C_sub",
            PosTag::Interjection => "I",
            PosTag::Letter => "L",
            PosTag::Noun => "N",
            PosTag::Numeral => "Num",
            PosTag::Pronoun => "P",
            PosTag::Particle => "Part",
            PosTag::Preposition => "Prep",
            PosTag::MainVerb => "V_main",
            PosTag::AuxVerb => "V_aux",
            PosTag::Residual => "X",
            PosTag::Punctuation => "Z",
        }
    }

    /// Buckets the tag into the coarse category used for score labels.
    /// The synthetic root has no category.
    pub fn coarse(self) -> Result<CoarseTag, TagError> {
        let coarse = match self {
            PosTag::Adjective | PosTag::Numeral => CoarseTag::Adj,
            PosTag::Abbreviation
            | PosTag::Adverb
            | PosTag::Interjection
            | PosTag::Particle
            | PosTag::Preposition
            | PosTag::AuxVerb => CoarseTag::Adv,
            PosTag::CoordConj | PosTag::SubConj => CoarseTag::C,
            PosTag::Noun | PosTag::Pronoun => CoarseTag::N,
            PosTag::MainVerb => CoarseTag::V,
            PosTag::Letter | PosTag::Residual | PosTag::Punctuation => CoarseTag::X,
            PosTag::Root => return Err(TagError::NoCoarseCategory(self)),
        };
        Ok(coarse)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PosTag {
    type Err = TagError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        PosTag::ALL
            .into_iter()
            .find(|tag| tag.code() == code)
            .ok_or_else(|| TagError::UnknownTag(code.to_string()))
    }
}

impl TryFrom<String> for PosTag {
    type Error = TagError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<PosTag> for String {
    fn from(tag: PosTag) -> String {
        tag.code().to_string()
    }
}

/// Coarse categories, only used to build refined evaluation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum CoarseTag {
    Adj = 0,
    Adv = 1,
    C = 2,
    N = 3,
    V = 4,
    X = 5,
}

impl CoarseTag {
    pub const fn code(self) -> &'static str {
        match self {
            CoarseTag::Adj => "Adj",
            CoarseTag::Adv => "Adv",
            CoarseTag::C => "C",
            CoarseTag::N => "N",
            CoarseTag::V => "V",
            CoarseTag::X => "X",
        }
    }
}

impl fmt::Display for CoarseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One morphological reading of a token, as returned by the lexicon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct LexicalEntry {
    pub gender: Vec<String>,
    pub number: Vec<String>,
    pub case: Vec<String>,
}

impl LexicalEntry {
    pub fn new<S: Into<String>>(
        gender: impl IntoIterator<Item = S>,
        number: impl IntoIterator<Item = S>,
        case: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            gender: gender.into_iter().map(Into::into).collect(),
            number: number.into_iter().map(Into::into).collect(),
            case: case.into_iter().map(Into::into).collect(),
        }
    }
}
