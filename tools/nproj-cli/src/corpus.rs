use std::path::Path;

use anyhow::Context;
use nproj_graph::{GraphError, ParseGraph};
use nproj_protocol::{DependencyArc, LexicalEntry, PosTag, Token, TokenId};
use serde::{Deserialize, Serialize};

/// JSON form of a parsed corpus. Token positions are implied by order,
/// starting at 1; the root is never listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub sentences: Vec<SentenceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceRecord {
    #[serde(default)]
    pub text: String,
    pub tokens: Vec<TokenRecord>,
    pub arcs: Vec<DependencyArc>,
    #[serde(default)]
    pub non_projective_arcs: Vec<DependencyArc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub text: String,
    pub start: u32,
    pub end: u32,
    #[serde(default)]
    pub empty: bool,
    pub tag: PosTag,
    #[serde(default)]
    pub entries: Vec<LexicalEntry>,
}

impl SentenceRecord {
    pub fn to_graph(&self) -> Result<ParseGraph, GraphError> {
        let words = self
            .tokens
            .iter()
            .enumerate()
            .map(|(i, token)| Token {
                id: TokenId(i as u32 + 1),
                text: token.text.clone(),
                start: token.start,
                end: token.end,
                empty: token.empty,
                tag: token.tag,
                entries: token.entries.clone(),
            })
            .collect();

        ParseGraph::new(words, self.arcs.clone())?.with_non_projective(self.non_projective_arcs.clone())
    }

    /// Replace the stored non-projective arcs with those of `graph`.
    pub fn with_layer(mut self, graph: &ParseGraph) -> Self {
        self.non_projective_arcs = graph.non_projective().iter().cloned().collect();
        self
    }
}

pub async fn read_corpus(path: &Path) -> anyhow::Result<Corpus> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("writing {}", path.display()))
}
