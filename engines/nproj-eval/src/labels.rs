use nproj_graph::{GraphError, ParseGraph};
use nproj_protocol::{DependencyArc, FlatteningLabel, Token, TokenId, MARKER_SUFFIX};

use crate::EvalError;

pub const NO_HEAD: &str = "noHead";
pub const NO_LABEL: &str = "noLabel";
pub const WRONG_HEAD: &str = "wrongHead";
pub const WRONG_HEAD_WRONG_LABEL: &str = "wrongHeadWrongLabel";

/// Turns raw arc labels into the finer labels the scores are split by.
///
/// The bare flattening label is split by the coarse tags of head and
/// dependent (`Dep-nproj` becomes e.g. `DepNAdj-nproj`). Noun-adjective
/// labels are further split on whether the adjective follows its verb, or
/// has no verbal governor at all.
#[derive(Debug, Clone)]
pub struct LabelRefiner {
    flattening: FlatteningLabel,
    noun_adj: String,
    noun_adj_no_verb: String,
    noun_adj_post: String,
}

impl LabelRefiner {
    pub fn new(flattening: FlatteningLabel) -> Self {
        let base = flattening.base();
        let noun_adj = format!("{base}NAdj{MARKER_SUFFIX}");
        let noun_adj_no_verb = format!("{base}NAdj-noverb{MARKER_SUFFIX}");
        let noun_adj_post = format!("{base}NAdj-post{MARKER_SUFFIX}");
        Self {
            flattening,
            noun_adj,
            noun_adj_no_verb,
            noun_adj_post,
        }
    }

    /// The scoring label of `arc`, the governing non-projective arc of a
    /// token in `graph`; `proj_arc` is its projective counterpart.
    pub fn refine(
        &self,
        graph: &ParseGraph,
        arc: Option<&DependencyArc>,
        proj_arc: Option<&DependencyArc>,
    ) -> Result<String, EvalError> {
        let Some(arc) = arc else {
            return Ok(NO_HEAD.to_string());
        };

        let mut label = if arc.label.is_empty() {
            NO_LABEL.to_string()
        } else {
            arc.label.clone()
        };

        if self.flattening.matches(&label) {
            let head = token(graph, arc.head)?.tag.coarse()?;
            let dependent = token(graph, arc.dependent)?.tag.coarse()?;
            label = format!(
                "{}{}{}{}",
                self.flattening.base(),
                head,
                dependent,
                MARKER_SUFFIX
            );
        }

        if label == self.noun_adj {
            if let Some(proj_arc) = proj_arc {
                match graph.governing_verb(proj_arc.head) {
                    None => label = self.noun_adj_no_verb.clone(),
                    Some(verb) if verb < proj_arc.dependent => label = self.noun_adj_post.clone(),
                    Some(_) => {}
                }
            }
        }

        // An unlabelled attachment to the root is a missing head
        if label == NO_LABEL && arc.head.is_root() {
            label = NO_HEAD.to_string();
        }

        Ok(label)
    }
}

fn token(graph: &ParseGraph, id: TokenId) -> Result<&Token, EvalError> {
    graph
        .token(id)
        .ok_or(EvalError::Graph(GraphError::UnknownToken(id)))
}
