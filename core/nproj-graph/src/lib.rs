pub mod layer;

use nproj_protocol::{DependencyArc, PosTag, Token, TokenId};
use thiserror::Error;

pub use layer::ArcLayer;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("token at position {found} listed where position {expected} was expected")]
    TokenOutOfOrder { expected: TokenId, found: TokenId },
    #[error("arc refers to unknown token {0}")]
    UnknownToken(TokenId),
    #[error("the root token cannot be a dependent")]
    RootDependent,
    #[error("token {0} governs itself")]
    SelfLoop(TokenId),
    #[error("token {0} has more than one governing arc")]
    DuplicateGovernor(TokenId),
}

/// A parsed sentence: the token arena plus a projective and a
/// non-projective arc layer over it.
///
/// The projective layer is fixed when the graph is built. Only the
/// non-projective layer can be edited.
#[derive(Debug, Clone)]
pub struct ParseGraph {
    tokens: Vec<Token>,
    projective: ArcLayer,
    non_projective: ArcLayer,
}

impl ParseGraph {
    /// Build a graph from the sentence tokens (root excluded, positions
    /// 1..=n in order) and its projective arcs.
    pub fn new(words: Vec<Token>, arcs: Vec<DependencyArc>) -> Result<Self, GraphError> {
        let mut tokens = Vec::with_capacity(words.len() + 1);
        tokens.push(Token::root());
        for (i, token) in words.into_iter().enumerate() {
            let expected = TokenId(i as u32 + 1);
            if token.id != expected {
                return Err(GraphError::TokenOutOfOrder {
                    expected,
                    found: token.id,
                });
            }
            tokens.push(token);
        }

        let mut projective = ArcLayer::new(tokens.len());
        for arc in arcs {
            projective.insert_new(arc)?;
        }

        let non_projective = ArcLayer::new(tokens.len());
        Ok(Self {
            tokens,
            projective,
            non_projective,
        })
    }

    /// Attach an existing non-projective layer, e.g. for a gold parse.
    pub fn with_non_projective(mut self, arcs: Vec<DependencyArc>) -> Result<Self, GraphError> {
        for arc in arcs {
            self.non_projective.insert_new(arc)?;
        }
        Ok(self)
    }

    /// All tokens, root first.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens without the synthetic root.
    pub fn words(&self) -> &[Token] {
        &self.tokens[1..]
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    /// Number of tokens, root included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    pub fn projective(&self) -> &ArcLayer {
        &self.projective
    }

    pub fn non_projective(&self) -> &ArcLayer {
        &self.non_projective
    }

    pub fn non_projective_mut(&mut self) -> &mut ArcLayer {
        &mut self.non_projective
    }

    /// Walk up the projective heads starting at `from` itself.
    pub fn projective_chain(&self, from: TokenId) -> HeadChain<'_> {
        HeadChain {
            layer: &self.projective,
            next: Some(from),
            remaining: self.tokens.len(),
        }
    }

    /// The nearest main verb on the projective chain starting at `from`.
    pub fn governing_verb(&self, from: TokenId) -> Option<TokenId> {
        self.projective_chain(from).find(|id| {
            self.token(*id)
                .map_or(false, |token| token.tag == PosTag::MainVerb)
        })
    }
}

/// Iterator over a chain of heads. Stops when a token has no head, and
/// after as many steps as there are tokens so a malformed cycle ends too.
pub struct HeadChain<'a> {
    layer: &'a ArcLayer,
    next: Option<TokenId>,
    remaining: usize,
}

impl Iterator for HeadChain<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next?;
        self.next = self.layer.head_of(current);
        Some(current)
    }
}
