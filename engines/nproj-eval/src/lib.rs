pub mod confusion;
pub mod evaluator;
pub mod labels;

use nproj_graph::GraphError;
use nproj_protocol::TagError;
use thiserror::Error;

pub use confusion::{ConfusionTable, LabelScore, ScoreReport};
pub use evaluator::NonProjectiveEvaluator;
pub use labels::{LabelRefiner, NO_HEAD, NO_LABEL, WRONG_HEAD, WRONG_HEAD_WRONG_LABEL};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no guessed parse to compare against")]
    NoGuess,
    #[error("too many mismatched tokens in sentence: {mismatched} of {total}")]
    Misaligned { mismatched: usize, total: usize },
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nproj_graph::ParseGraph;
    use nproj_protocol::{DependencyArc, FlatteningLabel, PosTag, Token, TokenId};

    type Arcs<'a> = &'a [(u32, u32, &'a str)];

    /// Tokens given as (start offset, empty flag, tag), numbered from 1.
    fn build(tokens: &[(u32, bool, PosTag)], proj: Arcs, nproj: Arcs) -> ParseGraph {
        let words = tokens
            .iter()
            .enumerate()
            .map(|(i, (start, empty, tag))| {
                let id = i as u32 + 1;
                Token {
                    id: TokenId(id),
                    text: format!("w{id}"),
                    start: *start,
                    end: *start + 5,
                    empty: *empty,
                    tag: *tag,
                    entries: vec![],
                }
            })
            .collect();
        ParseGraph::new(words, to_arcs(proj))
            .and_then(|graph| graph.with_non_projective(to_arcs(nproj)))
            .unwrap()
    }

    fn graph_at(offset: u32, tags: &[PosTag], proj: Arcs, nproj: Arcs) -> ParseGraph {
        let tokens: Vec<_> = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| ((i as u32 + 1) * 10 + offset, false, *tag))
            .collect();
        build(&tokens, proj, nproj)
    }

    fn to_arcs(arcs: Arcs) -> Vec<DependencyArc> {
        arcs.iter()
            .map(|(h, d, l)| DependencyArc::new(TokenId(*h), TokenId(*d), *l))
            .collect()
    }

    fn graph(tags: &[PosTag], proj: Arcs, nproj: Arcs) -> ParseGraph {
        graph_at(0, tags, proj, nproj)
    }

    fn evaluator() -> NonProjectiveEvaluator {
        NonProjectiveEvaluator::new(FlatteningLabel::new("Dep-nproj").unwrap())
    }

    use PosTag::{Adjective as A, MainVerb as V, Noun as N, Residual as X};

    /// "A(1) V(2) N(3)" with the adjective moved to the noun.
    fn adjective_before_verb(nproj_head: u32, label: &str) -> ParseGraph {
        graph(
            &[A, V, N],
            &[(2, 1, "Dep-nproj"), (0, 2, "Root"), (2, 3, "ObjDir")],
            &[(nproj_head, 1, label), (0, 2, "Root"), (2, 3, "ObjDir")],
        )
    }

    #[test]
    fn test_exact_match_lands_on_diagonal() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        let guess = adjective_before_verb(3, "Dep-nproj");
        let mut eval = evaluator();
        eval.score(&gold, &[guess]).unwrap();

        assert_eq!(eval.table().count("DepNAdj-nproj", "DepNAdj-nproj"), 1);
        // Tokens without a non-projective label are not scored
        assert_eq!(eval.table().total(), 1);

        let report = eval.finalize();
        assert_eq!(report.total_f_score, 1.0);
        assert_eq!(report.row("DepNAdj-nproj").unwrap().support, 1);
    }

    #[test]
    fn test_missing_guess_arc_counts_as_no_head() {
        let gold = graph(
            &[N, V],
            &[(2, 1, "Dep-nproj"), (0, 2, "Root")],
            &[(2, 1, "Dep-nproj"), (0, 2, "Root")],
        );
        let guess = graph(&[N, V], &[(0, 2, "Root")], &[(0, 2, "Root")]);
        let mut eval = evaluator();
        eval.score(&gold, &[guess]).unwrap();

        assert_eq!(eval.table().count("DepVN-nproj", "noHead"), 1);
        assert_eq!(eval.table().total(), 1);
    }

    #[test]
    fn test_adjective_after_verb_is_post() {
        let gold = graph(
            &[N, V, A],
            &[(2, 1, "Suj"), (0, 2, "Root"), (2, 3, "Dep-nproj")],
            &[(2, 1, "Suj"), (0, 2, "Root"), (1, 3, "Dep-nproj")],
        );
        let mut eval = evaluator();
        eval.score(&gold, &[gold.clone()]).unwrap();
        assert_eq!(
            eval.table().count("DepNAdj-post-nproj", "DepNAdj-post-nproj"),
            1
        );
    }

    #[test]
    fn test_adjective_without_verb_is_noverb() {
        let gold = graph(
            &[A, N, N],
            &[(3, 1, "Dep-nproj"), (3, 2, "Dep"), (0, 3, "Root")],
            &[(2, 1, "Dep-nproj"), (3, 2, "Dep"), (0, 3, "Root")],
        );
        let mut eval = evaluator();
        eval.score(&gold, &[gold.clone()]).unwrap();
        assert_eq!(
            eval.table().count("DepNAdj-noverb-nproj", "DepNAdj-noverb-nproj"),
            1
        );
    }

    #[test]
    fn test_wrong_head_categories() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        let mut eval = evaluator();

        // Same label, wrong head
        eval.score(&gold, &[adjective_before_verb(2, "Dep-nproj")])
            .unwrap();
        // Wrong head and wrong label
        eval.score(&gold, &[adjective_before_verb(2, "Suj-nproj")])
            .unwrap();
        // Unlabelled root attachment
        eval.score(&gold, &[adjective_before_verb(0, "")]).unwrap();

        let table = eval.table();
        assert_eq!(table.count("DepNAdj-nproj", "wrongHead"), 1);
        assert_eq!(table.count("DepNAdj-nproj", "wrongHeadWrongLabel"), 1);
        assert_eq!(table.count("DepNAdj-nproj", "noHead"), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_same_head_wrong_label() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        let guess = adjective_before_verb(3, "Suj-nproj");
        let mut eval = evaluator();
        eval.score(&gold, &[guess]).unwrap();
        assert_eq!(eval.table().count("DepNAdj-nproj", "Suj-nproj"), 1);
    }

    #[test]
    fn test_misaligned_sentence_is_rejected() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        let shifted = graph_at(
            1,
            &[A, V, N],
            &[(2, 1, "Dep-nproj"), (0, 2, "Root"), (2, 3, "ObjDir")],
            &[(3, 1, "Dep-nproj"), (0, 2, "Root"), (2, 3, "ObjDir")],
        );
        let mut eval = evaluator();
        assert_eq!(
            eval.score(&gold, &[shifted]),
            Err(EvalError::Misaligned {
                mismatched: 3,
                total: 3
            })
        );
        assert!(eval.table().is_empty());
    }

    #[test]
    fn test_half_misaligned_sentence_is_scored() {
        // Two of three words moved: 2 of 4 tokens with the root is not a majority
        let gold = adjective_before_verb(3, "Dep-nproj");
        let guess = build(
            &[(10, false, A), (21, false, V), (31, false, N)],
            &[(2, 1, "Dep-nproj"), (0, 2, "Root"), (2, 3, "ObjDir")],
            &[(3, 1, "Dep-nproj"), (0, 2, "Root"), (2, 3, "ObjDir")],
        );
        let mut eval = evaluator();
        eval.score(&gold, &[guess]).unwrap();

        // The head moved with its offset, so it no longer matches
        assert_eq!(eval.table().count("DepNAdj-nproj", "wrongHead"), 1);
        assert_eq!(eval.table().total(), 1);
    }

    #[test]
    fn test_empty_token_only_aligns_with_empty() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        // An empty token shares the adjective's offset and comes first
        let guess = build(
            &[(10, true, X), (10, false, A), (20, false, V), (30, false, N)],
            &[
                (4, 1, "Dep"),
                (3, 2, "Dep-nproj"),
                (0, 3, "Root"),
                (3, 4, "ObjDir"),
            ],
            &[
                (4, 1, "Dep"),
                (4, 2, "Dep-nproj"),
                (0, 3, "Root"),
                (3, 4, "ObjDir"),
            ],
        );
        let mut eval = evaluator();
        eval.score(&gold, &[guess]).unwrap();

        assert_eq!(eval.table().count("DepNAdj-nproj", "DepNAdj-nproj"), 1);
        assert_eq!(eval.table().count("DepNAdj-nproj", "noHead"), 0);
        assert_eq!(eval.table().total(), 1);
    }

    #[test]
    fn test_root_head_has_no_category() {
        let gold = graph(&[A], &[(0, 1, "Dep-nproj")], &[(0, 1, "Dep-nproj")]);
        let mut eval = evaluator();
        assert_eq!(
            eval.score(&gold, &[gold.clone()]),
            Err(EvalError::Tag(TagError::NoCoarseCategory(PosTag::Root)))
        );
        assert!(eval.table().is_empty());
    }

    #[test]
    fn test_only_first_guess_counts() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        let mut eval = evaluator();
        eval.score(
            &gold,
            &[
                adjective_before_verb(3, "Dep-nproj"),
                adjective_before_verb(2, "Dep-nproj"),
            ],
        )
        .unwrap();
        assert_eq!(eval.table().count("DepNAdj-nproj", "DepNAdj-nproj"), 1);
        assert_eq!(eval.table().total(), 1);

        assert_eq!(eval.score(&gold, &[]), Err(EvalError::NoGuess));
    }

    #[test]
    fn test_merge_evaluators() {
        let gold = adjective_before_verb(3, "Dep-nproj");
        let mut left = evaluator();
        let mut right = evaluator();
        left.score(&gold, &[gold.clone()]).unwrap();
        right.score(&gold, &[adjective_before_verb(2, "Dep-nproj")])
            .unwrap();

        left.merge(&right);
        assert_eq!(left.table().total(), 2);
        assert_eq!(left.finalize().total_f_score, 0.5);
    }
}
