use nproj_graph::ParseGraph;
use nproj_protocol::{DependencyArc, FlatteningLabel, TokenId, MARKER_SUFFIX};
use tracing::{debug, info};

use crate::confusion::{ConfusionTable, ScoreReport};
use crate::labels::{LabelRefiner, NO_HEAD, WRONG_HEAD, WRONG_HEAD_WRONG_LABEL};
use crate::EvalError;

/// Scores the non-projective attachments of guessed parses against gold
/// parses, split by head and dependent category.
#[derive(Debug, Clone)]
pub struct NonProjectiveEvaluator {
    refiner: LabelRefiner,
    table: ConfusionTable,
}

/// A gold token and the guessed token at the same offset, if any.
type Alignment = Vec<(TokenId, Option<TokenId>)>;

impl NonProjectiveEvaluator {
    pub fn new(flattening: FlatteningLabel) -> Self {
        Self {
            refiner: LabelRefiner::new(flattening),
            table: ConfusionTable::new(),
        }
    }

    pub fn table(&self) -> &ConfusionTable {
        &self.table
    }

    /// Fold another evaluator's counts into this one.
    pub fn merge(&mut self, other: &NonProjectiveEvaluator) {
        self.table.merge(&other.table);
    }

    /// Score one sentence against the best guess.
    ///
    /// A sentence whose tokens cannot be aligned with the guess, or that
    /// fails for any other reason, adds nothing to the table.
    pub fn score(&mut self, gold: &ParseGraph, guesses: &[ParseGraph]) -> Result<(), EvalError> {
        let guess = guesses.first().ok_or(EvalError::NoGuess)?;
        let alignment = align(gold, guess)?;

        let mut sentence = ConfusionTable::new();
        for (gold_id, guess_id) in alignment {
            self.score_token(gold, guess, gold_id, guess_id, &mut sentence)?;
        }

        self.table.merge(&sentence);
        Ok(())
    }

    pub fn finalize(&self) -> ScoreReport {
        let report = self.table.report();
        info!("F-score: {}", report.total_f_score);
        report
    }

    fn score_token(
        &self,
        gold: &ParseGraph,
        guess: &ParseGraph,
        gold_id: TokenId,
        guess_id: Option<TokenId>,
        sentence: &mut ConfusionTable,
    ) -> Result<(), EvalError> {
        let gold_arc = gold.non_projective().governing(gold_id);
        let gold_proj = gold.projective().governing(gold_id);
        let (guess_arc, guess_proj) = match guess_id {
            Some(id) => (
                guess.non_projective().governing(id),
                guess.projective().governing(id),
            ),
            None => (None, None),
        };

        let raw_gold = gold_arc.map_or(NO_HEAD, |arc| arc.label.as_str());
        let raw_guess = guess_arc.map_or(NO_HEAD, |arc| arc.label.as_str());
        if !raw_gold.ends_with(MARKER_SUFFIX) && !raw_guess.ends_with(MARKER_SUFFIX) {
            return Ok(());
        }

        let gold_label = self.refiner.refine(gold, gold_arc, gold_proj)?;
        let guess_label = self.refiner.refine(guess, guess_arc, guess_proj)?;
        info!(
            "Real {}. Non-proj: {}. Proj: {}",
            gold_label,
            describe(gold_arc),
            describe(gold_proj)
        );
        info!(
            "Gues {}. Non-proj: {}. Proj: {}",
            guess_label,
            describe(guess_arc),
            describe(guess_proj)
        );

        let column = match (gold_arc, guess_arc) {
            (Some(gold_arc), Some(guess_arc)) => {
                if same_head(gold, gold_arc, guess, guess_arc) {
                    guess_label
                } else if guess_label == NO_HEAD {
                    NO_HEAD.to_string()
                } else if gold_arc.label == guess_arc.label {
                    WRONG_HEAD.to_string()
                } else {
                    WRONG_HEAD_WRONG_LABEL.to_string()
                }
            }
            _ => guess_label,
        };

        debug!("increment ({}, {})", gold_label, column);
        sentence.increment(gold_label, column);
        Ok(())
    }
}

/// Pair every gold token with the first guessed token sharing its start
/// offset and emptiness.
fn align(gold: &ParseGraph, guess: &ParseGraph) -> Result<Alignment, EvalError> {
    let mut alignment = Vec::with_capacity(gold.words().len());
    let mut mismatched = 0;

    for token in gold.words() {
        let found = guess
            .words()
            .iter()
            .find(|candidate| candidate.start == token.start && candidate.empty == token.empty)
            .map(|candidate| candidate.id);
        if found.is_none() {
            info!("Mismatched token: {}, index {}", token.text, token.id);
            mismatched += 1;
        }
        alignment.push((token.id, found));
    }

    // The ratio counts the root along with the words
    let total = gold.words().len();
    if mismatched * 2 > total + 1 {
        return Err(EvalError::Misaligned { mismatched, total });
    }
    Ok(alignment)
}

/// Heads are compared by surface offset; the root only matches the root.
fn same_head(
    gold: &ParseGraph,
    gold_arc: &DependencyArc,
    guess: &ParseGraph,
    guess_arc: &DependencyArc,
) -> bool {
    let key = |graph: &ParseGraph, id: TokenId| graph.token(id).map(|t| (t.is_root(), t.start));
    key(gold, gold_arc.head) == key(guess, guess_arc.head)
}

fn describe(arc: Option<&DependencyArc>) -> String {
    arc.map_or_else(|| "none".to_string(), ToString::to_string)
}
