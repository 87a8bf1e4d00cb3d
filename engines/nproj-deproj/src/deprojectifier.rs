use nproj_graph::ParseGraph;
use nproj_morph::compatible;
use nproj_protocol::{DependencyArc, FlatteningLabel, PosTag, Token, TokenId};
use tracing::{debug, info, warn};

use crate::histogram::Histogram;
use crate::scan::ZoneScan;

/// Governing labels that rule a noun out as a head.
pub const NOMINAL_EXCLUDED: [&str; 2] = ["ComplPrep", "DepEx_Suj"];

/// Governing labels that let a pronoun act as a head.
pub const PRONOMINAL_ELIGIBLE: [&str; 4] = ["Suj", "ObjDir", "Suj-nproj", "ObjDir-nproj"];

pub const KEY_VALID: &str = "valid";
pub const KEY_NO_CANDIDATES: &str = "no candidates";
pub const KEY_NO_VERB: &str = "No verb gov";
pub const KEY_AFTER_VERB: &str = "Dep after verb";

/// Where a candidate head was found, relative to the adjective and verb.
/// The declaration order is also the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Window {
    BetweenAdjAndVerb,
    BeforeAdj,
    AfterVerb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub token: TokenId,
    pub window: Window,
}

/// Recovers the nominal head of adjectives and numerals that were attached
/// to a verb during projectification, when they precede that verb.
#[derive(Debug, Clone)]
pub struct Deprojectifier {
    label: FlatteningLabel,
    histogram: Histogram,
}

impl Deprojectifier {
    pub fn new(label: FlatteningLabel) -> Self {
        Self {
            label,
            histogram: Histogram::new(),
        }
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Fill the non-projective layer of `graph`.
    ///
    /// Every projective arc is copied over, then each arc carrying the
    /// flattening label is re-attached to its best nominal head, or to its
    /// projective head when none is found.
    pub fn recover(&mut self, graph: &mut ParseGraph) {
        let projective: Vec<DependencyArc> = graph.projective().iter().cloned().collect();

        for arc in &projective {
            if let Err(err) = graph.non_projective_mut().insert(arc.clone()) {
                warn!("could not copy {}: {}", arc, err);
            }
        }

        let flattened: Vec<&DependencyArc> = projective
            .iter()
            .filter(|arc| self.label.matches(&arc.label))
            .collect();
        for arc in flattened {
            info!("{}", arc);
            let head = self.resolve_head(graph, arc);
            commit(graph, head, arc);
        }
    }

    /// Log the outcome counts and hand them back.
    pub fn finish(&self) -> &Histogram {
        info!("Counts");
        for (key, count) in self.histogram.iter() {
            info!("{}: {}", key, count);
        }
        &self.histogram
    }

    fn resolve_head(&mut self, graph: &ParseGraph, arc: &DependencyArc) -> TokenId {
        let Some(adj) = graph.token(arc.dependent) else {
            return arc.head;
        };

        let mut valid = true;
        if !matches!(adj.tag, PosTag::Adjective | PosTag::Numeral) {
            debug!("{} dep is {}, expected A or Num", arc.label, adj.tag);
            self.histogram.increment(format!("Dep {}", adj.tag.code()));
            valid = false;
        }

        let verb = graph.governing_verb(arc.head);
        if verb.is_none() {
            debug!("{} verbal head not found", arc.label);
            self.histogram.increment(KEY_NO_VERB);
            valid = false;
        }

        let verb = match verb {
            Some(verb) if valid => verb,
            _ => return arc.head,
        };

        if adj.id > verb {
            info!("{} dep to the right of head, expected left", arc.label);
            self.histogram.increment(KEY_AFTER_VERB);
            return arc.head;
        }

        let candidates = find_candidates(graph, adj, verb);
        match nearest(adj.id, &candidates) {
            Some(best) => {
                debug!("chose {} from {:?}", best.token, best.window);
                self.histogram.increment(KEY_VALID);
                best.token
            }
            None => {
                self.histogram.increment(KEY_NO_CANDIDATES);
                arc.head
            }
        }
    }
}

/// Search the three windows around `adj` and `verb`, at most one candidate
/// per window, in tie-break order.
pub fn find_candidates(graph: &ParseGraph, adj: &Token, verb: TokenId) -> Vec<Candidate> {
    let verbal_dependent = |id: &TokenId| graph.projective().head_of(*id) == Some(verb);
    let accept = |id: &TokenId| accepts(graph, *id, adj);
    let end = graph.len() as u32;

    debug!("finding noun between adjective and verb");
    let between = ZoneScan::new((adj.id.0 + 1..verb.0).map(TokenId), verbal_dependent)
        .find(accept)
        .map(|token| Candidate {
            token,
            window: Window::BetweenAdjAndVerb,
        });

    debug!("finding noun before adjective");
    let before = ZoneScan::new((1..adj.id.0).rev().map(TokenId), verbal_dependent)
        .find(accept)
        .map(|token| Candidate {
            token,
            window: Window::BeforeAdj,
        });

    debug!("finding noun after verb");
    let after = (verb.0 + 1..end)
        .map(TokenId)
        .find(accept)
        .map(|token| Candidate {
            token,
            window: Window::AfterVerb,
        });

    [between, before, after].into_iter().flatten().collect()
}

/// Nouns not introduced by an excluded relation, and subject or object
/// pronouns, when they agree with the adjective.
fn accepts(graph: &ParseGraph, id: TokenId, adj: &Token) -> bool {
    let Some(token) = graph.token(id) else {
        return false;
    };
    debug!("testing {}", token);

    let label = graph
        .projective()
        .governing(id)
        .map(|arc| arc.label.as_str());
    let eligible = match token.tag {
        PosTag::Noun => !label.map_or(false, |l| NOMINAL_EXCLUDED.contains(&l)),
        PosTag::Pronoun => label.map_or(false, |l| PRONOMINAL_ELIGIBLE.contains(&l)),
        _ => false,
    };

    eligible && compatible(token, adj)
}

/// The closest candidate; the earlier window wins a tie.
pub fn nearest(adj: TokenId, candidates: &[Candidate]) -> Option<Candidate> {
    candidates
        .iter()
        .copied()
        .min_by_key(|candidate| (candidate.token.distance(adj), candidate.window))
}

fn commit(graph: &mut ParseGraph, head: TokenId, arc: &DependencyArc) {
    let layer = graph.non_projective_mut();
    if layer.remove(arc.dependent).is_none() {
        warn!("no non-projective arc found for {}", arc.dependent);
    }

    let recovered = DependencyArc::new(head, arc.dependent, arc.label.clone());
    if let Err(err) = layer.insert(recovered) {
        warn!("could not attach {} to {}: {}", arc.dependent, head, err);
    }
}
