use nproj_protocol::{DependencyArc, TokenId};

use crate::GraphError;

/// One layer of dependency arcs, indexed by dependent.
/// A dependent has at most one governing arc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcLayer {
    arcs: Vec<Option<DependencyArc>>,
}

impl ArcLayer {
    /// An empty layer over `len` tokens (root included).
    pub fn new(len: usize) -> Self {
        Self {
            arcs: vec![None; len],
        }
    }

    pub fn governing(&self, dependent: TokenId) -> Option<&DependencyArc> {
        self.arcs.get(dependent.index()).and_then(Option::as_ref)
    }

    pub fn head_of(&self, dependent: TokenId) -> Option<TokenId> {
        self.governing(dependent).map(|arc| arc.head)
    }

    /// Arcs in dependent order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyArc> + '_ {
        self.arcs.iter().flatten()
    }

    /// Number of arcs in the layer.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.iter().all(Option::is_none)
    }

    /// Install `arc` as the governing arc of its dependent, returning the
    /// arc it replaced.
    pub fn insert(&mut self, arc: DependencyArc) -> Result<Option<DependencyArc>, GraphError> {
        self.check(&arc)?;
        let slot = &mut self.arcs[arc.dependent.index()];
        Ok(slot.replace(arc))
    }

    pub fn remove(&mut self, dependent: TokenId) -> Option<DependencyArc> {
        self.arcs.get_mut(dependent.index()).and_then(Option::take)
    }

    pub(crate) fn insert_new(&mut self, arc: DependencyArc) -> Result<(), GraphError> {
        let dependent = arc.dependent;
        match self.insert(arc)? {
            Some(_) => Err(GraphError::DuplicateGovernor(dependent)),
            None => Ok(()),
        }
    }

    fn check(&self, arc: &DependencyArc) -> Result<(), GraphError> {
        let len = self.arcs.len();
        for id in [arc.head, arc.dependent] {
            if id.index() >= len {
                return Err(GraphError::UnknownToken(id));
            }
        }
        if arc.dependent.is_root() {
            return Err(GraphError::RootDependent);
        }
        if arc.head == arc.dependent {
            return Err(GraphError::SelfLoop(arc.dependent));
        }
        Ok(())
    }
}
