//! Gated scan over a window of token positions.

/// Yields the positions of a window that come after its zone boundary.
///
/// The scan starts in [`Phase::Seeking`] and discards positions until one
/// satisfies `is_boundary`. That position is discarded as well, and every
/// following position is yielded in [`Phase::Searching`].
pub struct ZoneScan<I, F> {
    positions: I,
    is_boundary: F,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeking,
    Searching,
}

impl<I, F> ZoneScan<I, F> {
    pub fn new(positions: I, is_boundary: F) -> Self {
        Self {
            positions,
            is_boundary,
            phase: Phase::Seeking,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl<I, F, T> Iterator for ZoneScan<I, F>
where
    I: Iterator<Item = T>,
    F: FnMut(&T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let position = self.positions.next()?;
            match self.phase {
                Phase::Seeking => {
                    if (self.is_boundary)(&position) {
                        self.phase = Phase::Searching;
                    }
                }
                Phase::Searching => return Some(position),
            }
        }
    }
}
