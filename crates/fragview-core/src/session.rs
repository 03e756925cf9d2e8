use crate::error::{FragviewError, Result};
use crate::models::{Direction, Fragment, Line, SearchOptions};

/// Marker distinguishing the current search session from superseded ones.
/// Incremented by every wholesale replacement; in-flight responses carry the
/// generation they were issued under so late arrivals can be discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fragments produced by the last completed search, together with the
/// query and options that produced them. Replaced wholesale on every search;
/// individual fragments are mutated in place as context loads.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    pub query: String,
    pub options: SearchOptions,
    pub fragments: Vec<Fragment>,
}

/// Owns the active [`SearchSession`] and grows fragment context windows on
/// demand. The store performs no de-duplication: not re-requesting an
/// already-covered range is the loading caller's obligation.
#[derive(Debug, Default)]
pub struct FragmentStore {
    generation: Generation,
    session: SearchSession,
}

impl FragmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.session.fragments
    }

    #[must_use]
    pub fn options(&self) -> SearchOptions {
        self.session.options
    }

    /// Atomically replace the session with the results of a new search.
    /// All previously rendered views are invalidated; the returned generation
    /// identifies the new session.
    pub fn replace_all(
        &mut self,
        query: impl Into<String>,
        options: SearchOptions,
        fragments: Vec<Fragment>,
    ) -> Generation {
        self.session = SearchSession {
            query: query.into(),
            options,
            fragments,
        };
        self.generation = self.generation.next();
        self.generation
    }

    pub fn fragment(&self, index: usize) -> Result<&Fragment> {
        self.session
            .fragments
            .get(index)
            .ok_or(FragviewError::IndexOutOfRange {
                index,
                len: self.session.fragments.len(),
            })
    }

    /// Merge `new_lines` into the fragment at `index`. Previous batches sit
    /// strictly before the existing window and are prepended; next batches
    /// sit strictly after and are appended, so increasing-offset order is
    /// preserved without reordering. An empty batch is a no-op. A failed call
    /// leaves the fragment unmodified.
    pub fn extend(
        &mut self,
        index: usize,
        direction: Direction,
        new_lines: Vec<Line>,
    ) -> Result<usize> {
        let len = self.session.fragments.len();
        let fragment = self
            .session
            .fragments
            .get_mut(index)
            .ok_or(FragviewError::IndexOutOfRange { index, len })?;
        if new_lines.is_empty() {
            return Ok(0);
        }
        let added = new_lines.len();
        match direction {
            Direction::Previous => {
                fragment.previous.splice(0..0, new_lines);
            }
            Direction::Next => {
                fragment.next.extend(new_lines);
            }
        }
        Ok(added)
    }

    /// Derive the anchor byte offset for the next context request in
    /// `direction`. With an empty window the matched line's own boundary
    /// anchors the request, so a fragment with no context yet can still grow.
    pub fn load_anchor(&self, index: usize, direction: Direction) -> Result<usize> {
        let fragment = self.fragment(index)?;
        let anchor = match direction {
            Direction::Previous => fragment
                .previous
                .first()
                .map_or(fragment.matched.line.start_index, |line| line.start_index),
            Direction::Next => fragment
                .next
                .last()
                .map_or(fragment.matched.line.end_index + 1, |line| {
                    line.end_index + 1
                }),
        };
        Ok(anchor)
    }
}
