use std::collections::HashSet;

use crate::error::{FragviewError, Result};
use crate::models::{Direction, Fragment, Line, SearchOptions, SearchToggle};
use crate::searcher::Searcher;
use crate::session::{FragmentStore, Generation};

/// Boundary to the external search collaborators: a full search resolving a
/// query plus options into fragments, and the context-line fetch endpoint.
pub trait FragmentFetch {
    fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Fragment>>;

    /// Lines ending before (`Previous`) or starting at or after (`Next`) the
    /// anchor offset. May return fewer than `limit` lines, or none, at the
    /// document boundary.
    fn load(&self, direction: Direction, anchor: usize, limit: usize) -> Result<Vec<Line>>;
}

impl<T: FragmentFetch + ?Sized> FragmentFetch for &T {
    fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Fragment>> {
        (**self).search(query, options)
    }

    fn load(&self, direction: Direction, anchor: usize, limit: usize) -> Result<Vec<Line>> {
        (**self).load(direction, anchor, limit)
    }
}

// The in-process searcher satisfies the fetch boundary directly, so the
// controller runs against either a remote server or a local corpus.
impl FragmentFetch for Searcher {
    fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Fragment>> {
        Searcher::search(self, query, options)
    }

    fn load(&self, direction: Direction, anchor: usize, limit: usize) -> Result<Vec<Line>> {
        Ok(match direction {
            Direction::Previous => self.previous_lines(anchor, limit),
            Direction::Next => self.next_lines(anchor, limit),
        })
    }
}

/// Handle for one outstanding context load. Carries the generation it was
/// issued under so a completion arriving after the session was replaced can
/// be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: Generation,
    pub fragment: usize,
    pub direction: Direction,
    pub anchor: usize,
    pub limit: usize,
}

/// Result of applying a completed context load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The batch was merged into the fragment's window.
    Applied { added: usize },
    /// The batch was merged but came back short: the document boundary was
    /// reached and the direction stops requesting.
    Boundary { added: usize },
    /// The ticket belongs to a superseded session; nothing was mutated.
    Stale,
}

/// Client-side session driver: owns the [`FragmentStore`], issues load
/// tickets, applies fetch completions, and tracks which fragment directions
/// have hit the document boundary.
///
/// At most one outstanding load per (fragment, direction) pair is assumed;
/// issuing a second ticket before the first completes leaves the second with
/// a stale anchor and is a caller error.
#[derive(Debug)]
pub struct SessionController<F> {
    fetcher: F,
    store: FragmentStore,
    options: SearchOptions,
    line_limit: usize,
    exhausted: HashSet<(usize, Direction)>,
}

impl<F: FragmentFetch> SessionController<F> {
    #[must_use]
    pub fn new(fetcher: F, line_limit: usize) -> Self {
        Self {
            fetcher,
            store: FragmentStore::new(),
            options: SearchOptions::default(),
            line_limit,
            exhausted: HashSet::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        self.store.fragments()
    }

    #[must_use]
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    pub fn toggle_option(&mut self, toggle: SearchToggle) -> SearchOptions {
        self.options.toggle(toggle);
        self.options
    }

    /// Run a search with the current options and replace the session with its
    /// results.
    pub fn search(&mut self, query: &str) -> Result<Generation> {
        let options = self.options;
        let fragments = self.fetcher.search(query, &options)?;
        Ok(self.apply_search(query, options, fragments))
    }

    /// Replace the session wholesale. Clears boundary tracking: the new
    /// fragments start with everything still loadable.
    pub fn apply_search(
        &mut self,
        query: impl Into<String>,
        options: SearchOptions,
        fragments: Vec<Fragment>,
    ) -> Generation {
        self.options = options;
        self.exhausted.clear();
        self.store.replace_all(query, options, fragments)
    }

    /// Issue a ticket for the next context load of fragment `index` in
    /// `direction`, or `None` once that direction has reached the document
    /// boundary.
    pub fn begin_load(&self, index: usize, direction: Direction) -> Result<Option<LoadTicket>> {
        if self.exhausted.contains(&(index, direction)) {
            return Ok(None);
        }
        let anchor = self.store.load_anchor(index, direction)?;
        Ok(Some(LoadTicket {
            generation: self.store.generation(),
            fragment: index,
            direction,
            anchor,
            limit: self.line_limit,
        }))
    }

    /// Apply a completed load. Stale tickets are dropped silently: a response
    /// belonging to a superseded session must never mutate the current one or
    /// surface as a user-visible failure.
    pub fn apply_load(&mut self, ticket: LoadTicket, lines: Vec<Line>) -> Result<LoadOutcome> {
        if let Err(err) = self.ensure_current(ticket.generation) {
            tracing::debug!(
                fragment = ticket.fragment,
                direction = %ticket.direction,
                "dropping stale load response: {err}"
            );
            return Ok(LoadOutcome::Stale);
        }
        let added = self.store.extend(ticket.fragment, ticket.direction, lines)?;
        if added < ticket.limit {
            self.exhausted.insert((ticket.fragment, ticket.direction));
            return Ok(LoadOutcome::Boundary { added });
        }
        Ok(LoadOutcome::Applied { added })
    }

    /// Fetch and merge one batch of context for fragment `index`. Exhausted
    /// directions short-circuit to an empty boundary outcome.
    pub fn load_more(&mut self, index: usize, direction: Direction) -> Result<LoadOutcome> {
        let Some(ticket) = self.begin_load(index, direction)? else {
            return Ok(LoadOutcome::Boundary { added: 0 });
        };
        let lines = self.fetcher.load(direction, ticket.anchor, ticket.limit)?;
        self.apply_load(ticket, lines)
    }

    fn ensure_current(&self, generation: Generation) -> Result<()> {
        let current = self.store.generation();
        if generation == current {
            Ok(())
        } else {
            Err(FragviewError::StaleResponse {
                response: generation.value(),
                current: current.value(),
            })
        }
    }
}

/// Blocking HTTP client for the search server's `/search` and `/load`
/// endpoints. Network and decoding failures propagate as generic fetch
/// errors; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::blocking::Client::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FragmentFetch for HttpFetcher {
    fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Fragment>> {
        let opts = serde_json::to_string(options)?;
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("opts", opts.as_str())])
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    fn load(&self, direction: Direction, anchor: usize, limit: usize) -> Result<Vec<Line>> {
        let response = self
            .client
            .get(format!("{}/load", self.base_url))
            .query(&[
                ("k", direction.as_str().to_string()),
                ("ix", anchor.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}
