//! The filter/sort/paginate pipeline.
//!
//! A [`Session`] owns the loaded catalog and the state of the current query.
//! Every public method is one user event and runs to completion before the
//! next; nothing here suspends or shares state across threads.
//!
//! # Lifecycle
//!
//! - [`Session::run_query`] replaces the query state wholesale and resets the
//!   visible window to one page.
//! - [`Session::set_sort`] reorders the existing result only.
//! - [`Session::load_more`] grows the visible window by one page.
//! - [`Session::set_source`] and [`Session::set_status`] re-run the last query.

use serde::Serialize;
use shelf_seeker::{ParseError, Query, SortMode};
use tracing::debug;

use crate::dataset::{Catalog, TaggedRecord};
use crate::loader::Loaded;
use crate::readset::{ReadSet, StatusFilter};
use crate::source::{SourceFilter, SourceTag};
use crate::view::View;

/// Number of results revealed per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Session settings fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub page_size: usize,
    /// Initial sort mode.
    pub sort: SortMode,
    /// Enables the read/unread status filter and read badges.
    pub track_reads: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortMode::default(),
            track_reads: false,
        }
    }
}

/// Matched records from one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: SourceTag,
    pub count: usize,
}

/// Summary of a query run.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub total: usize,
    pub breakdown: Vec<SourceCount>,
    pub error: Option<ParseError>,
}

impl QueryOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
struct QueryState {
    text: String,
    source: SourceFilter,
    status: StatusFilter,
    filtered: Vec<TaggedRecord>,
    visible_count: usize,
    has_queried: bool,
    error: Option<ParseError>,
    breakdown: Vec<SourceCount>,
}

/// Browsing state over a loaded catalog.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    read_set: ReadSet,
    page_size: usize,
    sort: SortMode,
    track_reads: bool,
    state: QueryState,
}

impl Session {
    pub fn new(catalog: Catalog, read_set: ReadSet, config: SessionConfig) -> Self {
        Session {
            catalog,
            read_set,
            page_size: config.page_size.max(1),
            sort: config.sort,
            track_reads: config.track_reads,
            state: QueryState::default(),
        }
    }

    pub fn from_loaded(loaded: Loaded, config: SessionConfig) -> Self {
        Session::new(loaded.catalog, loaded.read_set, config)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Parses `text`, filters the pool and sorts the result.
    ///
    /// A parse error leaves an empty result with a zero window and the error
    /// recorded; no filtering happens.
    pub fn run_query(
        &mut self,
        text: &str,
        source: SourceFilter,
        status: StatusFilter,
    ) -> QueryOutcome {
        let mut state = QueryState {
            text: text.trim().to_string(),
            source,
            status,
            has_queried: true,
            ..QueryState::default()
        };

        match Query::parse(&state.text) {
            Err(err) => {
                debug!(query = %state.text, error = %err, "query rejected");
                state.error = Some(err);
            }
            Ok(query) => {
                let mut filtered = self.catalog.select_pool(source);
                query.filter_mut(&mut filtered);
                if self.track_reads && status != StatusFilter::All {
                    filtered.retain(|entry| status.admits(self.read_set.has_read(entry)));
                }
                self.sort.sort(&mut filtered);

                state.breakdown = breakdown(source, &filtered);
                state.visible_count = self.page_size;
                state.filtered = filtered;
                debug!(
                    query = %state.text,
                    conditions = query.conditions().len(),
                    matched = state.filtered.len(),
                    "query applied"
                );
            }
        }

        self.state = state;
        self.outcome()
    }

    /// Re-runs the last query with its stored filters.
    pub fn rerun(&mut self) -> QueryOutcome {
        let text = std::mem::take(&mut self.state.text);
        self.run_query(&text, self.state.source, self.state.status)
    }

    /// Switches the source filter and re-runs the last query, if any.
    pub fn set_source(&mut self, source: SourceFilter) -> QueryOutcome {
        self.state.source = source;
        self.rerun_if_queried()
    }

    /// Switches the status filter and re-runs the last query, if any.
    pub fn set_status(&mut self, status: StatusFilter) -> QueryOutcome {
        self.state.status = status;
        self.rerun_if_queried()
    }

    fn rerun_if_queried(&mut self) -> QueryOutcome {
        if self.state.has_queried {
            self.rerun()
        } else {
            self.outcome()
        }
    }

    /// Changes the sort mode and reorders the current result in place.
    ///
    /// Membership and the visible window are untouched.
    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        if self.state.has_queried {
            sort.sort(&mut self.state.filtered);
        }
    }

    /// Reveals one more page. Returns the new visible count.
    ///
    /// The count is not clamped to the result length; [`Session::view`] and
    /// [`Session::visible`] clamp when reading.
    pub fn load_more(&mut self) -> usize {
        self.state.visible_count += self.page_size;
        self.state.visible_count
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn read_set(&self) -> &ReadSet {
        &self.read_set
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn tracks_reads(&self) -> bool {
        self.track_reads
    }

    pub fn query_text(&self) -> &str {
        &self.state.text
    }

    pub fn source(&self) -> SourceFilter {
        self.state.source
    }

    pub fn status(&self) -> StatusFilter {
        self.state.status
    }

    pub fn has_queried(&self) -> bool {
        self.state.has_queried
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.state.error.as_ref()
    }

    /// The full filtered and sorted result.
    pub fn filtered(&self) -> &[TaggedRecord] {
        &self.state.filtered
    }

    pub fn visible_count(&self) -> usize {
        self.state.visible_count
    }

    /// The visible window, clamped to the result length.
    pub fn visible(&self) -> &[TaggedRecord] {
        let end = self.state.visible_count.min(self.state.filtered.len());
        &self.state.filtered[..end]
    }

    pub fn has_more(&self) -> bool {
        self.state.visible_count < self.state.filtered.len()
    }

    /// Summary of the current query state.
    pub fn outcome(&self) -> QueryOutcome {
        QueryOutcome {
            total: self.state.filtered.len(),
            breakdown: self.state.breakdown.clone(),
            error: self.state.error.clone(),
        }
    }

    /// Snapshot for the presenter.
    pub fn view(&self) -> View<'_> {
        let message = self.state.error.as_ref().map(ToString::to_string);
        View::compose(
            self.state.has_queried,
            message.as_deref(),
            &self.state.filtered,
            self.state.visible_count,
            &self.state.breakdown,
            self.track_reads.then_some(&self.read_set),
        )
    }
}

fn breakdown(source: SourceFilter, filtered: &[TaggedRecord]) -> Vec<SourceCount> {
    source
        .sources()
        .map(|tag| SourceCount {
            source: tag,
            count: filtered.iter().filter(|entry| entry.source == tag).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_source(
                SourceTag::Douban,
                vec![
                    Record::new("A", 4.9, 120_000).with_id(1),
                    Record::new("B", 3.2, 50).with_id(2),
                    Record::new("C", 4.9, 500_000).with_id(3),
                ],
            )
            .with_source(
                SourceTag::Goodreads,
                vec![Record::new("G", 4.1, 900).with_id("g1")],
            )
    }

    fn titles(entries: &[TaggedRecord]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    fn session() -> Session {
        Session::new(catalog(), ReadSet::default(), SessionConfig::default())
    }

    #[test]
    fn fresh_session_shows_prompt() {
        let session = session();
        assert!(!session.has_queried());
        assert_eq!(session.view(), View::Prompt);
        assert_eq!(session.visible_count(), 0);
    }

    #[test]
    fn query_filters_and_sorts() {
        let mut session = session();
        let outcome = session.run_query("rating:>=4", SourceFilter::All, StatusFilter::All);
        assert!(outcome.is_ok());
        assert_eq!(outcome.total, 3);
        assert_eq!(titles(session.filtered()), vec!["C", "A", "G"]);
        assert_eq!(session.visible_count(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn breakdown_counts_each_admitted_source() {
        let mut session = session();
        let outcome = session.run_query("rating:>=4", SourceFilter::All, StatusFilter::All);
        assert_eq!(
            outcome.breakdown,
            vec![
                SourceCount {
                    source: SourceTag::Douban,
                    count: 2
                },
                SourceCount {
                    source: SourceTag::Goodreads,
                    count: 1
                },
            ]
        );

        let outcome = session.set_source(SourceFilter::Only(SourceTag::Goodreads));
        assert_eq!(outcome.breakdown.len(), 1);
        assert_eq!(outcome.total, 1);
    }

    #[test]
    fn parse_error_resets_result() {
        let mut session = session();
        session.run_query("", SourceFilter::All, StatusFilter::All);
        assert_eq!(session.filtered().len(), 4);

        let outcome = session.run_query("rating>5", SourceFilter::All, StatusFilter::All);
        assert_eq!(
            outcome.error,
            Some(ParseError::Malformed {
                token: "rating>5".into()
            })
        );
        assert_eq!(outcome.total, 0);
        assert_eq!(session.visible_count(), 0);
        assert!(session.has_queried());
        assert_eq!(
            session.view(),
            View::QueryFailed {
                message: "Cannot parse: rating>5".into()
            }
        );
    }

    #[test]
    fn set_sort_reorders_without_refiltering() {
        let mut session = session();
        session.run_query("", SourceFilter::All, StatusFilter::All);
        session.load_more();
        let before = session.filtered().len();
        let visible = session.visible_count();

        session.set_sort(SortMode::Count);
        assert_eq!(titles(session.filtered()), vec!["C", "A", "G", "B"]);
        assert_eq!(session.filtered().len(), before);
        assert_eq!(session.visible_count(), visible);

        session.set_sort(SortMode::Count);
        assert_eq!(titles(session.filtered()), vec!["C", "A", "G", "B"]);
    }

    #[test]
    fn set_sort_before_query_only_stores_mode() {
        let mut session = session();
        session.set_sort(SortMode::Unsorted);
        assert!(session.filtered().is_empty());
        session.run_query("", SourceFilter::All, StatusFilter::All);
        assert_eq!(titles(session.filtered()), vec!["A", "B", "C", "G"]);
    }

    #[test]
    fn status_filter_needs_tracking() {
        let read_set: ReadSet = [crate::record::RecordId::from("1")].into_iter().collect();

        let mut untracked = Session::new(catalog(), read_set.clone(), SessionConfig::default());
        let outcome = untracked.run_query("", SourceFilter::All, StatusFilter::Read);
        assert_eq!(outcome.total, 4);

        let config = SessionConfig {
            track_reads: true,
            ..SessionConfig::default()
        };
        let mut tracked = Session::new(catalog(), read_set, config);
        tracked.run_query("", SourceFilter::All, StatusFilter::Read);
        assert_eq!(titles(tracked.filtered()), vec!["A"]);

        tracked.set_status(StatusFilter::Unread);
        assert_eq!(titles(tracked.filtered()), vec!["C", "G", "B"]);
        assert_eq!(tracked.view().cards()[0].read, Some(false));

        tracked.set_status(StatusFilter::All);
        assert_eq!(tracked.filtered().len(), 4);
    }

    #[test]
    fn filters_before_first_query_are_stored() {
        let mut session = session();
        let outcome = session.set_source(SourceFilter::Only(SourceTag::Goodreads));
        assert_eq!(outcome.total, 0);
        assert!(!session.has_queried());
        assert_eq!(session.view(), View::Prompt);

        session.run_query("", session.source(), session.status());
        assert_eq!(titles(session.filtered()), vec!["G"]);
    }

    #[test]
    fn rerun_keeps_query_text() {
        let mut session = session();
        session.run_query("  title:a ", SourceFilter::All, StatusFilter::All);
        assert_eq!(session.query_text(), "title:a");
        let outcome = session.rerun();
        assert_eq!(outcome.total, 1);
        assert_eq!(session.query_text(), "title:a");
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        let config = SessionConfig {
            page_size: 0,
            ..SessionConfig::default()
        };
        let session = Session::new(catalog(), ReadSet::default(), config);
        assert_eq!(session.page_size(), 1);
    }
}
