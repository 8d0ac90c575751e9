//! Property tests for the session pipeline.

use proptest::prelude::*;
use shelf::{
    Catalog, ReadSet, Record, Session, SessionConfig, SortMode, SourceFilter, SourceTag,
    StatusFilter,
};

fn record() -> impl Strategy<Value = Record> {
    ("[a-z]{1,8}", 0.0f64..10.0, 0u64..1_000_000)
        .prop_map(|(title, rating, count)| Record::new(title, rating, count))
}

fn catalog() -> impl Strategy<Value = Catalog> {
    (
        prop::collection::vec(record(), 0..40),
        prop::collection::vec(record(), 0..40),
    )
        .prop_map(|(douban, goodreads)| {
            Catalog::new()
                .with_source(SourceTag::Douban, douban)
                .with_source(SourceTag::Goodreads, goodreads)
        })
}

fn sort_mode() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::Rating),
        Just(SortMode::Count),
        Just(SortMode::Unsorted)
    ]
}

proptest! {
    #[test]
    fn empty_query_returns_whole_pool(catalog in catalog()) {
        let total = catalog.len();
        let mut session = Session::new(catalog, ReadSet::default(), SessionConfig::default());
        let outcome = session.run_query("", SourceFilter::All, StatusFilter::All);
        prop_assert_eq!(outcome.total, total);
        prop_assert_eq!(outcome.breakdown.iter().map(|b| b.count).sum::<usize>(), total);
    }

    #[test]
    fn visible_window_is_bounded(
        catalog in catalog(),
        page_size in 1usize..20,
        pages in 0usize..6,
    ) {
        let config = SessionConfig { page_size, ..SessionConfig::default() };
        let mut session = Session::new(catalog, ReadSet::default(), config);
        session.run_query("", SourceFilter::All, StatusFilter::All);
        for _ in 0..pages {
            session.load_more();
        }
        let expected = page_size * (pages + 1);
        prop_assert_eq!(session.visible_count(), expected);
        prop_assert_eq!(session.visible().len(), expected.min(session.filtered().len()));
        prop_assert_eq!(session.has_more(), expected < session.filtered().len());
    }

    #[test]
    fn resorting_keeps_membership_and_window(
        catalog in catalog(),
        first in sort_mode(),
        second in sort_mode(),
    ) {
        let mut session = Session::new(catalog, ReadSet::default(), SessionConfig::default());
        session.set_sort(first);
        session.run_query("rating:>=5", SourceFilter::All, StatusFilter::All);
        session.load_more();
        let visible = session.visible_count();

        let mut before: Vec<String> = session.filtered().iter().map(|e| e.title.clone()).collect();
        session.set_sort(second);
        let mut after: Vec<String> = session.filtered().iter().map(|e| e.title.clone()).collect();

        prop_assert_eq!(session.visible_count(), visible);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn single_source_pool_is_tagged(catalog in catalog()) {
        let expected = catalog.records(SourceTag::Goodreads).len();
        let mut session = Session::new(catalog, ReadSet::default(), SessionConfig::default());
        let outcome = session.run_query(
            "",
            SourceFilter::Only(SourceTag::Goodreads),
            StatusFilter::All,
        );
        prop_assert_eq!(outcome.total, expected);
        prop_assert!(session.filtered().iter().all(|e| e.source == SourceTag::Goodreads));
    }
}
