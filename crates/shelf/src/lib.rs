//! Shelf - browse a static book catalog.
//!
//! Shelf loads a catalog of books from one or more sources (Douban, Goodreads),
//! filters it with the [`shelf_seeker`] query language, sorts the result and
//! reveals it a page at a time.
//!
//! # Quick Start
//!
//! ```rust
//! use shelf::{Catalog, Record, ReadSet, Session, SessionConfig, SourceFilter, SourceTag, StatusFilter};
//!
//! let catalog = Catalog::new()
//!     .with_source(SourceTag::Douban, vec![
//!         Record::new("A", 4.9, 120_000),
//!         Record::new("B", 3.2, 50),
//!     ])
//!     .with_source(SourceTag::Goodreads, vec![Record::new("C", 4.9, 500_000)]);
//!
//! let mut session = Session::new(catalog, ReadSet::default(), SessionConfig::default());
//! let outcome = session.run_query("rating:>=4", SourceFilter::All, StatusFilter::All);
//!
//! assert_eq!(outcome.total, 2);
//! assert_eq!(session.visible()[0].title, "C");
//! ```
//!
//! # Modules
//!
//! - [`record`]: the record type and its two JSON spellings
//! - [`dataset`]: the loaded catalog and the tagged pool
//! - [`loader`]: async fetching of the dataset and read state
//! - [`readset`]: read-state membership and the status filter
//! - [`session`]: the filter/sort/paginate pipeline
//! - [`view`]: the presentation boundary
//! - [`convert`]: CSV export to dataset conversion, single or two-source

pub mod convert;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod readset;
pub mod record;
pub mod session;
pub mod source;
pub mod view;

pub use convert::{
    convert_file, convert_sources, read_douban, read_goodreads, read_records, CsvLayout,
    DatasetDocument, SourcePaths, SourcesDocument, SourcesSummary,
};
pub use dataset::{Catalog, TaggedRecord};
pub use error::{ConvertError, LoadError, RenderError, UnknownSource};
pub use loader::{load, load_catalog, load_read_set, Fetcher, FsFetcher, Loaded, MemoryFetcher};
pub use readset::{ReadSet, StatusFilter};
pub use record::{Record, RecordId};
pub use session::{QueryOutcome, Session, SessionConfig, SourceCount, DEFAULT_PAGE_SIZE};
pub use source::{SourceFilter, SourceTag};
pub use view::{format_count, format_rating, Card, JsonPresenter, Presenter, TemplatePresenter, View};

pub use shelf_seeker::{ParseError, Query, SortMode};
