//! Converts CSV exports into dataset documents.
//!
//! Douban exports come in two layouts:
//!
//! | Layout   | Columns                                   |
//! |----------|-------------------------------------------|
//! | compact  | `ID,Rating,Votes,Title`                   |
//! | extended | `ID,Score,Rating,Votes,Date,Title`        |
//!
//! The first row is always a header. Rows are skipped when they are short,
//! carry a non-numeric or repeated id, or hold a numeric cell that does not
//! parse. An id is claimed by the first row that carries it, even when that
//! row is then skipped. Empty numeric cells read as zero.
//!
//! Goodreads exports are read by header name (`id`, `rating`, `num_ratings`,
//! `title`, `author`) and rescaled to the ten-point Douban scale. A Douban
//! export and a Goodreads export merge into one two-source document with
//! [`convert_sources`].

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConvertError;
use crate::readset::ReadSet;
use crate::record::{Record, RecordId};

const SUBJECT_URL: &str = "https://book.douban.com/subject/";

/// Column layout of a Douban CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Compact,
    Extended,
}

impl CsvLayout {
    /// Guesses the layout from the header width.
    pub fn detect(columns: usize) -> CsvLayout {
        if columns >= CsvLayout::Extended.width() {
            CsvLayout::Extended
        } else {
            CsvLayout::Compact
        }
    }

    /// Minimum number of columns a data row needs.
    pub fn width(self) -> usize {
        match self {
            CsvLayout::Compact => 4,
            CsvLayout::Extended => 6,
        }
    }

    pub fn from_name(name: &str) -> Option<CsvLayout> {
        match name.trim().to_lowercase().as_str() {
            "compact" => Some(CsvLayout::Compact),
            "extended" => Some(CsvLayout::Extended),
            _ => None,
        }
    }
}

/// The single-source document written by [`convert_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDocument {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<Record>,
    pub source: String,
}

/// The two-source document written by [`convert_sources`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesDocument {
    pub generated_at: DateTime<Utc>,
    pub douban: Vec<Record>,
    pub goodreads: Vec<Record>,
}

/// Inputs of a two-source conversion.
#[derive(Debug, Clone, Copy)]
pub struct SourcePaths<'a> {
    pub douban: &'a Path,
    pub goodreads: &'a Path,
    /// Read-state document used to drop same-title Douban editions.
    pub read: Option<&'a Path>,
}

/// Records written per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcesSummary {
    pub douban: usize,
    pub goodreads: usize,
}

struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_table<R: io::Read>(input: R) -> Result<CsvTable, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .byte_headers()?
        .iter()
        .map(|cell| {
            String::from_utf8_lossy(cell)
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect();

    let mut rows = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        rows.push(
            row.iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .collect(),
        );
    }
    Ok(CsvTable { headers, rows })
}

// ============================================================================
// Douban
// ============================================================================

/// Parses a Douban CSV export. `layout` of `None` detects it from the header.
pub fn read_records<R: io::Read>(
    input: R,
    layout: Option<CsvLayout>,
) -> Result<Vec<Record>, ConvertError> {
    let table = read_table(input)?;
    let layout = layout.unwrap_or_else(|| CsvLayout::detect(table.headers.len()));
    Ok(records_from_rows(&table.rows, layout))
}

fn records_from_rows(rows: &[Vec<String>], layout: CsvLayout) -> Vec<Record> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (line, cells) in rows.iter().enumerate() {
        let line = line + 2;
        if cells.len() < layout.width() {
            debug!(line, "short row skipped");
            continue;
        }
        let Some(id) = parse_id(&cells[0]) else {
            debug!(line, "row without numeric id skipped");
            continue;
        };
        if !seen.insert(id) {
            debug!(line, id, "duplicate id skipped");
            continue;
        }
        match parse_row(id, cells, layout) {
            Some(record) => records.push(record),
            None => debug!(line, id, "row with bad numbers skipped"),
        }
    }
    records
}

fn parse_row(id: i64, cells: &[String], layout: CsvLayout) -> Option<Record> {
    let record = match layout {
        CsvLayout::Compact => {
            let rating = parse_cell::<f64>(&cells[1])?;
            let votes = parse_votes(&cells[2])?;
            Record::new(cells[3].as_str(), rating, votes)
        }
        CsvLayout::Extended => {
            let score = parse_cell::<f64>(&cells[1])?;
            let rating = parse_cell::<f64>(&cells[2])?;
            let votes = parse_votes(&cells[3])?;
            let mut record = Record::new(cells[5].as_str(), rating, votes);
            record.score = Some(score);
            record.date = Some(cells[4].clone());
            record.img = Some(String::new());
            record
        }
    };

    Some(
        record
            .with_id(RecordId::Number(id))
            .with_url(format!("{SUBJECT_URL}{id}/")),
    )
}

/// Parses a compact Douban export for a two-source document.
///
/// Rows with id `0` are dropped and ratings are rounded to two places. When a
/// title belongs to a read book, other ids carrying that title are dropped so
/// the read edition is the only one listed.
pub fn read_douban<R: io::Read>(input: R, read: &ReadSet) -> Result<Vec<Record>, ConvertError> {
    let table = read_table(input)?;
    let read_titles = read_titles(&table.rows, read);

    Ok(records_from_rows(&table.rows, CsvLayout::Compact)
        .into_iter()
        .filter(|record| record.id != Some(RecordId::Number(0)))
        .filter(|record| is_listed_edition(record, &read_titles))
        .map(|mut record| {
            record.rating = round_to(record.rating, 2);
            record
        })
        .collect())
}

/// Maps each read title to the ids it was read under.
fn read_titles(rows: &[Vec<String>], read: &ReadSet) -> HashMap<String, HashSet<String>> {
    let mut titles: HashMap<String, HashSet<String>> = HashMap::new();
    if read.is_empty() {
        return titles;
    }
    for cells in rows {
        if cells.len() < CsvLayout::Compact.width() {
            continue;
        }
        let Some(id) = parse_id(&cells[0]).map(RecordId::Number) else {
            continue;
        };
        if read.contains(&id) {
            titles
                .entry(cells[3].clone())
                .or_default()
                .insert(id.normalized());
        }
    }
    titles
}

fn is_listed_edition(record: &Record, read_titles: &HashMap<String, HashSet<String>>) -> bool {
    match (read_titles.get(&record.title), &record.id) {
        (Some(ids), Some(id)) => ids.contains(&id.normalized()),
        _ => true,
    }
}

// ============================================================================
// Goodreads
// ============================================================================

struct GoodreadsColumns {
    id: Option<usize>,
    rating: Option<usize>,
    num_ratings: Option<usize>,
    title: Option<usize>,
    author: Option<usize>,
}

impl GoodreadsColumns {
    fn locate(headers: &[String]) -> Self {
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        GoodreadsColumns {
            id: column("id"),
            rating: column("rating"),
            num_ratings: column("num_ratings"),
            title: column("title"),
            author: column("author"),
        }
    }
}

/// Parses a Goodreads CSV export.
///
/// Ids stay strings. Ratings are doubled onto the ten-point scale and rounded
/// to two places. Rating counts may carry thousands separators. Empty or
/// `N/A` numbers read as zero. `author` is set only when non-empty.
pub fn read_goodreads<R: io::Read>(input: R) -> Result<Vec<Record>, ConvertError> {
    let table = read_table(input)?;
    let columns = GoodreadsColumns::locate(&table.headers);

    let mut records = Vec::new();
    for (line, cells) in table.rows.iter().enumerate() {
        match goodreads_row(cells, &columns) {
            Some(record) => records.push(record),
            None => debug!(line = line + 2, "goodreads row skipped"),
        }
    }
    Ok(records)
}

fn goodreads_row(cells: &[String], columns: &GoodreadsColumns) -> Option<Record> {
    let cell = |index: Option<usize>| {
        index
            .and_then(|i| cells.get(i))
            .map(String::as_str)
            .unwrap_or_default()
    };

    let id = cell(columns.id);
    if id.is_empty() {
        return None;
    }
    let rating = parse_reported(cell(columns.rating))?;
    let votes = parse_reported(&cell(columns.num_ratings).replace(',', ""))?;

    let mut record = Record::new(cell(columns.title), round_to(rating * 2.0, 2), to_count(votes)?)
        .with_id(RecordId::Text(id.to_string()));
    let author = cell(columns.author);
    if !author.is_empty() {
        record = record.with_author(author);
    }
    Some(record)
}

/// Empty and `N/A` read as zero; anything else must parse.
fn parse_reported(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("n/a") {
        return Some(0.0);
    }
    cell.parse().ok()
}

// ============================================================================
// Cells
// ============================================================================

fn parse_id(cell: &str) -> Option<i64> {
    if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cell.parse().ok()
}

/// Empty reads as the default; anything else must parse.
fn parse_cell<T: std::str::FromStr + Default>(cell: &str) -> Option<T> {
    if cell.is_empty() {
        return Some(T::default());
    }
    cell.parse().ok()
}

/// Vote counts are sometimes exported as floats (`1234.0`).
fn parse_votes(cell: &str) -> Option<u64> {
    to_count(parse_cell::<f64>(cell)?)
}

fn to_count(votes: f64) -> Option<u64> {
    (votes.is_finite() && votes >= 0.0).then(|| votes.trunc() as u64)
}

fn round_to(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (x * factor).round() / factor
}

// ============================================================================
// Documents
// ============================================================================

/// Builds a single-source document stamped with the current time.
pub fn build_document(items: Vec<Record>, source: impl Into<String>) -> DatasetDocument {
    DatasetDocument {
        generated_at: Utc::now(),
        items,
        source: source.into(),
    }
}

/// Writes `document` as compact JSON.
pub fn write_document<W, T>(output: W, document: &T) -> Result<(), ConvertError>
where
    W: Write,
    T: Serialize,
{
    let mut writer = BufWriter::new(output);
    serde_json::to_writer(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}

/// Converts the Douban CSV file at `input` into a single-source document at
/// `output`.
///
/// Returns the number of records written.
pub fn convert_file(
    input: &Path,
    output: &Path,
    layout: Option<CsvLayout>,
) -> Result<usize, ConvertError> {
    let records = read_records(File::open(input)?, layout)?;
    let count = records.len();
    let document = build_document(records, input.display().to_string());
    write_document(File::create(output)?, &document)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        records = count,
        "dataset written"
    );
    Ok(count)
}

/// Merges a Douban and a Goodreads export into a two-source document at
/// `output`.
///
/// A missing or unreadable read-state document disables the same-title
/// filtering with a warning.
pub fn convert_sources(
    paths: &SourcePaths<'_>,
    output: &Path,
) -> Result<SourcesSummary, ConvertError> {
    let read = paths.read.map(load_read_state).unwrap_or_default();
    let douban = read_douban(File::open(paths.douban)?, &read)?;
    let goodreads = read_goodreads(File::open(paths.goodreads)?)?;

    let summary = SourcesSummary {
        douban: douban.len(),
        goodreads: goodreads.len(),
    };
    let document = SourcesDocument {
        generated_at: Utc::now(),
        douban,
        goodreads,
    };
    write_document(File::create(output)?, &document)?;
    info!(
        output = %output.display(),
        douban = summary.douban,
        goodreads = summary.goodreads,
        "dataset written"
    );
    Ok(summary)
}

fn load_read_state(path: &Path) -> ReadSet {
    let location = path.display().to_string();
    let loaded = std::fs::read(path)
        .map_err(|err| err.to_string())
        .and_then(|bytes| ReadSet::from_slice(&location, &bytes).map_err(|err| err.to_string()));
    match loaded {
        Ok(read) => read,
        Err(error) => {
            warn!(%location, %error, "read state unavailable, keeping every edition");
            ReadSet::default()
        }
    }
}
