//! Presentation boundary.
//!
//! [`View`] is the renderable snapshot of a session: which empty or error
//! state applies, or the visible window of results. A [`Presenter`] turns a
//! view into text; the session never formats anything itself.

use minijinja::Environment;
use serde::Serialize;

use crate::dataset::TaggedRecord;
use crate::error::RenderError;
use crate::readset::ReadSet;
use crate::session::SourceCount;
use crate::source::SourceTag;

const VIEW_TEMPLATE: &str = include_str!("../templates/view.jinja");
const VIEW_NAME: &str = "view";

/// One visible result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub rating: f64,
    pub rating_count: u64,
    pub url: Option<&'a str>,
    pub source: SourceTag,
    /// `None` when read tracking is off.
    pub read: Option<bool>,
}

impl<'a> Card<'a> {
    pub fn new(entry: &'a TaggedRecord, read_set: Option<&ReadSet>) -> Self {
        Card {
            title: &entry.title,
            author: entry.author.as_deref(),
            rating: entry.rating,
            rating_count: entry.rating_count,
            url: entry.url.as_deref(),
            source: entry.source,
            read: read_set.map(|set| set.has_read(entry)),
        }
    }
}

/// Renderable session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum View<'a> {
    /// No query has run yet.
    Prompt,
    /// The last query matched nothing.
    NoResults,
    /// The last query did not parse.
    QueryFailed { message: String },
    /// The dataset could not be loaded.
    LoadFailed { message: String },
    /// The visible window of a non-empty result.
    Results {
        cards: Vec<Card<'a>>,
        total: usize,
        shown: usize,
        has_more: bool,
        breakdown: Vec<SourceCount>,
    },
}

impl<'a> View<'a> {
    /// Picks the state to show for a result list.
    ///
    /// The window is `filtered[..min(visible_count, len)]`; `visible_count`
    /// itself may run past the end.
    pub fn compose(
        has_queried: bool,
        error: Option<&str>,
        filtered: &'a [TaggedRecord],
        visible_count: usize,
        breakdown: &[SourceCount],
        read_set: Option<&ReadSet>,
    ) -> View<'a> {
        if !has_queried {
            return View::Prompt;
        }
        if let Some(message) = error {
            return View::QueryFailed {
                message: message.to_string(),
            };
        }
        if filtered.is_empty() {
            return View::NoResults;
        }

        let shown = visible_count.min(filtered.len());
        View::Results {
            cards: filtered[..shown]
                .iter()
                .map(|entry| Card::new(entry, read_set))
                .collect(),
            total: filtered.len(),
            shown,
            has_more: visible_count < filtered.len(),
            breakdown: breakdown.to_vec(),
        }
    }

    /// Returns `true` when the "load more" affordance should be shown.
    pub fn has_more(&self) -> bool {
        matches!(self, View::Results { has_more: true, .. })
    }

    pub fn cards(&self) -> &[Card<'a>] {
        match self {
            View::Results { cards, .. } => cards,
            _ => &[],
        }
    }
}

/// Turns a [`View`] into output text.
pub trait Presenter {
    fn present(&self, view: &View<'_>) -> Result<String, RenderError>;
}

/// Renders views through a MiniJinja template.
pub struct TemplatePresenter {
    env: Environment<'static>,
}

impl TemplatePresenter {
    /// Uses the built-in template.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = base_environment();
        env.add_template(VIEW_NAME, VIEW_TEMPLATE)?;
        Ok(TemplatePresenter { env })
    }

    /// Uses a caller-supplied template. It receives the serialized view,
    /// with `state` naming the variant.
    pub fn with_template(source: impl Into<String>) -> Result<Self, RenderError> {
        let mut env = base_environment();
        env.add_template_owned(VIEW_NAME, source.into())?;
        Ok(TemplatePresenter { env })
    }
}

impl Presenter for TemplatePresenter {
    fn present(&self, view: &View<'_>) -> Result<String, RenderError> {
        let template = self.env.get_template(VIEW_NAME)?;
        Ok(template.render(view)?)
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("count", format_count);
    env.add_filter("rating", format_rating);
    env
}

/// Renders views as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPresenter {
    pub pretty: bool,
}

impl Presenter for JsonPresenter {
    fn present(&self, view: &View<'_>) -> Result<String, RenderError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(view)?
        } else {
            serde_json::to_string(view)?
        };
        Ok(json)
    }
}

/// Formats a rating count; ten thousand and up uses the `万` unit.
pub fn format_count(count: u64) -> String {
    if count >= 10_000 {
        format!("{}万", one_decimal(count as f64 / 10_000.0))
    } else {
        count.to_string()
    }
}

/// Formats a rating to one decimal place.
pub fn format_rating(rating: f64) -> String {
    one_decimal(rating)
}

/// Formats to one decimal, rounding exact ties away from zero.
///
/// `{:.1}` alone rounds exact binary ties (`1.25`, `4.25`) to even. A value
/// is an exact tie at one decimal only when four times it is an odd integer.
fn one_decimal(x: f64) -> String {
    let quarters = x * 4.0;
    let x = if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (x * 10.0).round() / 10.0
    } else {
        x
    };
    format!("{x:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use std::sync::Arc;

    fn tagged(title: &str, rating: f64, count: u64) -> TaggedRecord {
        TaggedRecord::new(SourceTag::Douban, Arc::new(Record::new(title, rating, count)))
    }

    fn results(n: usize) -> Vec<TaggedRecord> {
        (0..n).map(|i| tagged(&format!("Book {i}"), 4.0, i as u64)).collect()
    }

    #[test]
    fn prompt_before_first_query() {
        let filtered = results(3);
        let view = View::compose(false, None, &filtered, 30, &[], None);
        assert_eq!(view, View::Prompt);
    }

    #[test]
    fn error_wins_over_empty() {
        let view = View::compose(true, Some("Cannot parse: rating>5"), &[], 0, &[], None);
        assert_eq!(
            view,
            View::QueryFailed {
                message: "Cannot parse: rating>5".into()
            }
        );
        assert!(!view.has_more());
    }

    #[test]
    fn empty_result_is_no_results() {
        let view = View::compose(true, None, &[], 30, &[], None);
        assert_eq!(view, View::NoResults);
        assert!(!view.has_more());
    }

    #[test]
    fn window_is_clamped() {
        let filtered = results(75);
        let view = View::compose(true, None, &filtered, 90, &[], None);
        match view {
            View::Results {
                ref cards,
                total,
                shown,
                has_more,
                ..
            } => {
                assert_eq!(cards.len(), 75);
                assert_eq!(total, 75);
                assert_eq!(shown, 75);
                assert!(!has_more);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn partial_window_has_more() {
        let filtered = results(75);
        let view = View::compose(true, None, &filtered, 30, &[], None);
        assert_eq!(view.cards().len(), 30);
        assert!(view.has_more());
    }

    #[test]
    fn read_flag_only_with_tracking() {
        let filtered = vec![TaggedRecord::new(
            SourceTag::Douban,
            Arc::new(Record::new("Read me", 4.0, 1).with_id(7)),
        )];
        let read_set: ReadSet = [crate::record::RecordId::Number(7)].into_iter().collect();
        let tracked = View::compose(true, None, &filtered, 30, &[], Some(&read_set));
        assert_eq!(tracked.cards()[0].read, Some(true));
        let untracked = View::compose(true, None, &filtered, 30, &[], None);
        assert_eq!(untracked.cards()[0].read, None);
    }

    #[test]
    fn count_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(9_999), "9999");
        assert_eq!(format_count(10_000), "1.0万");
        assert_eq!(format_count(407_652), "40.8万");
        assert_eq!(format_rating(9.0), "9.0");
        assert_eq!(format_rating(4.26), "4.3");
    }

    #[test]
    fn exact_ties_round_up() {
        assert_eq!(format_count(12_500), "1.3万");
        assert_eq!(format_count(32_500), "3.3万");
        assert_eq!(format_count(17_500), "1.8万");
        assert_eq!(format_rating(4.25), "4.3");
        assert_eq!(format_rating(8.25), "8.3");
        assert_eq!(format_rating(0.75), "0.8");
        assert_eq!(format_rating(7.5), "7.5");
        assert_eq!(format_rating(-1.25), "-1.3");
    }

    #[test]
    fn template_renders_each_state() {
        let presenter = TemplatePresenter::new().unwrap();

        let prompt = presenter.present(&View::Prompt).unwrap();
        assert!(prompt.contains("Enter a query"));

        let empty = presenter.present(&View::NoResults).unwrap();
        assert_eq!(empty.trim(), "No results.");

        let failed = presenter
            .present(&View::QueryFailed {
                message: "Unknown field: year".into(),
            })
            .unwrap();
        assert_eq!(failed.trim(), "Query error: Unknown field: year");

        let filtered = vec![tagged("红楼梦", 9.6, 407_652)];
        let breakdown = vec![SourceCount {
            source: SourceTag::Douban,
            count: 1,
        }];
        let view = View::compose(true, None, &filtered, 30, &breakdown, None);
        let text = presenter.present(&view).unwrap();
        assert!(text.contains("9.6  红楼梦"));
        assert!(text.contains("40.8万 ratings"));
        assert!(text.contains("1 of 1 shown | db: 1"));
        assert!(!text.contains("more available"));
    }

    #[test]
    fn custom_template() {
        let presenter = TemplatePresenter::with_template("{{ state }}").unwrap();
        assert_eq!(presenter.present(&View::NoResults).unwrap(), "no_results");
    }

    #[test]
    fn json_presenter_tags_state() {
        let json = JsonPresenter::default().present(&View::NoResults).unwrap();
        assert_eq!(json, r#"{"state":"no_results"}"#);

        let filtered = results(2);
        let view = View::compose(true, None, &filtered, 1, &[], None);
        let value: serde_json::Value =
            serde_json::from_str(&JsonPresenter { pretty: true }.present(&view).unwrap()).unwrap();
        assert_eq!(value["state"], "results");
        assert_eq!(value["total"], 2);
        assert_eq!(value["has_more"], true);
        assert_eq!(value["cards"][0]["source"], "db");
    }
}
