//! Line-driven interactive session.
//!
//! Each input line is one event: a query, or a `:`-prefixed command. The view
//! is re-rendered after every event.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Result};
use shelf::{Presenter, Session, SortMode, SourceFilter, StatusFilter};

pub const HELP: &str = "\
Commands:
  <query>                  run a query, e.g. rating:>=9 count:>10000 title:red
  :sort rating|count|none  change the sort order
  :more                    show the next page
  :source all|db|gr        restrict to one source
  :status all|read|unread  restrict by read state
  :help                    show this help
  :quit                    leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Query(String),
    Sort(SortMode),
    More,
    Source(SourceFilter),
    Status(StatusFilter),
    Help,
    Quit,
}

impl Event {
    pub fn parse(line: &str) -> Result<Event> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Event::Query(line.to_string()));
        };

        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();
        let event = match (name, arg) {
            ("sort", Some(mode)) => Event::Sort(SortMode::from_name(mode)),
            ("more", None) => Event::More,
            ("source", Some(source)) => Event::Source(source.parse()?),
            ("status", Some(status)) => Event::Status(StatusFilter::from_name(status)),
            ("help", None) => Event::Help,
            ("quit" | "q", None) => Event::Quit,
            ("sort" | "source" | "status", None) => bail!(":{name} needs an argument"),
            _ => return Err(anyhow!("unknown command: {line} (try :help)")),
        };
        if words.next().is_some() {
            bail!("too many arguments: {line}");
        }
        Ok(event)
    }
}

/// Applies one event to the session. Returns `false` on quit.
pub fn apply(session: &mut Session, event: Event) -> bool {
    match event {
        Event::Query(text) => {
            let (source, status) = (session.source(), session.status());
            session.run_query(&text, source, status);
        }
        Event::Sort(mode) => session.set_sort(mode),
        Event::More => {
            session.load_more();
        }
        Event::Source(source) => {
            session.set_source(source);
        }
        Event::Status(status) => {
            session.set_status(status);
        }
        Event::Help => {}
        Event::Quit => return false,
    }
    true
}

/// Runs the loop until `:quit` or end of input.
pub fn run<R, W>(session: &mut Session, presenter: &dyn Presenter, input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", presenter.present(&session.view())?)?;
    for line in input.lines() {
        let line = line?;
        let event = match Event::parse(&line) {
            Ok(event) => event,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };
        if event == Event::Help {
            writeln!(output, "{HELP}")?;
            continue;
        }
        if !apply(session, event) {
            break;
        }
        writeln!(output, "{}", presenter.present(&session.view())?)?;
    }
    output.flush()?;
    Ok(())
}
