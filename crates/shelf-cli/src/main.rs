use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use shelf::{
    FsFetcher, JsonPresenter, Presenter, Session, SourcePaths, TemplatePresenter, View,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod repl;

use cli::{CatalogArgs, Cli, Command, OutputFormat};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the rendered view.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf=info,shelf_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Command::Convert {
            input,
            output,
            layout,
            douban,
            goodreads,
            read,
        } => {
            match (douban, goodreads) {
                (Some(douban), Some(goodreads)) => {
                    let paths = SourcePaths {
                        douban: &douban,
                        goodreads: &goodreads,
                        read: read.as_deref(),
                    };
                    let summary = shelf::convert_sources(&paths, &output).with_context(|| {
                        format!("merging {} and {}", douban.display(), goodreads.display())
                    })?;
                    println!(
                        "Douban: {} books, Goodreads: {} books",
                        summary.douban, summary.goodreads
                    );
                    println!("Written to {}", output.display());
                }
                _ => {
                    let count = shelf::convert_file(&input, &output, layout.map(Into::into))
                        .with_context(|| format!("converting {}", input.display()))?;
                    println!("Wrote {count} records to {}", output.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Query { text, pages } => {
            let presenter = presenter(&cli.catalog)?;
            let Some(mut session) = open_session(&cli.catalog, presenter.as_ref()).await? else {
                return Ok(ExitCode::FAILURE);
            };
            session.run_query(&text.join(" "), cli.catalog.source, cli.catalog.status);
            for _ in 1..pages {
                session.load_more();
            }
            println!("{}", presenter.present(&session.view())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Repl => {
            let presenter = presenter(&cli.catalog)?;
            let Some(mut session) = open_session(&cli.catalog, presenter.as_ref()).await? else {
                return Ok(ExitCode::FAILURE);
            };
            repl::run(
                &mut session,
                presenter.as_ref(),
                io::stdin().lock(),
                io::stdout().lock(),
            )?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn presenter(args: &CatalogArgs) -> Result<Box<dyn Presenter>> {
    let presenter: Box<dyn Presenter> = match (args.format, &args.template) {
        (OutputFormat::Json, _) => Box::new(JsonPresenter { pretty: false }),
        (OutputFormat::Text, Some(path)) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading template {}", path.display()))?;
            Box::new(TemplatePresenter::with_template(source)?)
        }
        (OutputFormat::Text, None) => Box::new(TemplatePresenter::new()?),
    };
    Ok(presenter)
}

/// Loads the catalog. On failure the load-error view is printed and `None`
/// is returned.
async fn open_session(args: &CatalogArgs, presenter: &dyn Presenter) -> Result<Option<Session>> {
    let fetcher = FsFetcher::new();
    match shelf::load(&fetcher, &args.data, args.read_state.as_deref()).await {
        Ok(loaded) => {
            let mut session = Session::from_loaded(loaded, args.session_config());
            session.set_source(args.source);
            session.set_status(args.status);
            Ok(Some(session))
        }
        Err(err) => {
            tracing::error!(error = %err, "dataset load failed");
            let view = View::LoadFailed {
                message: err.to_string(),
            };
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", presenter.present(&view)?)?;
            Ok(None)
        }
    }
}
