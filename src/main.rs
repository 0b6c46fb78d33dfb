//! # portal
//!
//! Terminal page shell: wires settings, telemetry, the selection store and
//! the content pipeline together, then drives navigation from the command
//! line or stdin. Rendered content goes to stdout, logs to stderr.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use portal_core::{NavId, TemplateRenderer};
use portal_engine::{
    Content, ContentArea, ContentLoader, HttpFetcher, LoadHandle, NavItemView,
    NavigationController, SiteUrls,
};
use portal_settings::PortalSettings;
use portal_store::{Database, KvRepo, KvStore, MemoryKv};
use portal_telemetry::{init_telemetry, TelemetryConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Portal page shell.
#[derive(Parser, Debug)]
#[command(name = "portal", about = "Navigation shell for the employee portal")]
struct Cli {
    /// Settings file (defaults to `~/.portal/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Page origin; overrides the settings file and `PORTAL_PAGE_ORIGIN`.
    #[arg(long)]
    origin: Option<String>,

    /// Select this item, print its content and exit.
    #[arg(long, conflicts_with = "once")]
    select: Option<String>,

    /// Print the content of the restored selection and exit.
    #[arg(long)]
    once: bool,

    /// Print the navigation items and exit.
    #[arg(long)]
    list: bool,

    /// Keep the selection in memory only.
    #[arg(long)]
    ephemeral: bool,
}

fn load_settings(cli: &Cli) -> Result<PortalSettings> {
    let mut settings = match &cli.settings {
        Some(path) => portal_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => portal_settings::load_settings().context("Failed to load settings")?,
    };
    if let Some(origin) = &cli.origin {
        settings.page_origin.clone_from(origin);
    }
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

fn open_store(settings: &PortalSettings, ephemeral: bool) -> Result<Arc<dyn KvStore>> {
    if ephemeral {
        return Ok(Arc::new(MemoryKv::new()));
    }
    let path = settings.db_path();
    let db = Database::open(&path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    info!(path = %path.display(), "selection store opened");
    Ok(Arc::new(KvRepo::new(db)))
}

fn build_controller(
    settings: &PortalSettings,
    store: Arc<dyn KvStore>,
) -> Result<NavigationController> {
    let timeout = settings.request_timeout_secs.map(Duration::from_secs);
    let fetcher = HttpFetcher::new(timeout).context("Failed to build HTTP client")?;
    let urls = SiteUrls::from_origin(settings.page_origin_url()?)?;
    info!(
        origin = %urls.page_origin(),
        backend = urls.backend_base(),
        "content sources resolved"
    );

    let loader = ContentLoader::new(Arc::new(fetcher), urls)
        .with_renderer(TemplateRenderer::new(settings.falsy_policy))
        .with_locale(settings.locale);

    let controller = NavigationController::new(
        settings.navigation.items.clone(),
        settings.navigation.default_item.clone(),
        store,
        Arc::new(loader),
        Arc::new(ContentArea::new()),
    )?;
    Ok(controller)
}

fn print_navigation(views: Vec<NavItemView>) {
    for view in views {
        let marker = if view.active { '*' } else { ' ' };
        println!("{marker} {:<12} {:<20} {}", view.id.as_str(), view.title, view.icon);
    }
}

async fn finish(handle: LoadHandle) -> Result<Content> {
    handle.await.context("Content load task failed")
}

/// One line of interactive input. Commands carry a `:` prefix so that any
/// catalog id stays selectable.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Select(NavId),
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let input = line.trim();
    if input.is_empty() {
        return None;
    }
    Some(match input.strip_prefix(':') {
        Some("list") => Command::List,
        Some(other) => Command::Unknown(other.to_string()),
        None => Command::Select(NavId::from_raw(input)),
    })
}

async fn run_interactive(mut controller: NavigationController) -> Result<()> {
    let mut rx = controller.content_area().subscribe();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let content = rx.borrow_and_update().clone();
            println!("{}", content.text());
        }
    });

    let mut last = Some(controller.initialize());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_command(&line) {
            None => continue,
            Some(Command::List) => print_navigation(controller.views()),
            Some(Command::Unknown(name)) => eprintln!("unknown command: :{name}"),
            Some(Command::Select(id)) => match controller.select(&id) {
                Some(handle) => last = Some(handle),
                None => eprintln!("unknown item: {id}"),
            },
        }
    }

    if let Some(handle) = last.take() {
        finish(handle).await?;
    }
    // Let the printer drain the final commit before shutting it down.
    tokio::task::yield_now().await;
    printer.abort();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let telemetry =
        TelemetryConfig::from_level_name(&settings.logging.level, settings.logging.json);
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("{e}");
    }

    let store = open_store(&settings, cli.ephemeral)?;
    let mut controller = build_controller(&settings, store)?;

    if cli.list {
        print_navigation(controller.restored_views());
        return Ok(ExitCode::SUCCESS);
    }

    let handle = match (&cli.select, cli.once) {
        (Some(id), _) => match controller.select(&NavId::from_raw(id.as_str())) {
            Some(handle) => Some(handle),
            None => {
                warn!(item = %id, "unknown item");
                eprintln!("unknown item: {id}");
                return Ok(ExitCode::FAILURE);
            }
        },
        (None, true) => Some(controller.initialize()),
        (None, false) => None,
    };

    match handle {
        Some(handle) => {
            let content = finish(handle).await?;
            println!("{}", content.text());
            Ok(if content.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        None => {
            run_interactive(controller).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn plain_input_selects_item() {
        assert_eq!(parse_command(" news \n"), Some(Command::Select(NavId::from_raw("news"))));
    }

    #[test]
    fn item_named_list_is_selectable() {
        assert_eq!(parse_command("list"), Some(Command::Select(NavId::from_raw("list"))));
        assert_eq!(parse_command(":list"), Some(Command::List));
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(parse_command(":quit"), Some(Command::Unknown("quit".into())));
    }
}
