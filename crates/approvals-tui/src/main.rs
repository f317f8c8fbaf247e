mod input;
mod render;
mod runtime;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use approvals_core::config::{CoreConfig, EnvironmentType};
use approvals_core::dispatch::QueueDispatcher;
use approvals_core::fetch::FetchWithCache;
use approvals_core::i18n::Locale;
use approvals_core::machine::ConfirmationMachine;
use approvals_core::models::PendingRequest;
use approvals_core::navigation::RouteSignal;
use approvals_core::origin::KnownOrigins;
use approvals_core::queue::{demo_requests, load_requests, PendingQueue};
use approvals_core::templates::{ChainListSource, HttpChainList, StaticChainList, TemplateRegistry};
use approvals_core::tracing_setup::init_tracing;
use clap::Parser;

use crate::runtime::run_app;
use ui::App;

#[derive(Parser, Debug)]
#[command(name = "approvals-tui")]
#[command(about = "Review pending site requests in the terminal")]
struct Args {
    /// Window the confirmation page runs in: popup, fullscreen or notification
    #[arg(long, default_value = "popup")]
    environment: EnvironmentType,

    /// JSON array of pending requests (defaults to a demo add-network request)
    #[arg(long)]
    requests: Option<PathBuf>,

    /// messages.json overriding the built-in English strings
    #[arg(long)]
    locale: Option<PathBuf>,

    /// Skip the chain list lookup
    #[arg(long)]
    offline: bool,

    /// Delay before a dismissed alert is removed
    #[arg(long)]
    removal_delay_ms: Option<u64>,
}

impl Args {
    fn config(&self) -> CoreConfig {
        let mut config = CoreConfig::new(self.environment).offline(self.offline);
        if let Some(path) = &self.locale {
            config = config.with_locale(path);
        }
        if let Some(ms) = self.removal_delay_ms {
            config = config.with_removal_delay(Duration::from_millis(ms));
        }
        config
    }
}

fn load_locale(config: &CoreConfig) -> Result<Locale> {
    match &config.locale_path {
        Some(path) => Ok(Locale::load(path)
            .with_context(|| format!("loading locale {}", path.display()))?
            .with_fallback(Locale::english())),
        None => Ok(Locale::english()),
    }
}

fn initial_requests(path: Option<&Path>) -> Result<Vec<PendingRequest>> {
    match path {
        Some(path) => load_requests(path).with_context(|| format!("loading requests {}", path.display())),
        None => Ok(demo_requests()),
    }
}

fn chain_source(config: &CoreConfig) -> Arc<dyn ChainListSource> {
    if config.offline {
        Arc::new(StaticChainList::default())
    } else {
        Arc::new(HttpChainList::new(
            config.chain_list_url.clone(),
            FetchWithCache::new(config.chain_list_refresh),
        ))
    }
}

fn build_app(config: &CoreConfig, requests: Vec<PendingRequest>) -> Result<App> {
    let locale = load_locale(config)?;
    let queue = PendingQueue::new(requests);
    let dispatcher = Arc::new(QueueDispatcher::new(queue.clone()));
    let route = Arc::new(RouteSignal::new());
    let templates = Arc::new(TemplateRegistry::standard(chain_source(config)));

    let machine = ConfirmationMachine::new(
        templates,
        Arc::new(locale),
        dispatcher.clone(),
        route.clone(),
        config.environment,
    );

    Ok(App::new(
        machine,
        queue,
        dispatcher,
        route,
        Box::new(KnownOrigins::new()),
        config.alert_removal_delay,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    // Set up panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        eprintln!("\n\n=== PANIC ===");
        eprintln!("{}", panic_info);
        eprintln!("=============\n");
        original_hook(panic_info);
    }));

    let config = args.config();
    let requests = initial_requests(args.requests.as_deref())?;
    tracing::info!(
        environment = config.environment.label(),
        pending = requests.len(),
        offline = config.offline,
        "starting confirmation page"
    );

    // Building inside the runtime lets the first activation spawn its lookups
    let mut app = build_app(&config, requests)?;
    let completions = app
        .take_completions()
        .ok_or_else(|| anyhow::anyhow!("confirmation machine has no completion receiver"))?;

    let mut terminal = ui::init_terminal()?;
    let result = run_app(&mut terminal, &mut app, completions).await;
    ui::restore_terminal()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}
