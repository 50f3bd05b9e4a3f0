//! The `summarize` command: load a saved document page, click one element
//! and print what the panel shows.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tokio::time::sleep;
use tracing::{info, warn};

use threadlens_config::AppConfig;
use threadlens_content::{ClickOutcome, ContentScript, HostPage};
use threadlens_coordinator::{Coordinator, ProviderRegistry};
use threadlens_panel::{PanelController, SummaryContent};
use threadlens_protocols::settings::SettingsStore;
use threadlens_runtime::{url_matches, ContextKind, ExtensionBus};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) struct SummarizeArgs {
    pub page: PathBuf,
    pub click: String,
    pub url: String,
    pub timeout: Duration,
    pub focus: bool,
}

async fn poll_until<T>(timeout: Duration, what: &str, mut check: impl FnMut() -> Option<T>) -> Result<T> {
    tokio::time::timeout(timeout, async {
        loop {
            if let Some(value) = check() {
                return value;
            }
            sleep(POLL_INTERVAL).await;
        }
    })
    .await
    .with_context(|| format!("Timed out waiting for {}", what))
}

pub(crate) async fn run(
    config: AppConfig,
    store: Arc<dyn SettingsStore>,
    args: SummarizeArgs,
) -> Result<()> {
    let html = tokio::fs::read_to_string(&args.page)
        .await
        .with_context(|| format!("Failed to read {}", args.page.display()))?;
    if !url_matches(&config.site.match_pattern, &args.url) {
        bail!("{} does not match {}", args.url, config.site.match_pattern);
    }

    let bus = ExtensionBus::new();
    let (background, background_inbox) = bus.register_context(ContextKind::Background);
    let (panel_handle, panel_inbox) = bus.register_context(ContextKind::Panel);

    let coordinator = Arc::new(Coordinator::new(
        config.clone(),
        Arc::clone(&store),
        ProviderRegistry::from_config(&config.providers),
        background,
    ));
    coordinator.on_installed().await?;
    tokio::spawn(Arc::clone(&coordinator).run(background_inbox));

    let panel = Arc::new(PanelController::new(
        store,
        &config.providers,
        Arc::new(panel_handle),
    ));
    panel.load_settings().await?;
    if !panel.check_configuration().await? {
        warn!("Provider configuration is not verified");
    }
    tokio::spawn(Arc::clone(&panel).run(panel_inbox));

    let tab = bus.open_tab(args.url.clone());
    let (port, content_inbox) = bus.attach_content_script(tab)?;
    let page = Rc::new(RefCell::new(HostPage::parse(args.url.clone(), &html)));
    let target = page
        .borrow()
        .find(&args.click)
        .with_context(|| format!("No element matches {}", args.click))?;
    let script = Rc::new(ContentScript::new(Rc::clone(&page), port, config.content.clone()));
    let (events, events_rx) = mpsc::unbounded_channel();

    let local = LocalSet::new();
    local
        .run_until(async {
            let runner = tokio::task::spawn_local(Rc::clone(&script).run(content_inbox, events_rx));

            let install_wait = config.content.initial_delay() + args.timeout;
            poll_until(install_wait, "the content script", || script.is_installed().then_some(()))
                .await?;

            match script.click(target).await {
                ClickOutcome::Sent { path, .. } => info!("Comment sent via {:?} listener", path),
                ClickOutcome::Ignored => bail!("{} is not inside a comment", args.click),
                ClickOutcome::Failed { error, .. } => bail!("Could not reach the coordinator: {}", error),
                ClickOutcome::Reloaded => bail!("The page needs a reload"),
            }

            let content = poll_until(args.timeout, "the summary", || match panel.content() {
                c @ (SummaryContent::Summary { .. } | SummaryContent::Error { .. }) => Some(c),
                _ => None,
            })
            .await?;
            println!("{}", content.render());

            if args.focus {
                if panel.focus_original().await? {
                    println!("Focused the original thread.");
                } else {
                    println!("Could not find the original thread on the page.");
                }
            }

            drop(events);
            runner.await?;
            Ok::<(), anyhow::Error>(())
        })
        .await
}
