//! Weblauncher: a multi-window web-session launcher.
//!
//! Entry point: runs a console demo on the headless engine. Pass `--persist`
//! to keep state in the platform data directory instead of memory.

use std::error::Error;
use std::sync::Arc;

use weblauncher::app::{Collaborators, Launcher, LauncherEvent};
use weblauncher::database::connection::Database;
use weblauncher::engine::headless::{EngineJournal, HeadlessEngineFactory};
use weblauncher::services::collaborators::{LogKeepAlive, LogOpener};
use weblauncher::services::file_chooser::LogFileChooser;
use weblauncher::services::navigation_policy::{extract_host, should_open_externally};
use weblauncher::types::session::SurfaceId;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Weblauncher v{} — Demo Mode                  ║", env!("CARGO_PKG_VERSION"));
    println!("║     Multi-window launcher with a bounded session pool       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let db = if std::env::args().any(|a| a == "--persist") {
        let path = weblauncher::platform::database_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        println!("  Database: {}", path.display());
        Database::open(path)?
    } else {
        println!("  Database: in memory");
        Database::open_in_memory()?
    };
    let db = Arc::new(db);

    demo_navigation_policy();

    let factory = HeadlessEngineFactory::new();
    let journal = factory.journal();
    let mut launcher = Launcher::with_database(
        db,
        Collaborators {
            engine_factory: Box::new(factory),
            external_opener: Box::new(LogOpener),
            keep_alive: Box::new(LogKeepAlive::default()),
            file_chooser: Box::new(LogFileChooser),
        },
    )?;

    demo_windows(&mut launcher)?;
    demo_pool(&mut launcher, &journal)?;
    demo_event_loop(launcher, &journal).await;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished.");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_navigation_policy() {
    section("Navigation Policy");

    let whitelist = vec!["example.com".to_string()];
    for (current, target) in [
        ("https://example.com/a", "https://sub.example.com/b"),
        ("https://example.com/a", "https://other.org/"),
        ("https://example.com/a", "about:blank"),
    ] {
        println!(
            "  {} -> {} (host {:?}): external = {}",
            current,
            target,
            extract_host(target),
            should_open_externally(current, target, &whitelist)
        );
    }
    println!("  ✓ NavigationPolicy OK");
    println!();
}

fn demo_windows(launcher: &mut Launcher) -> Result<(), Box<dyn Error>> {
    section("Window Repository");

    while launcher.windows().len() < 4 {
        let n = launcher.windows().len() + 1;
        launcher.add_window(&format!("Window {}", n), &format!("https://site{}.test", n))?;
    }
    for window in launcher.windows() {
        println!("  [{}] {} -> {}", window.order, window.name, window.url);
    }
    println!("  Offscreen limit: {}", launcher.offscreen_limit());
    println!("  ✓ WindowRepository OK");
    println!();
    Ok(())
}

fn demo_pool(launcher: &mut Launcher, journal: &EngineJournal) -> Result<(), Box<dyn Error>> {
    section("Session Pool");

    launcher.settings_mut().update_max_alive(2)?;
    launcher.sync_settings();
    println!("  maxAlive = {}", launcher.pool().settings().max_alive);

    let ids: Vec<String> = launcher.windows().iter().map(|w| w.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        launcher.show_window(id, SurfaceId(i as u64));
        println!(
            "  Showed {} -> attached {}/{} pooled",
            id,
            launcher.pool().attached_count(),
            launcher.pool().len()
        );
    }

    if let Some(last) = ids.last() {
        launcher.on_renderer_crashed(last);
        println!(
            "  Crash of {}: recreated, {} engines built so far",
            last,
            launcher.pool().sessions_created()
        );
    }
    println!("  Journal holds {} engine calls", journal.records().len());
    println!("  ✓ SessionPool OK");
    println!();
    Ok(())
}

async fn demo_event_loop(mut launcher: Launcher, journal: &EngineJournal) {
    section("Event Loop");

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let events = [
        LauncherEvent::UpdateSetting {
            key: "refresh_policy".to_string(),
            value: serde_json::json!("ALL"),
        },
        LauncherEvent::NetworkChanged { available: false },
        LauncherEvent::NetworkChanged { available: true },
        LauncherEvent::TrimMemory,
        LauncherEvent::Shutdown,
    ];
    for event in events {
        if tx.send(event).is_err() {
            break;
        }
    }

    let before = journal.records().len();
    launcher.run(rx).await;
    println!("  Loop handled events; {} new engine calls", journal.records().len() - before);
    println!("  Pool empty after shutdown: {}", launcher.pool().is_empty());
    println!("  ✓ Launcher OK");
}
