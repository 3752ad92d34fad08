use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::watch;

use btc_ticker::binance::rest::BinanceRestClient;
use btc_ticker::config::Config;
use btc_ticker::engine::{RefreshConfig, TickerEngine, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use btc_ticker::error::AppError;
use btc_ticker::input::{parse_main_command, UiCommand};
use btc_ticker::ui;

type Engine = TickerEngine<BinanceRestClient>;

fn spawn_refresh_loop(engine: &Arc<Engine>) {
    let engine = engine.clone();
    tokio::spawn(async move {
        match engine.run().await {
            Ok(()) => {}
            // A stop/start pair resumed the loop that was already winding down.
            Err(AppError::LoopActive) => {
                tracing::debug!("Refresh loop already active, resumed in place");
            }
            Err(e) => tracing::warn!(error = %e, "Refresh loop did not start"),
        }
    });
}

/// Applies one key command. Returns a notice to show, if any.
fn handle_command(
    cmd: UiCommand,
    engine: &Arc<Engine>,
    refresh: &mut RefreshConfig,
) -> Option<String> {
    match cmd {
        UiCommand::Quit => None,
        UiCommand::ToggleAutoRefresh => {
            if engine.is_running() {
                refresh.auto_refresh = false;
                engine.stop();
                Some("auto-refresh off".to_string())
            } else {
                refresh.auto_refresh = true;
                match engine.start(*refresh) {
                    Ok(()) => {
                        spawn_refresh_loop(engine);
                        Some("auto-refresh on".to_string())
                    }
                    Err(e) => Some(e.to_string()),
                }
            }
        }
        UiCommand::IncreaseInterval | UiCommand::DecreaseInterval => {
            let next = if cmd == UiCommand::IncreaseInterval {
                refresh.interval_secs.saturating_add(1)
            } else {
                refresh.interval_secs.saturating_sub(1)
            };
            match engine.set_interval(next) {
                Ok(()) => {
                    refresh.interval_secs = next;
                    None
                }
                Err(_) => Some(format!(
                    "interval must stay within {}-{}s",
                    MIN_INTERVAL_SECS, MAX_INTERVAL_SECS
                )),
            }
        }
        UiCommand::RefreshOnce => {
            if engine.is_running() {
                return Some("auto-refresh is on; already refreshing".to_string());
            }
            let once = RefreshConfig {
                auto_refresh: false,
                interval_secs: refresh.interval_secs,
            };
            match engine.start(once) {
                Ok(()) => {
                    spawn_refresh_loop(engine);
                    Some("refreshing once".to_string())
                }
                Err(e) => Some(e.to_string()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists or set BTC_TICKER_CONFIG");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create("btc-ticker.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        symbol = %config.binance.symbol,
        rest_url = %config.binance.rest_base_url,
        auto_refresh = config.refresh.auto_refresh,
        interval_secs = config.refresh.interval_secs,
        "Starting btc-ticker"
    );

    let client = BinanceRestClient::new(
        &config.binance.rest_base_url,
        config.binance.request_timeout(),
    )
    .context("failed to build HTTP client")?;
    if let Err(e) = client.ping().await {
        tracing::warn!(error = %e, "Feed ping failed, continuing");
    }

    let engine = Arc::new(TickerEngine::new(client, &config.binance.symbol));
    let mut refresh = config.refresh.to_refresh_config();
    engine.start(refresh)?;
    spawn_refresh_loop(&engine);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    let mut terminal = ratatui::init();
    let mut notice: Option<String> = None;

    loop {
        let snapshot = engine.snapshot();
        terminal.draw(|frame| ui::render(frame, &snapshot, notice.as_deref()))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    match parse_main_command(&key.code) {
                        Some(UiCommand::Quit) => {
                            tracing::info!("User quit");
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                        Some(cmd) => {
                            notice = handle_command(cmd, &engine, &mut refresh);
                        }
                        None => {}
                    }
                }
            }
        }

        if *shutdown_rx.borrow() {
            break;
        }
    }

    engine.stop();
    ratatui::restore();
    tracing::info!(
        retained = engine.snapshot().history.len(),
        "Shutdown complete"
    );
    println!("Goodbye! Check btc-ticker.log for details.");
    Ok(())
}
