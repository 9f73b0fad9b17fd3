//! Shop Dashboard
//!
//! Console dashboard for one shop user: keeps the account balance and order
//! history in sync with the backend and reacts to push updates.
//!
//! Usage: `shop-dashboard [config.yaml]`, then type `help`.

use anyhow::Context;
use crossbeam_channel::Receiver;
use shop_dashboard::bin_common::{
    console::HELP, load_config_from_env, parse_args, BinaryRunner, Command, CommandError,
    ConfigType, RunConfig,
};
use shop_dashboard::shopsync::{
    init_tracing, ChannelNotifier, DashboardConfig, DashboardHost, Notification, NotificationKind,
    RestClient, Session, SessionSettings, ShutdownManager,
};
use std::sync::Arc;
use std::thread;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

struct ConsoleApp {
    run_config: RunConfig,
    config: DashboardConfig,
    host: DashboardHost,
    shutdown: ShutdownManager,
}

impl ConsoleApp {
    fn new(config: DashboardConfig, notifier: ChannelNotifier) -> anyhow::Result<Self> {
        let api = RestClient::new(config.api.base_url.clone(), config.request_timeout())
            .context("Failed to build HTTP client")?;
        let host = DashboardHost::new(
            Arc::new(api),
            Arc::new(notifier),
            SessionSettings::from_config(&config),
        );

        Ok(Self {
            run_config: RunConfig::new("Shop Dashboard"),
            config,
            host,
            shutdown: ShutdownManager::new(),
        })
    }

    async fn session(&self) -> Option<Arc<Session>> {
        let session = self.host.session().await;
        if session.is_none() {
            warn!("No active session");
        }
        session
    }

    async fn handle(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::SwitchUser(identity) => {
                self.host.switch_identity(identity).await?;
            }
            Command::Refresh => {
                self.host.refresh().await;
            }
            Command::CreateAccount => {
                if let Some(session) = self.session().await {
                    session.store().create_account().await;
                }
            }
            Command::Topup(amount) => {
                if let Some(session) = self.session().await {
                    session.store().topup(amount).await;
                }
            }
            Command::Order(draft) => {
                if let Some(session) = self.session().await {
                    session.store().create_order(draft).await;
                }
            }
            Command::Show => {
                if let Some(session) = self.session().await {
                    print_snapshot(&session);
                }
            }
            Command::Stats => {
                if let Some(session) = self.session().await {
                    let stats = session.store().stats();
                    println!(
                        "orders: {} | finished: {} | spent: {:.2} | balance: {:.2}",
                        stats.total_orders, stats.finished_orders, stats.total_spent, stats.balance
                    );
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => self.shutdown.trigger(),
        }
        Ok(())
    }
}

impl BinaryRunner for ConsoleApp {
    async fn run(&mut self) -> anyhow::Result<()> {
        self.shutdown.spawn_signal_handler();

        let identity = self.config.identity()?;
        self.host.switch_identity(identity).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while self.shutdown.is_running() {
            let line = tokio::select! {
                _ = self.shutdown.wait() => break,
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                info!("stdin closed");
                break;
            };

            match Command::parse(&line) {
                Ok(command) => {
                    if let Err(e) = self.handle(command).await {
                        warn!("Command failed: {:#}", e);
                    }
                }
                Err(CommandError::Empty) => {}
                Err(e) => println!("{}", e),
            }
        }

        self.host.shutdown().await;
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

fn print_snapshot(session: &Session) {
    let state = session.snapshot();
    let live = if session.is_live() { "online" } else { "offline" };
    println!("user {} [{}]", session.identity(), live);

    if state.loading.is_loading() {
        println!("  loading...");
        return;
    }

    match &state.account {
        Some(account) => println!("  account #{}: balance {:.2}", account.id, account.balance),
        None => println!("  no account (use `account create`)"),
    }

    if state.orders.is_empty() {
        println!("  no orders");
    }
    for order in &state.orders {
        println!(
            "  #{:<5} {:>10.2}  {:<10} {}",
            order.id,
            order.amount,
            order.status,
            order.description.as_deref().unwrap_or("-")
        );
    }
}

/// Render notifications off the runtime
fn spawn_renderer(notifications: Receiver<Notification>) {
    thread::spawn(move || {
        for notification in notifications {
            let tag = match notification.kind {
                NotificationKind::Success => "ok",
                NotificationKind::Info => "info",
                NotificationKind::Error => "error",
            };
            println!("[{}] {}", tag, notification.message);
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config_path = match parse_args().into_iter().next() {
        Some(path) => load_config_from_env(ConfigType::Custom(path)),
        None => load_config_from_env(ConfigType::Dashboard),
    };
    let config = DashboardConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_tracing(&config.log_level);
    config.log();

    let (notifier, notifications) = ChannelNotifier::new();
    spawn_renderer(notifications);

    let mut app = ConsoleApp::new(config, notifier)?;
    app.execute().await
}
