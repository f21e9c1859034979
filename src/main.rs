//! IoT Console - Main Entry Point
//!
//! Terminal dashboard and command-line client for the IoT device-management API

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use iot_console::app::{self, Action, ListRequest, MaintenanceView};
use iot_console::constants::TOKEN_ENV_VAR;
use iot_console::domain::config::{AppConfig, LoggingConfig};
use iot_console::error::Error;
use iot_console::helpers::get_or_create_data_dir;
use iot_console::i18n;
use iot_console::listing::{FacetKind, FacetValue, ListQuery, SortKey, SortSpec};
use iot_console::services::Section;
use iot_console::utils::config_store::ConfigStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "IoT device-management console")]
struct Cli {
    /// Config file; defaults to the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the gateway base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the bearer token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Override the display locale (en, zh)
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Live dashboard, refreshed by the section pollers (default)
    ///
    /// Type `d [id]` to dismiss a banner, `r` to refresh, `q` to quit.
    Watch,
    /// Fetch every section once and print the dashboard
    Snapshot {
        /// Print the aggregated view as JSON
        #[arg(long)]
        json: bool,
    },
    /// List devices
    Devices(ListArgs),
    /// List automation rules
    Rules(ListArgs),
    /// List maintenance tasks
    Maintenance {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, value_enum, default_value_t = MaintenanceViewArg::All)]
        view: MaintenanceViewArg,
    },
    /// List notifications
    Notifications(ListArgs),
    /// List users
    Users(ListArgs),
    /// List safety precautions
    Safety {
        #[command(flatten)]
        list: ListArgs,
        /// Only precautions for this device
        #[arg(long)]
        device: Option<String>,
    },
    /// Device mutations
    #[command(subcommand)]
    Device(DeviceCommand),
    /// Rule mutations
    #[command(subcommand)]
    Rule(RuleCommand),
    /// Maintenance mutations
    #[command(subcommand)]
    Task(TaskCommand),
    /// Notification mutations
    #[command(subcommand)]
    Notification(NotificationCommand),
    /// Inspect or edit the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive substring search
    #[arg(long, short)]
    search: Option<String>,
    /// Facet filter as `kind=value`, e.g. `status=online`; repeatable
    #[arg(long = "filter", short = 'f')]
    filters: Vec<String>,
    /// Sort key: name, status or date
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MaintenanceViewArg {
    All,
    Upcoming,
    Today,
    DayWise,
}

impl From<MaintenanceViewArg> for MaintenanceView {
    fn from(arg: MaintenanceViewArg) -> Self {
        match arg {
            MaintenanceViewArg::All => MaintenanceView::All,
            MaintenanceViewArg::Upcoming => MaintenanceView::Upcoming,
            MaintenanceViewArg::Today => MaintenanceView::Today,
            MaintenanceViewArg::DayWise => MaintenanceView::DayWise,
        }
    }
}

#[derive(Subcommand, Debug)]
enum DeviceCommand {
    /// Create from a JSON draft file
    Create { file: PathBuf },
    Delete { id: String },
    /// Set the status token, e.g. ONLINE
    Status { id: String, status: String },
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    /// Create from a JSON draft file
    Create { file: PathBuf },
    /// Replace from a JSON draft file
    Update { id: String, file: PathBuf },
    Delete { id: String },
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Create from a JSON draft file
    Create { file: PathBuf },
    /// Replace from a JSON draft file
    Update { id: String, file: PathBuf },
    Delete { id: String },
    Complete { id: String },
    Assign { id: String, assignee: String },
}

#[derive(Subcommand, Debug)]
enum NotificationCommand {
    Read { id: String },
    ReadAll,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective config (token redacted)
    Show,
    /// Write a default config file if none exists
    Init,
    /// Store an encrypted bearer token
    SetToken {
        #[arg(value_name = "TOKEN")]
        value: String,
    },
    /// Print the config JSON schema
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::at_default_location()?,
    };

    let mut config = store.load()?;
    apply_overrides(&mut config, &cli);
    let guard = init_tracing(&config.logging)?;

    let locale = config.display.locale();
    match run(cli, &store, &config).await {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => match err.downcast_ref::<Error>() {
            Some(app_err) => {
                tracing::error!(error = %app_err, "Command failed");
                eprintln!("{}", i18n::error_message(locale, app_err));
                drop(guard);
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        && !token.trim().is_empty()
    {
        config.gateway.token = Some(token);
    }
    if let Some(token) = &cli.token {
        config.gateway.token = Some(token.clone());
    }
    if let Some(url) = &cli.base_url {
        config.gateway.base_url = url.clone();
    }
    if let Some(locale) = &cli.locale {
        config.display.locale = Some(locale.clone());
    }
}

/// Stderr output plus an optional daily rolling file; the guard flushes the file writer
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if logging.file {
        let dir = get_or_create_data_dir()?;
        let appender = tracing_appender::rolling::daily(dir, "iot-console.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        Ok(None)
    }
}

async fn run(cli: Cli, store: &ConfigStore, config: &AppConfig) -> anyhow::Result<String> {
    let command = cli.command.unwrap_or(Command::Watch);
    tracing::debug!(?command, "Dispatching");

    let output = match command {
        Command::Watch => {
            app::run_watch(config).await?;
            String::new()
        }
        Command::Snapshot { json } => app::run_snapshot(config, json).await?,
        Command::Devices(list) => list_section(config, Section::Devices, list, None).await?,
        Command::Rules(list) => list_section(config, Section::Rules, list, None).await?,
        Command::Maintenance { list, view } => {
            let mut request = list_request(list)?;
            request.maintenance_view = view.into();
            app::run_list(config, Section::Maintenance, &request).await?
        }
        Command::Notifications(list) => {
            list_section(config, Section::Notifications, list, None).await?
        }
        Command::Users(list) => list_section(config, Section::Users, list, None).await?,
        Command::Safety { list, device } => {
            list_section(config, Section::Safety, list, device).await?
        }
        Command::Device(cmd) => app::run_action(config, device_action(cmd)?).await?,
        Command::Rule(cmd) => app::run_action(config, rule_action(cmd)?).await?,
        Command::Task(cmd) => app::run_action(config, task_action(cmd)?).await?,
        Command::Notification(cmd) => {
            let action = match cmd {
                NotificationCommand::Read { id } => Action::MarkNotificationRead(id),
                NotificationCommand::ReadAll => Action::MarkAllNotificationsRead,
            };
            app::run_action(config, action).await?
        }
        Command::Config(cmd) => config_command(cmd, store, config)?,
    };
    Ok(output)
}

// ==================== Lists ====================

async fn list_section(
    config: &AppConfig,
    section: Section,
    list: ListArgs,
    device_id: Option<String>,
) -> anyhow::Result<String> {
    let mut request = list_request(list)?;
    request.device_id = device_id;
    Ok(app::run_list(config, section, &request).await?)
}

fn list_request(args: ListArgs) -> anyhow::Result<ListRequest> {
    let mut query = ListQuery::new();
    if let Some(term) = args.search {
        query = query.search(term);
    }
    for filter in &args.filters {
        let Some((kind, value)) = filter.split_once('=') else {
            bail!("filter must be `kind=value`, got `{filter}`");
        };
        let kind: FacetKind = kind.trim().parse()?;
        query = query.facet(kind, FacetValue::parse(value.trim()));
    }
    if let Some(key) = args.sort {
        let key: SortKey = key.parse()?;
        let spec = if args.desc {
            SortSpec::descending(key)
        } else {
            SortSpec::ascending(key)
        };
        query = query.sort(spec);
    }
    Ok(ListRequest {
        query,
        page: args.page.max(1),
        ..Default::default()
    })
}

// ==================== Mutations ====================

fn read_draft<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading draft {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing draft {}", path.display()))
}

fn device_action(cmd: DeviceCommand) -> anyhow::Result<Action> {
    Ok(match cmd {
        DeviceCommand::Create { file } => Action::CreateDevice(read_draft(&file)?),
        DeviceCommand::Delete { id } => Action::DeleteDevice(id),
        DeviceCommand::Status { id, status } => Action::SetDeviceStatus {
            id,
            status: status.to_uppercase().into(),
        },
    })
}

fn rule_action(cmd: RuleCommand) -> anyhow::Result<Action> {
    Ok(match cmd {
        RuleCommand::Create { file } => Action::CreateRule(read_draft(&file)?),
        RuleCommand::Update { id, file } => Action::UpdateRule {
            id,
            draft: read_draft(&file)?,
        },
        RuleCommand::Delete { id } => Action::DeleteRule(id),
        RuleCommand::Toggle { id } => Action::ToggleRule(id),
    })
}

fn task_action(cmd: TaskCommand) -> anyhow::Result<Action> {
    Ok(match cmd {
        TaskCommand::Create { file } => Action::CreateMaintenance(read_draft(&file)?),
        TaskCommand::Update { id, file } => Action::UpdateMaintenance {
            id,
            draft: read_draft(&file)?,
        },
        TaskCommand::Delete { id } => Action::DeleteMaintenance(id),
        TaskCommand::Complete { id } => Action::CompleteMaintenance(id),
        TaskCommand::Assign { id, assignee } => Action::AssignMaintenance {
            id,
            assignee_id: assignee,
        },
    })
}

// ==================== Config ====================

fn config_command(
    cmd: ConfigCommand,
    store: &ConfigStore,
    config: &AppConfig,
) -> anyhow::Result<String> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if shown.gateway.token.is_some() {
                shown.gateway.token = Some("********".to_string());
            }
            Ok(format!(
                "# {}\n{}",
                store.path().display(),
                toml::to_string_pretty(&shown)?
            ))
        }
        ConfigCommand::Init => {
            if store.path().exists() {
                return Ok(format!("{} already exists\n", store.path().display()));
            }
            store.save(&AppConfig::default())?;
            Ok(format!("Wrote {}\n", store.path().display()))
        }
        ConfigCommand::SetToken { value } => {
            let mut on_disk = store.load()?;
            on_disk.gateway.token = Some(value);
            store.save(&on_disk)?;
            Ok(format!("Token saved to {}\n", store.path().display()))
        }
        ConfigCommand::Schema => {
            let schema = schemars::schema_for!(AppConfig);
            Ok(serde_json::to_string_pretty(&schema)? + "\n")
        }
    }
}
