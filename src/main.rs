use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flockwatch::config::Settings;
use flockwatch::tools::{self, CheckArgs, NotFoundArgs};
use flockwatch::{
    events, ui, App, AppIdSource, ApplicationsAppIdSource, DashboardOptions, FileAppIdSource,
    FlatSeriesPolicy, Logger, LoggerOptions, Poller, PollerOptions,
};
use flockwatch_adapters::spark::SparkAdapter;

/// Event-poll tick of the dashboard, independent of the refresh interval.
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "flockwatch")]
#[command(version)]
#[command(about = "Dashboard, telemetry logger and batch helpers for flock experiments on Spark")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Live terminal dashboard
    Dashboard(DashboardArgs),
    /// Pipe-delimited telemetry records on stdout
    Log(LogArgs),
    /// Run BFE and PFlock on a dataset and compare their flocks
    Check(CheckArgs),
    /// Extract the points of not-found flocks into a dataset
    Notfound(NotFoundArgs),
}

/// Where the driver web UI listens.
#[derive(Args, Debug)]
struct MasterArgs {
    /// Master host
    #[arg(short, long)]
    master: Option<String>,

    /// Master web UI port
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    #[command(flatten)]
    master: MasterArgs,

    /// File the job driver writes its application id to
    #[arg(long)]
    app_id_file: Option<PathBuf>,

    /// How flat chart windows are nudged
    #[arg(long, value_enum)]
    flat_policy: Option<FlatSeriesPolicy>,

    /// Milliseconds between polls
    #[arg(short, long)]
    refresh_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct LogArgs {
    #[command(flatten)]
    master: MasterArgs,

    /// Seconds between cycles
    #[arg(short, long)]
    time: Option<u64>,

    /// Auxiliary log tailed for phase markers
    #[arg(short, long)]
    nohup: Option<PathBuf>,

    /// Read the application id from this file instead of the API listing
    #[arg(long)]
    app_id_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())
        .context("Failed to load settings")?;

    match cli.command {
        Command::Dashboard(args) => {
            apply_master(&mut settings, &args.master);
            if let Some(path) = args.app_id_file {
                settings.dashboard.app_id_file = path;
            }
            if let Some(policy) = args.flat_policy {
                settings.dashboard.flat_policy = policy;
            }
            if let Some(ms) = args.refresh_ms {
                settings.dashboard.refresh_ms = ms;
            }
            settings.validate()?;
            init_dashboard_tracing(&settings)?;
            run_dashboard(&settings)
        }
        Command::Log(args) => {
            apply_master(&mut settings, &args.master);
            if let Some(secs) = args.time {
                settings.logger.interval_secs = secs;
            }
            if args.nohup.is_some() {
                settings.logger.nohup = args.nohup;
            }
            if args.app_id_file.is_some() {
                settings.logger.app_id_file = args.app_id_file;
            }
            settings.validate()?;
            init_tracing(io::stderr);
            run_logger(&settings)
        }
        Command::Check(args) => {
            init_tracing(io::stderr);
            let code = tools::check::run(&args)?;
            std::process::exit(code);
        }
        Command::Notfound(args) => {
            init_tracing(io::stderr);
            let path = tools::notfound::run(&args)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn apply_master(settings: &mut Settings, args: &MasterArgs) {
    if let Some(ref host) = args.master {
        settings.master.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.master.port = port;
    }
}

fn init_tracing<W>(writer: W)
where
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).init();
}

/// The dashboard owns the terminal, so diagnostics go to the configured log
/// file or nowhere.
fn init_dashboard_tracing(settings: &Settings) -> Result<()> {
    match settings.dashboard.log_file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => init_tracing(io::sink),
    }
    Ok(())
}

fn spark_adapter(settings: &Settings) -> Result<SparkAdapter> {
    SparkAdapter::builder()
        .endpoint(settings.endpoint())
        .timeout(settings.timeout())
        .build()
        .context("Failed to build HTTP client")
}

fn current_thread_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn run_logger(settings: &Settings) -> Result<()> {
    let app_id: Box<dyn AppIdSource> = match settings.logger.app_id_file {
        Some(ref path) => Box::new(FileAppIdSource::new(path)),
        None => Box::new(ApplicationsAppIdSource::new()),
    };
    let poller = Poller::new(
        Box::new(spark_adapter(settings)?),
        app_id,
        PollerOptions {
            task_rows: settings.logger.page_size,
            all_active_stages: true,
        },
    );
    let options = LoggerOptions {
        interval: Duration::from_secs(settings.logger.interval_secs),
        phase_log: settings.logger.nohup.clone(),
    };

    let rt = current_thread_runtime()?;
    let mut logger = Logger::new(poller, io::stdout(), options);
    rt.block_on(logger.run()).context("Failed to write records")
}

fn run_dashboard(settings: &Settings) -> Result<()> {
    let poller = Poller::new(
        Box::new(spark_adapter(settings)?),
        Box::new(FileAppIdSource::new(&settings.dashboard.app_id_file)),
        PollerOptions {
            task_rows: settings.dashboard.task_rows,
            all_active_stages: false,
        },
    );
    let options = DashboardOptions {
        panels: settings.dashboard.panels,
        window: settings.dashboard.window,
        task_rows: settings.dashboard.task_rows,
        flat_policy: settings.dashboard.flat_policy,
    };
    let refresh_interval = Duration::from_millis(settings.dashboard.refresh_ms);

    let rt = current_thread_runtime()?;
    // Detect the theme before raw mode takes over the terminal.
    let mut app = App::new(poller, options);
    info!(source = %app.source_description(), "dashboard started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    rt.block_on(app.refresh());
    let result = run_app(&mut terminal, &mut app, &rt, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rt: &Runtime,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(Event::Key(key)) = events::poll_event(TICK)? {
            events::handle_key_event(app, key);
        }

        if app.refresh_requested || last_refresh.elapsed() >= refresh_interval {
            rt.block_on(app.refresh());
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
