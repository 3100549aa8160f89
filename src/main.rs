mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use chrono::{Local, NaiveDate};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, warn};
use rink_api::client::SportsApi;
use rink_api::provider::ProviderKind;
use rink_api::{GameRow, StandingsGroup};
use serde::Serialize;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{msg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    match cli.command {
        Command::Help => {
            println!("{}", usage_text());
            return Ok(());
        }
        Command::Version => {
            println!("rinkside {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Json | Command::Tui | Command::ClearCache => {}
    }

    let mut settings = AppSettings::load();
    if let Some(provider) = cli.provider {
        settings.provider = provider;
    }
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    if cli.command == Command::ClearCache {
        return clear_cache(&settings);
    }

    if cli.command == Command::Json {
        for warning in &settings.warnings {
            eprintln!("warning: {warning}");
        }
        return print_json(&settings, date).await;
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);
    for warning in &settings.warnings {
        warn!("{warning}");
    }

    let api = SportsApi::new(settings.api_config());
    let provider = api.provider_name();
    let refresh = settings.refresh;
    let app = Arc::new(Mutex::new(App::new(settings, provider, date)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(api, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic refresh thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), refresh);
    let periodic_task = tokio::spawn(periodic_updater.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Command {
    #[default]
    Tui,
    Json,
    ClearCache,
    Help,
    Version,
}

#[derive(Debug, Default)]
struct Cli {
    command: Command,
    provider: Option<ProviderKind>,
    date: Option<NaiveDate>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.command = Command::Help,
            "-V" | "--version" => cli.command = Command::Version,
            "--json" => {
                if cli.command == Command::Tui {
                    cli.command = Command::Json;
                }
            }
            "--clear-cache" => cli.command = Command::ClearCache,
            "-p" | "--provider" => {
                let value = args.next().ok_or("--provider needs a value")?;
                cli.provider = Some(value.parse()?);
            }
            "-d" | "--date" => {
                let value = args.next().ok_or("--date needs a value")?;
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date '{value}' (expected YYYY-MM-DD)"))?;
                cli.date = Some(date);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
        if matches!(cli.command, Command::Help | Command::Version) {
            break;
        }
    }
    Ok(cli)
}

fn usage_text() -> &'static str {
    "rinkside - NHL scores, standings and rosters in the terminal

Usage:
  rinkside [--provider NAME] [--date YYYY-MM-DD] [--json]
  rinkside --clear-cache
  rinkside --help
  rinkside --version

Options:
  -p, --provider NAME   espn (default), nhl, sportsdata or sportradar
  -d, --date DATE       Scoreboard date (default today)
      --json            Print the day's games and standings as JSON and exit
      --clear-cache     Delete cached game summaries and exit

Environment:
  RINKSIDE_PROVIDER         Provider when --provider is not given
  RINKSIDE_SPORTSDATA_KEY   SportsData.io subscription key
  RINKSIDE_SPORTRADAR_KEY   Sportradar API key
  RINKSIDE_CACHE_DIR        Game summary cache (default: platform cache dir/rinkside)
  RINKSIDE_REFRESH_SECS     Auto-refresh period in seconds (default 60)
  RINKSIDE_TIMEOUT_SECS     HTTP timeout in seconds (default 10)
  RINKSIDE_LOG              Log level: error, warn, info, debug, trace"
}

#[derive(Serialize)]
struct JsonReport<'a> {
    date: NaiveDate,
    provider: &'a str,
    /// `null` when the schedule request failed.
    games: Option<Vec<GameRow>>,
    standings: Option<Vec<StandingsGroup>>,
}

async fn print_json(settings: &AppSettings, date: NaiveDate) -> anyhow::Result<()> {
    let api = SportsApi::new(settings.api_config());
    let games = api
        .games(date)
        .await
        .map(|loaded| loaded.data.iter().map(|g| g.row()).collect());
    let standings = api.standings(date).await.map(|loaded| loaded.data);

    let report = JsonReport {
        date,
        provider: api.provider_name(),
        games,
        standings,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn clear_cache(settings: &AppSettings) -> anyhow::Result<()> {
    let api = SportsApi::new(settings.api_config());
    match api.cache() {
        Some(cache) => {
            let removed = cache.clear()?;
            println!("removed {removed} cached summaries from {}", cache.dir().display());
        }
        None => println!("no cache directory configured"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = app.lock().await.startup_requests();
            for request in requests {
                let _ = network_requests.send(request).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::GamesLoaded { date, games } => {
            if games.is_none() {
                error!("could not load games for {date}");
            }
            app.lock().await.on_games_loaded(date, games);
        }
        NetworkResponse::StandingsLoaded { standings } => {
            if standings.is_none() {
                error!("could not load standings");
            }
            let roster_request = app.lock().await.on_standings_loaded(standings);
            if let Some(request) = roster_request {
                let _ = network_requests.send(request).await;
            }
        }
        NetworkResponse::SummaryLoaded { game_id, summary } => {
            if summary.is_none() {
                error!("could not load summary for game {game_id}");
            }
            app.lock().await.on_summary_loaded(game_id, summary);
        }
        NetworkResponse::RosterLoaded { team_id, roster } => {
            if roster.is_none() {
                error!("could not load roster for team {team_id}");
            }
            app.lock().await.on_roster_loaded(team_id, roster);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    )?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook, where there is nothing left
/// to report a failure to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
