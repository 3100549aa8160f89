use crate::state::network::LoadingState;
use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use rink_api::client::Loaded;
use rink_api::{Game, GameSummary, RosterGroup, StandingsGroup};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadGames { date: NaiveDate },
    LoadStandings { date: NaiveDate },
    LoadSummary { game_id: String },
    LoadRoster { team_id: String },
    /// Reload whatever was last requested: the day's games, standings, and
    /// the open game and team if any.
    RefreshAll,
}

/// `None` payloads mean the upstream call failed; the UI shows its
/// "could not load" message for that section.
#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    GamesLoaded { date: NaiveDate, games: Option<Loaded<Vec<Game>>> },
    StandingsLoaded { standings: Option<Loaded<Vec<StandingsGroup>>> },
    SummaryLoaded { game_id: String, summary: Option<Loaded<GameSummary>> },
    RosterLoaded { team_id: String, roster: Option<Loaded<Vec<RosterGroup>>> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
