use crate::app::MenuItem;
use chrono::{Local, NaiveDate};
use rink_api::client::Loaded;
use rink_api::{Game, GameSummary, RosterEntry, RosterGroup, StandingsGroup, find_player};
use serde_json::Value;
use std::collections::BTreeMap;

pub const NO_GAMES: &str = "No NHL games on this date";
pub const GAMES_FAILED: &str = "Could not load games.";
pub const STANDINGS_FAILED: &str = "Could not load standings.";
pub const SUMMARY_FAILED: &str = "Could not load game summary.";
pub const ROSTER_FAILED: &str = "Could not load roster.";
pub const PLAYER_NOT_FOUND: &str = "Player not found";

// ---------------------------------------------------------------------------
// Per-section load state
// ---------------------------------------------------------------------------

/// Result of the last fetch for one section of the UI.
#[derive(Debug, Default)]
pub enum Fetched<T> {
    #[default]
    Pending,
    Ready(T),
    Failed,
}

impl<T> Fetched<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetched::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed)
    }
}

/// Split a worker payload into section state and the raw JSON for the debug
/// dump.
fn unpack<T>(loaded: Option<Loaded<T>>) -> (Fetched<T>, Option<Value>) {
    match loaded {
        Some(Loaded { data, raw }) => (Fetched::Ready(data), Some(raw)),
        None => (Fetched::Failed, None),
    }
}

// ---------------------------------------------------------------------------
// Games (scoreboard for one date)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct GamesState {
    pub date: NaiveDate,
    pub games: Fetched<Vec<Game>>,
    pub selected: usize,
}

impl Default for GamesState {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            games: Fetched::Pending,
            selected: 0,
        }
    }
}

impl GamesState {
    pub fn load(&mut self, loaded: Option<Loaded<Vec<Game>>>) -> Option<Value> {
        let (games, raw) = unpack(loaded);
        self.games = games;
        let count = self.games.ready().map_or(0, Vec::len);
        self.selected = self.selected.min(count.saturating_sub(1));
        raw
    }

    /// Move to another day. The old scoreboard is dropped right away so it
    /// is never shown under the new date.
    pub fn set_date(&mut self, date: NaiveDate) {
        if self.date != date {
            self.date = date;
            self.games = Fetched::Pending;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let count = self.games.ready().map_or(0, Vec::len);
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.games.ready()?.get(self.selected)
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.games {
            Fetched::Pending => Some("Loading games..."),
            Fetched::Failed => Some(GAMES_FAILED),
            Fetched::Ready(games) if games.is_empty() => Some(NO_GAMES),
            Fetched::Ready(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StandingsState {
    pub groups: Fetched<Vec<StandingsGroup>>,
    pub scroll_offset: u16,
}

impl StandingsState {
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.groups {
            Fetched::Pending => Some("Loading standings..."),
            Fetched::Failed => Some(STANDINGS_FAILED),
            Fetched::Ready(groups) if groups.iter().all(|g| g.rows.is_empty()) => {
                Some(STANDINGS_FAILED)
            }
            Fetched::Ready(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Game detail
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DetailState {
    /// The game opened from the Games tab, if any.
    pub game: Option<Game>,
    pub summary: Fetched<GameSummary>,
    pub scroll_offset: u16,
}

impl DetailState {
    pub fn game_id(&self) -> Option<&str> {
        self.game.as_ref().map(|g| g.id.as_str())
    }

    pub fn open(&mut self, game: Game) {
        if self.game_id() != Some(game.id.as_str()) {
            self.summary = Fetched::Pending;
            self.scroll_offset = 0;
        }
        self.game = Some(game);
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        if self.game.is_none() {
            return Some("Select a game on the Games tab and press Enter");
        }
        match &self.summary {
            Fetched::Pending => Some("Loading game summary..."),
            Fetched::Failed => Some(SUMMARY_FAILED),
            Fetched::Ready(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Roster, team picker and player search
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub composing: bool,
    /// Last submitted query.
    pub query: Option<String>,
}

#[derive(Debug, Default)]
pub struct RosterState {
    /// `(team_id, display name)` sorted by name.
    pub teams: Vec<(String, String)>,
    pub team_idx: usize,
    /// Team the loaded roster belongs to.
    pub loaded_team: Option<String>,
    pub groups: Fetched<Vec<RosterGroup>>,
    pub search: SearchState,
    pub scroll_offset: u16,
}

impl RosterState {
    pub fn selected_team(&self) -> Option<&(String, String)> {
        self.teams.get(self.team_idx)
    }

    /// Replace the team list, keeping the current pick if it is still there.
    pub fn set_teams(&mut self, teams: Vec<(String, String)>) {
        let current = self.selected_team().map(|(id, _)| id.clone());
        self.team_idx = current
            .and_then(|id| teams.iter().position(|(t, _)| *t == id))
            .unwrap_or(0);
        self.teams = teams;
    }

    pub fn cycle_team(&mut self) {
        if !self.teams.is_empty() {
            self.team_idx = (self.team_idx + 1) % self.teams.len();
        }
    }

    /// Team whose roster should be fetched, if it is not the one on screen.
    pub fn needs_load(&self) -> Option<String> {
        let (id, _) = self.selected_team()?;
        match (&self.loaded_team, &self.groups) {
            (Some(loaded), Fetched::Ready(_)) if loaded == id => None,
            _ => Some(id.clone()),
        }
    }

    pub fn load(&mut self, team_id: String, loaded: Option<Loaded<Vec<RosterGroup>>>) -> Option<Value> {
        let (groups, raw) = unpack(loaded);
        self.groups = groups;
        self.loaded_team = Some(team_id);
        self.scroll_offset = 0;
        raw
    }

    pub fn search_result(&self) -> Option<Result<&RosterEntry, &'static str>> {
        let query = self.search.query.as_deref()?;
        let groups = self.groups.ready().map(Vec::as_slice).unwrap_or_default();
        Some(find_player(groups, query).ok_or(PLAYER_NOT_FOUND))
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        if self.teams.is_empty() {
            return Some("No teams yet: waiting for standings");
        }
        match &self.groups {
            Fetched::Pending => Some("Loading roster..."),
            Fetched::Failed => Some(ROSTER_FAILED),
            Fetched::Ready(groups) if groups.is_empty() => Some(ROSTER_FAILED),
            Fetched::Ready(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw payloads for the debug dump
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DebugState {
    /// Inline dump under the active tab.
    pub show: bool,
    pub raw: BTreeMap<&'static str, Value>,
    pub scroll_offset: u16,
}

impl DebugState {
    /// A failed fetch clears the old payload rather than leaving stale JSON.
    pub fn record(&mut self, section: &'static str, raw: Option<Value>) {
        match raw {
            Some(raw) => {
                self.raw.insert(section, raw);
            }
            None => {
                self.raw.remove(section);
            }
        }
    }

    pub fn pretty(&self, section: &str) -> String {
        match self.raw.get(section) {
            Some(raw) => serde_json::to_string_pretty(raw).unwrap_or_else(|e| e.to_string()),
            None => format!("(no {section} payload)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub provider: &'static str,
    pub games: GamesState,
    pub standings: StandingsState,
    pub detail: DetailState,
    pub roster: RosterState,
    pub debug: DebugState,
}

impl AppState {
    pub fn new(provider: &'static str, date: NaiveDate) -> Self {
        let mut state = Self { provider, ..Self::default() };
        state.games.date = date;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rink_api::Competitor;
    use serde_json::json;

    fn game(id: &str) -> Game {
        Game {
            id: id.into(),
            home: Competitor { name: "Boston Bruins".into(), ..Default::default() },
            away: Competitor { name: "Toronto Maple Leafs".into(), ..Default::default() },
            ..Default::default()
        }
    }

    fn loaded<T>(data: T) -> Option<Loaded<T>> {
        Some(Loaded { data, raw: json!({"ok": true}) })
    }

    #[test]
    fn failed_games_fetch_shows_could_not_load() {
        let mut state = GamesState::default();
        assert_eq!(state.load(None), None);
        assert_eq!(state.empty_message(), Some(GAMES_FAILED));
    }

    #[test]
    fn empty_day_is_not_a_failure() {
        let mut state = GamesState::default();
        state.load(loaded(vec![]));
        assert_eq!(state.empty_message(), Some(NO_GAMES));
    }

    #[test]
    fn selection_is_clamped_when_the_list_shrinks() {
        let mut state = GamesState::default();
        state.load(loaded(vec![game("1"), game("2"), game("3")]));
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 2);

        state.load(loaded(vec![game("1")]));
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_game().map(|g| g.id.as_str()), Some("1"));
    }

    #[test]
    fn changing_date_drops_the_old_scoreboard() {
        let mut state = GamesState::default();
        state.load(loaded(vec![game("1")]));
        state.set_date(state.date.succ_opt().unwrap());
        assert!(matches!(state.games, Fetched::Pending));
    }

    #[test]
    fn standings_failure_and_empty_share_a_message() {
        let mut state = StandingsState::default();
        state.groups = Fetched::Failed;
        assert_eq!(state.empty_message(), Some(STANDINGS_FAILED));
        state.groups = Fetched::Ready(vec![StandingsGroup::default()]);
        assert_eq!(state.empty_message(), Some(STANDINGS_FAILED));
    }

    #[test]
    fn detail_resets_when_another_game_opens() {
        let mut detail = DetailState::default();
        assert!(detail.empty_message().is_some());

        detail.open(game("1"));
        detail.summary = Fetched::Failed;
        assert_eq!(detail.empty_message(), Some(SUMMARY_FAILED));

        detail.open(game("1"));
        assert!(detail.summary.is_failed(), "same game keeps its state");

        detail.open(game("2"));
        assert!(matches!(detail.summary, Fetched::Pending));
    }

    #[test]
    fn team_pick_survives_list_refresh() {
        let mut roster = RosterState::default();
        roster.set_teams(vec![("1".into(), "Boston Bruins".into()), ("10".into(), "Toronto".into())]);
        roster.cycle_team();
        assert_eq!(roster.selected_team().map(|t| t.0.as_str()), Some("10"));

        roster.set_teams(vec![
            ("6".into(), "Anaheim Ducks".into()),
            ("1".into(), "Boston Bruins".into()),
            ("10".into(), "Toronto".into()),
        ]);
        assert_eq!(roster.selected_team().map(|t| t.0.as_str()), Some("10"));
    }

    #[test]
    fn roster_loads_only_when_team_changes() {
        let mut roster = RosterState::default();
        assert_eq!(roster.needs_load(), None);

        roster.set_teams(vec![("1".into(), "Boston Bruins".into())]);
        assert_eq!(roster.needs_load().as_deref(), Some("1"));

        roster.load("1".into(), loaded(vec![RosterGroup::default()]));
        assert_eq!(roster.needs_load(), None);

        roster.load("1".into(), None);
        assert_eq!(roster.needs_load().as_deref(), Some("1"));
        assert_eq!(roster.empty_message(), Some(ROSTER_FAILED));
    }

    #[test]
    fn player_search_reports_not_found() {
        let mut roster = RosterState::default();
        roster.set_teams(vec![("1".into(), "Boston Bruins".into())]);
        roster.load(
            "1".into(),
            loaded(rink_api::group_roster(vec![RosterEntry {
                id: "8".into(),
                name: "David Pastrnak".into(),
                position: "RW".into(),
                photo: None,
            }])),
        );
        assert!(roster.search_result().is_none());

        roster.search.query = Some("pastr".into());
        assert_eq!(roster.search_result().map(|r| r.map(|p| p.id.as_str())), Some(Ok("8")));

        roster.search.query = Some("Crosby".into());
        assert_eq!(roster.search_result().map(|r| r.map(|p| p.id.as_str())), Some(Err(PLAYER_NOT_FOUND)));
    }

    #[test]
    fn debug_dump_drops_payload_on_failure() {
        let mut debug = DebugState::default();
        debug.record("games", Some(json!({"events": []})));
        assert!(debug.pretty("games").contains("events"));
        debug.record("games", None);
        assert_eq!(debug.pretty("games"), "(no games payload)");
    }
}
