use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Fetched};
use crate::state::messages::NetworkRequest;
use chrono::{Duration, Local, NaiveDate};
use rink_api::client::Loaded;
use rink_api::provider::teams_from_standings;
use rink_api::{Game, GameSummary, RosterGroup, StandingsGroup};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Games,
    Standings,
    GameDetail,
    Roster,
    Debug,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings, provider: &'static str, date: NaiveDate) -> Self {
        Self {
            state: AppState::new(provider, date),
            settings,
        }
    }

    /// Requests that populate every tab for the current date.
    pub fn startup_requests(&self) -> Vec<NetworkRequest> {
        let date = self.state.games.date;
        vec![
            NetworkRequest::LoadGames { date },
            NetworkRequest::LoadStandings { date },
        ]
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_games_loaded(&mut self, date: NaiveDate, games: Option<Loaded<Vec<Game>>>) {
        if date != self.state.games.date {
            log::debug!("dropping stale scoreboard for {date}");
            return;
        }
        let raw = self.state.games.load(games);
        self.state.debug.record("games", raw);

        // Keep the open game's header (score, clock) current.
        if let Some(open) = self.state.detail.game_id() {
            let fresh = self
                .state
                .games
                .games
                .ready()
                .and_then(|games| games.iter().find(|g| g.id == open))
                .cloned();
            if fresh.is_some() {
                self.state.detail.game = fresh;
            }
        }
    }

    /// Returns the roster request to send if the team list just became
    /// available while the Roster tab is showing.
    pub fn on_standings_loaded(
        &mut self,
        standings: Option<Loaded<Vec<StandingsGroup>>>,
    ) -> Option<NetworkRequest> {
        let (groups, raw) = match standings {
            Some(Loaded { data, raw }) => (Some(data), Some(raw)),
            None => (None, None),
        };
        self.state.debug.record("standings", raw);

        match groups {
            Some(groups) => {
                let teams = teams_from_standings(&groups);
                if !teams.is_empty() {
                    self.state.roster.set_teams(teams);
                }
                self.state.standings.groups = Fetched::Ready(groups);
            }
            None => self.state.standings.groups = Fetched::Failed,
        }

        if self.state.active_tab == MenuItem::Roster {
            self.roster_request()
        } else {
            None
        }
    }

    pub fn on_summary_loaded(&mut self, game_id: String, summary: Option<Loaded<GameSummary>>) {
        if self.state.detail.game_id() != Some(game_id.as_str()) {
            log::debug!("dropping summary for game {game_id}, no longer open");
            return;
        }
        let (fetched, raw) = match summary {
            Some(Loaded { data, raw }) => (Fetched::Ready(data), Some(raw)),
            None => (Fetched::Failed, None),
        };
        self.state.detail.summary = fetched;
        self.state.debug.record("summary", raw);
    }

    pub fn on_roster_loaded(&mut self, team_id: String, roster: Option<Loaded<Vec<RosterGroup>>>) {
        let selected = self.state.roster.selected_team().map(|(id, _)| id.as_str());
        if selected != Some(team_id.as_str()) {
            log::debug!("dropping roster for team {team_id}, no longer selected");
            return;
        }
        let raw = self.state.roster.load(team_id, roster);
        self.state.debug.record("roster", raw);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn toggle_debug(&mut self) {
        self.state.debug.show = !self.state.debug.show;
    }

    // -----------------------------------------------------------------------
    // Date picker
    // -----------------------------------------------------------------------

    pub fn shift_date(&mut self, days: i64) -> NetworkRequest {
        let date = self.state.games.date + Duration::days(days);
        self.set_date(date)
    }

    pub fn jump_to_today(&mut self) -> NetworkRequest {
        self.set_date(Local::now().date_naive())
    }

    fn set_date(&mut self, date: NaiveDate) -> NetworkRequest {
        self.state.games.set_date(date);
        NetworkRequest::LoadGames { date }
    }

    // -----------------------------------------------------------------------
    // Games and detail
    // -----------------------------------------------------------------------

    /// Open the highlighted game on the detail tab.
    pub fn open_selected_game(&mut self) -> Option<NetworkRequest> {
        let game = self.state.games.selected_game()?.clone();
        let game_id = game.id.clone();
        self.state.detail.open(game);
        self.update_tab(MenuItem::GameDetail);
        Some(NetworkRequest::LoadSummary { game_id })
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    pub fn roster_request(&self) -> Option<NetworkRequest> {
        self.state
            .roster
            .needs_load()
            .map(|team_id| NetworkRequest::LoadRoster { team_id })
    }

    pub fn cycle_team(&mut self) -> Option<NetworkRequest> {
        self.state.roster.cycle_team();
        self.state.roster.search.query = None;
        self.roster_request()
    }

    pub fn start_search(&mut self) {
        let search = &mut self.state.roster.search;
        search.composing = true;
        search.input.clear();
    }

    pub fn submit_search(&mut self) {
        let search = &mut self.state.roster.search;
        search.composing = false;
        let query = search.input.trim().to_owned();
        search.query = (!query.is_empty()).then_some(query);
    }

    pub fn cancel_search(&mut self) {
        let search = &mut self.state.roster.search;
        search.composing = false;
        search.input.clear();
    }

    /// Scroll offset of whatever the active tab scrolls.
    pub fn scroll_mut(&mut self) -> Option<&mut u16> {
        match self.state.active_tab {
            MenuItem::Standings => Some(&mut self.state.standings.scroll_offset),
            MenuItem::GameDetail => Some(&mut self.state.detail.scroll_offset),
            MenuItem::Roster => Some(&mut self.state.roster.scroll_offset),
            MenuItem::Debug => Some(&mut self.state.debug.scroll_offset),
            MenuItem::Games | MenuItem::Help => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_state::{GAMES_FAILED, SUMMARY_FAILED};
    use rink_api::{Competitor, StandingsRow};
    use serde_json::json;

    fn app() -> App {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        App::new(AppSettings::default(), "espn", date)
    }

    fn game(id: &str, home_score: Option<u16>) -> Game {
        Game {
            id: id.into(),
            home: Competitor { name: "Boston Bruins".into(), score: home_score, ..Default::default() },
            away: Competitor { name: "Toronto Maple Leafs".into(), ..Default::default() },
            ..Default::default()
        }
    }

    fn standings() -> Vec<StandingsGroup> {
        vec![StandingsGroup {
            name: "Atlantic".into(),
            rows: vec![
                StandingsRow { team_id: "1".into(), team: "Boston Bruins".into(), ..Default::default() },
                StandingsRow { team_id: "21".into(), team: "Toronto Maple Leafs".into(), ..Default::default() },
            ],
        }]
    }

    #[test]
    fn startup_loads_games_and_standings_for_the_picked_date() {
        let requests = app().startup_requests();
        assert!(matches!(
            requests.as_slice(),
            [NetworkRequest::LoadGames { .. }, NetworkRequest::LoadStandings { .. }]
        ));
    }

    #[test]
    fn transport_failure_renders_games_message() {
        let mut app = app();
        let date = app.state.games.date;
        app.on_games_loaded(date, None);
        assert_eq!(app.state.games.empty_message(), Some(GAMES_FAILED));
        assert!(app.state.debug.raw.is_empty());
    }

    #[test]
    fn stale_scoreboard_is_ignored() {
        let mut app = app();
        let request = app.shift_date(1);
        assert!(matches!(request, NetworkRequest::LoadGames { date } if date == NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()));

        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        app.on_games_loaded(yesterday, Some(Loaded { data: vec![game("1", None)], raw: json!({}) }));
        assert!(matches!(app.state.games.games, Fetched::Pending));
    }

    #[test]
    fn opening_a_game_requests_its_summary() {
        let mut app = app();
        let date = app.state.games.date;
        app.on_games_loaded(date, Some(Loaded { data: vec![game("401", Some(1))], raw: json!({"events": []}) }));

        let request = app.open_selected_game();
        assert!(matches!(request, Some(NetworkRequest::LoadSummary { ref game_id }) if game_id == "401"));
        assert_eq!(app.state.active_tab, MenuItem::GameDetail);

        app.on_summary_loaded("401".into(), None);
        assert_eq!(app.state.detail.empty_message(), Some(SUMMARY_FAILED));
    }

    #[test]
    fn refresh_updates_the_open_game_header() {
        let mut app = app();
        let date = app.state.games.date;
        app.on_games_loaded(date, Some(Loaded { data: vec![game("401", Some(1))], raw: json!({}) }));
        app.open_selected_game();

        app.on_games_loaded(date, Some(Loaded { data: vec![game("401", Some(2))], raw: json!({}) }));
        assert_eq!(app.state.detail.game.as_ref().and_then(|g| g.home.score), Some(2));
    }

    #[test]
    fn late_summary_for_another_game_is_dropped() {
        let mut app = app();
        app.state.detail.open(game("2", None));
        app.on_summary_loaded("1".into(), Some(Loaded { data: GameSummary::default(), raw: json!({}) }));
        assert!(matches!(app.state.detail.summary, Fetched::Pending));
    }

    #[test]
    fn standings_fill_the_team_picker() {
        let mut app = app();
        assert!(app.on_standings_loaded(Some(Loaded { data: standings(), raw: json!({}) })).is_none());
        assert_eq!(app.state.roster.teams.len(), 2);

        app.update_tab(MenuItem::Roster);
        assert!(matches!(app.roster_request(), Some(NetworkRequest::LoadRoster { ref team_id }) if team_id == "1"));
        assert!(matches!(app.cycle_team(), Some(NetworkRequest::LoadRoster { ref team_id }) if team_id == "21"));
    }

    #[test]
    fn failed_standings_keep_the_known_teams() {
        let mut app = app();
        app.on_standings_loaded(Some(Loaded { data: standings(), raw: json!({}) }));
        app.on_standings_loaded(None);
        assert!(app.state.standings.groups.is_failed());
        assert_eq!(app.state.roster.teams.len(), 2);
    }

    #[test]
    fn search_submits_trimmed_query() {
        let mut app = app();
        app.start_search();
        app.state.roster.search.input.push_str("  pastrnak ");
        app.submit_search();
        assert_eq!(app.state.roster.search.query.as_deref(), Some("pastrnak"));
        assert!(!app.state.roster.search.composing);

        app.start_search();
        app.submit_search();
        assert_eq!(app.state.roster.search.query, None);
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Standings);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Standings);
    }
}
