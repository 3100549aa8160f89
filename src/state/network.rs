use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::{Local, NaiveDate};
use log::{debug, error};
use rink_api::client::SportsApi;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// What the UI is currently looking at, so `RefreshAll` knows what to reload.
#[derive(Debug, Clone)]
struct Watching {
    date: NaiveDate,
    game_id: Option<String>,
    team_id: Option<String>,
}

/// Owns the `SportsApi` and serves one request at a time, which also keeps
/// summary-cache access sequential.
pub struct NetworkWorker {
    api: SportsApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
    watching: Watching,
}

impl NetworkWorker {
    pub fn new(
        api: SportsApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            api,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
            watching: Watching {
                date: Local::now().date_naive(),
                game_id: None,
                team_id: None,
            },
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let responses = self.handle(request).await;
            let all_loaded = responses.iter().all(is_loaded);

            debug!("network request complete");
            self.stop_loading_animation(all_loaded).await;

            for response in responses {
                if let Err(e) = self.responses.send(response).await {
                    error!("Failed to send network response: {e}");
                    return;
                }
            }
        }
    }

    async fn handle(&mut self, request: NetworkRequest) -> Vec<NetworkResponse> {
        match request {
            NetworkRequest::LoadGames { date } => {
                self.watching.date = date;
                vec![self.load_games(date).await]
            }
            NetworkRequest::LoadStandings { date } => {
                self.watching.date = date;
                vec![self.load_standings(date).await]
            }
            NetworkRequest::LoadSummary { game_id } => {
                self.watching.game_id = Some(game_id.clone());
                vec![self.load_summary(game_id).await]
            }
            NetworkRequest::LoadRoster { team_id } => {
                self.watching.team_id = Some(team_id.clone());
                vec![self.load_roster(team_id).await]
            }
            NetworkRequest::RefreshAll => self.refresh_all().await,
        }
    }

    async fn refresh_all(&self) -> Vec<NetworkResponse> {
        let Watching { date, game_id, team_id } = self.watching.clone();
        debug!("refreshing {} for {date}", self.api.provider_name());

        let mut out = vec![self.load_games(date).await, self.load_standings(date).await];
        if let Some(game_id) = game_id {
            out.push(self.load_summary(game_id).await);
        }
        if let Some(team_id) = team_id {
            out.push(self.load_roster(team_id).await);
        }
        out
    }

    async fn load_games(&self, date: NaiveDate) -> NetworkResponse {
        debug!("loading games for {date}");
        let games = self.api.games(date).await;
        NetworkResponse::GamesLoaded { date, games }
    }

    async fn load_standings(&self, date: NaiveDate) -> NetworkResponse {
        debug!("loading standings");
        let standings = self.api.standings(date).await;
        NetworkResponse::StandingsLoaded { standings }
    }

    async fn load_summary(&self, game_id: String) -> NetworkResponse {
        debug!("loading summary for game {game_id}");
        let summary = self.api.game_summary(&game_id).await;
        NetworkResponse::SummaryLoaded { game_id, summary }
    }

    async fn load_roster(&self, team_id: String) -> NetworkResponse {
        debug!("loading roster for team {team_id}");
        let roster = self.api.roster(&team_id).await;
        NetworkResponse::RosterLoaded { team_id, roster }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

fn is_loaded(response: &NetworkResponse) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { .. } => true,
        NetworkResponse::GamesLoaded { games, .. } => games.is_some(),
        NetworkResponse::StandingsLoaded { standings } => standings.is_some(),
        NetworkResponse::SummaryLoaded { summary, .. } => summary.is_some(),
        NetworkResponse::RosterLoaded { roster, .. } => roster.is_some(),
    }
}
