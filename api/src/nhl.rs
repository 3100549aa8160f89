//! NHL stats API (statsapi). Keyless; ids are numeric on the wire.
use crate::client::Endpoint;
use crate::provider::{Provider, decode, lenient_list, lenient_slots, non_empty};
use crate::{
    Competitor, Game, GameStatus, GameSummary, GoalEvent, PlayByPlayEntry, RosterEntry,
    RosterGroup, StandingsGroup, StandingsRow, group_roster,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

const NHL_STATS_API: &str = "https://statsapi.web.nhl.com/api/v1";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    #[serde(default, deserialize_with = "lenient_list")]
    pub games: Vec<NhlGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlGame {
    pub game_pk: Option<u64>,
    pub game_date: Option<DateTime<Utc>>,
    pub status: Option<NhlStatus>,
    pub teams: Option<NhlTeams>,
    pub linescore: Option<NhlLinescore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlStatus {
    pub abstract_game_state: Option<String>, // "Preview" | "Live" | "Final"
    pub detailed_state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlTeams {
    pub home: Option<NhlSide>,
    pub away: Option<NhlSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlSide {
    pub score: Option<u16>,
    pub team: Option<NhlTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlTeam {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlLinescore {
    pub current_period: Option<u8>,
    pub current_period_time_remaining: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub records: Vec<NhlRecordGroup>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlRecordGroup {
    pub division: Option<NhlNamed>,
    pub conference: Option<NhlNamed>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub team_records: Vec<NhlTeamRecord>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlNamed {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlTeamRecord {
    pub team: Option<NhlTeam>,
    pub league_record: Option<NhlLeagueRecord>,
    pub points: Option<u32>,
    pub streak: Option<NhlStreak>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlLeagueRecord {
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ot: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlStreak {
    pub streak_code: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedResponse {
    pub game_data: Option<LiveGameData>,
    pub live_data: Option<LiveData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveGameData {
    pub status: Option<NhlStatus>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveData {
    pub plays: Option<LivePlays>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LivePlays {
    /// Malformed plays keep their slot so `scoring_plays` still lines up.
    #[serde(default, deserialize_with = "lenient_slots")]
    pub all_plays: Vec<LivePlay>,
    /// Indices into `all_plays`.
    #[serde(default, deserialize_with = "lenient_list")]
    pub scoring_plays: Vec<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LivePlay {
    pub result: Option<PlayResult>,
    pub about: Option<PlayAbout>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub players: Vec<PlayPlayer>,
}

impl LivePlay {
    fn is_blank(&self) -> bool {
        self.result.is_none() && self.about.is_none()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    pub event: Option<String>,
    pub event_type_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayAbout {
    pub period: Option<u8>,
    pub period_time: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayPlayer {
    pub player: Option<NhlPerson>,
    pub player_type: Option<String>, // "Scorer" | "Assist" | "Goalie"
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlPerson {
    pub id: Option<u64>,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RosterResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub roster: Vec<NhlRosterSlot>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlRosterSlot {
    pub person: Option<NhlPerson>,
    pub position: Option<NhlPosition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlPosition {
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NhlStatsProvider {
    base: String,
}

impl Default for NhlStatsProvider {
    fn default() -> Self {
        Self::with_base(NHL_STATS_API)
    }
}

impl NhlStatsProvider {
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Provider for NhlStatsProvider {
    fn name(&self) -> &'static str {
        "nhl"
    }

    fn uses_summary_cache(&self) -> bool {
        true
    }

    fn profile_url(&self, player_id: &str) -> Option<String> {
        Some(format!("https://www.nhl.com/player/{player_id}"))
    }

    fn schedule(&self, date: NaiveDate) -> Endpoint {
        Endpoint::new(format!("{}/schedule", self.base))
            .query("date", date.format("%Y-%m-%d").to_string())
            .query("expand", "schedule.linescore")
    }

    fn map_schedule(&self, raw: &Value) -> Vec<Game> {
        let response: ScheduleResponse = decode(self.name(), raw);
        response
            .dates
            .iter()
            .flat_map(|d| d.games.iter())
            .map(map_game)
            .collect()
    }

    fn standings(&self, season_start: i32) -> Endpoint {
        Endpoint::new(format!("{}/standings", self.base))
            .query("season", format!("{season_start}{}", season_start + 1))
    }

    fn map_standings(&self, raw: &Value) -> Vec<StandingsGroup> {
        let response: StandingsResponse = decode(self.name(), raw);
        response
            .records
            .into_iter()
            .map(|group| StandingsGroup {
                name: group
                    .division
                    .and_then(|d| d.name)
                    .or_else(|| group.conference.and_then(|c| c.name))
                    .unwrap_or_default(),
                rows: group.team_records.into_iter().map(map_team_record).collect(),
            })
            .collect()
    }

    fn summary(&self, game_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/game/{game_id}/feed/live", self.base))
    }

    fn map_summary(&self, game_id: &str, raw: &Value) -> GameSummary {
        let response: LiveFeedResponse = decode(self.name(), raw);
        let status = feed_status(&response)
            .map(status_of)
            .unwrap_or_default();
        let plays = response
            .live_data
            .and_then(|d| d.plays)
            .unwrap_or_default();

        let goals = plays
            .scoring_plays
            .iter()
            .filter_map(|&idx| plays.all_plays.get(idx))
            .filter(|play| !play.is_blank())
            .map(|play| self.map_goal(play))
            .collect();

        let plays = plays
            .all_plays
            .iter()
            .filter(|play| !play.is_blank())
            .map(|play| {
                let about = play.about.as_ref();
                PlayByPlayEntry {
                    period: about.and_then(|a| a.period).unwrap_or_default(),
                    time: about.and_then(|a| a.period_time.clone()).unwrap_or_default(),
                    description: play
                        .result
                        .as_ref()
                        .and_then(|r| r.description.clone().or_else(|| r.event.clone()))
                        .unwrap_or_default(),
                }
            })
            .collect();

        GameSummary { game_id: game_id.to_owned(), status, goals, plays }
    }

    fn summary_is_complete(&self, raw: &Value) -> bool {
        let response: LiveFeedResponse = decode(self.name(), raw);
        feed_status(&response).is_some_and(|s| s.abstract_game_state.as_deref() == Some("Final"))
    }

    fn roster(&self, team_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/teams/{team_id}/roster", self.base))
    }

    fn map_roster(&self, raw: &Value) -> Vec<RosterGroup> {
        let response: RosterResponse = decode(self.name(), raw);
        let entries = response
            .roster
            .into_iter()
            .map(|slot| {
                let person = slot.person.unwrap_or_default();
                let id = person.id.map(|id| id.to_string()).unwrap_or_default();
                RosterEntry {
                    photo: (!id.is_empty()).then(|| headshot_url(&id)),
                    id,
                    name: person.full_name.unwrap_or_default(),
                    position: slot.position.and_then(|p| p.abbreviation).unwrap_or_default(),
                }
            })
            .collect();
        group_roster(entries)
    }
}

impl NhlStatsProvider {
    fn map_goal(&self, play: &LivePlay) -> GoalEvent {
        let of_type = |kind: &'static str| {
            play.players
                .iter()
                .filter(move |p| p.player_type.as_deref() == Some(kind))
                .filter_map(|p| p.player.as_ref())
        };
        let scorer = of_type("Scorer").next();
        let scorer_id = scorer.and_then(|p| p.id).map(|id| id.to_string());
        let about = play.about.as_ref();

        GoalEvent {
            scorer: scorer
                .and_then(|p| p.full_name.clone())
                .unwrap_or_else(|| "Unknown".to_owned()),
            profile_url: scorer_id.as_deref().and_then(|id| self.profile_url(id)),
            scorer_id,
            assists: of_type("Assist").filter_map(|p| p.full_name.clone()).collect(),
            period: about.and_then(|a| a.period).unwrap_or_default(),
            time: about.and_then(|a| a.period_time.clone()).unwrap_or_default(),
            strength: None,
        }
    }
}

fn headshot_url(player_id: &str) -> String {
    format!("https://cms.nhl.bamgrid.com/images/headshots/current/168x168/{player_id}.jpg")
}

fn map_game(game: &NhlGame) -> Game {
    let teams = game.teams.as_ref();
    let side = |s: Option<&NhlSide>| s.map(map_side).unwrap_or_else(Competitor::placeholder);
    let status = game.status.as_ref();
    let linescore = game.linescore.as_ref();

    Game {
        id: game.game_pk.map(|pk| pk.to_string()).unwrap_or_default(),
        home: side(teams.and_then(|t| t.home.as_ref())),
        away: side(teams.and_then(|t| t.away.as_ref())),
        status: status.map(status_of).unwrap_or_default(),
        status_text: status.and_then(|s| s.detailed_state.clone()).unwrap_or_default(),
        period: linescore.and_then(|l| l.current_period).filter(|p| *p > 0),
        clock: linescore.and_then(|l| non_empty(l.current_period_time_remaining.clone())),
        start_time: game.game_date,
    }
}

fn map_side(side: &NhlSide) -> Competitor {
    let team = side.team.as_ref();
    Competitor {
        id: team.and_then(|t| t.id).map(|id| id.to_string()).unwrap_or_default(),
        name: team
            .and_then(|t| t.name.clone())
            .unwrap_or_else(|| crate::PLACEHOLDER_TEAM.to_owned()),
        abbrev: team.and_then(|t| t.abbreviation.clone()).unwrap_or_default(),
        score: side.score,
        logo: None,
    }
}

fn map_team_record(record: NhlTeamRecord) -> StandingsRow {
    let team = record.team.unwrap_or_default();
    let league = record.league_record.unwrap_or_default();
    StandingsRow {
        team_id: team.id.map(|id| id.to_string()).unwrap_or_default(),
        team: team.name.unwrap_or_else(|| crate::PLACEHOLDER_TEAM.to_owned()),
        wins: league.wins.unwrap_or(0),
        losses: league.losses.unwrap_or(0),
        ot_losses: league.ot,
        points: record.points.unwrap_or(0),
        streak: record.streak.and_then(|s| non_empty(s.streak_code)),
    }
}

fn feed_status(response: &LiveFeedResponse) -> Option<&NhlStatus> {
    response.game_data.as_ref()?.status.as_ref()
}

fn status_of(status: &NhlStatus) -> GameStatus {
    let detailed = status.detailed_state.as_deref().unwrap_or_default();
    if detailed.eq_ignore_ascii_case("postponed") {
        return GameStatus::Postponed;
    }
    match status.abstract_game_state.as_deref() {
        Some("Live") => GameStatus::InProgress,
        Some("Final") => GameStatus::Final,
        _ => GameStatus::Scheduled,
    }
}
