//! Sportradar NHL v7. Keyed; ids are UUIDs; play-by-play is cached once a
//! game is closed.
use crate::client::Endpoint;
use crate::provider::{
    Provider, decode, lenient_list, lenient_slots, non_empty, slot_number,
};
use crate::{
    Competitor, Game, GameStatus, GameSummary, GoalEvent, PlayByPlayEntry, RosterEntry,
    RosterGroup, StandingsGroup, StandingsRow, group_roster,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

const SPORTRADAR_NHL: &str = "https://api.sportradar.com/nhl/trial/v7/en";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub games: Vec<SrGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrGame {
    pub id: Option<String>,
    pub status: Option<String>, // "scheduled" | "inprogress" | "closed" | ...
    pub scheduled: Option<DateTime<Utc>>,
    pub home: Option<SrTeam>,
    pub away: Option<SrTeam>,
    pub home_points: Option<u16>,
    pub away_points: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrTeam {
    pub id: Option<String>,
    pub name: Option<String>,
    pub market: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub conferences: Vec<SrConference>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrConference {
    #[serde(default, deserialize_with = "lenient_list")]
    pub divisions: Vec<SrDivision>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrDivision {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub teams: Vec<SrTeamRecord>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrTeamRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub market: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub overtime_losses: Option<u32>,
    pub points: Option<u32>,
    pub streak: Option<SrStreak>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrStreak {
    pub kind: Option<String>, // "win" | "loss" | "ot"
    pub length: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PbpResponse {
    pub status: Option<String>,
    /// Positions matter: a period without a number is numbered by its slot.
    #[serde(default, deserialize_with = "lenient_slots")]
    pub periods: Vec<SrPeriod>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrPeriod {
    pub number: Option<u8>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub events: Vec<SrEvent>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrEvent {
    pub event_type: Option<String>,
    pub clock: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub statistics: Vec<SrStatistic>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrStatistic {
    #[serde(rename = "type")]
    pub stat_type: Option<String>, // "score" | "assist" | "shotagainst" | ...
    pub player: Option<SrPlayer>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SrPlayer {
    pub id: Option<String>,
    pub full_name: Option<String>,
    pub primary_position: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ProfileResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub players: Vec<SrPlayer>,
}

#[derive(Debug, Clone)]
pub struct SportradarProvider {
    base: String,
}

impl Default for SportradarProvider {
    fn default() -> Self {
        Self::with_base(SPORTRADAR_NHL)
    }
}

impl SportradarProvider {
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Provider for SportradarProvider {
    fn name(&self) -> &'static str {
        "sportradar"
    }

    fn api_key_header(&self) -> Option<&'static str> {
        Some("x-api-key")
    }

    fn uses_summary_cache(&self) -> bool {
        true
    }

    fn schedule(&self, date: NaiveDate) -> Endpoint {
        Endpoint::new(format!(
            "{}/games/{}/schedule.json",
            self.base,
            date.format("%Y/%m/%d")
        ))
    }

    fn map_schedule(&self, raw: &Value) -> Vec<Game> {
        let response: ScheduleResponse = decode(self.name(), raw);
        response.games.iter().map(map_game).collect()
    }

    fn standings(&self, season_start: i32) -> Endpoint {
        Endpoint::new(format!("{}/seasons/{season_start}/REG/standings.json", self.base))
    }

    fn map_standings(&self, raw: &Value) -> Vec<StandingsGroup> {
        let response: StandingsResponse = decode(self.name(), raw);
        response
            .conferences
            .into_iter()
            .flat_map(|c| c.divisions)
            .map(|d| StandingsGroup {
                name: d.name.unwrap_or_default(),
                rows: d.teams.into_iter().map(map_team_record).collect(),
            })
            .collect()
    }

    fn summary(&self, game_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/games/{game_id}/pbp.json", self.base))
    }

    fn map_summary(&self, game_id: &str, raw: &Value) -> GameSummary {
        let response: PbpResponse = decode(self.name(), raw);
        let mut goals = Vec::new();
        let mut plays = Vec::new();

        for (idx, period) in response.periods.iter().enumerate() {
            let number = period.number.unwrap_or(slot_number(idx));
            for event in &period.events {
                let time = event.clock.clone().unwrap_or_default();
                if event.event_type.as_deref() == Some("goal") {
                    goals.push(map_goal(event, number, &time));
                }
                plays.push(PlayByPlayEntry {
                    period: number,
                    time,
                    description: event
                        .description
                        .clone()
                        .or_else(|| event.event_type.clone())
                        .unwrap_or_default(),
                });
            }
        }

        GameSummary {
            game_id: game_id.to_owned(),
            status: status_of(response.status.as_deref()),
            goals,
            plays,
        }
    }

    fn summary_is_complete(&self, raw: &Value) -> bool {
        let response: PbpResponse = decode(self.name(), raw);
        matches!(response.status.as_deref(), Some("closed" | "complete"))
    }

    fn roster(&self, team_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/teams/{team_id}/profile.json", self.base))
    }

    fn map_roster(&self, raw: &Value) -> Vec<RosterGroup> {
        let response: ProfileResponse = decode(self.name(), raw);
        let entries = response
            .players
            .into_iter()
            .map(|p| RosterEntry {
                id: p.id.unwrap_or_default(),
                name: p.full_name.unwrap_or_default(),
                // `position` is only F/D/G; the primary one is more specific.
                position: non_empty(p.primary_position).or(p.position).unwrap_or_default(),
                photo: None,
            })
            .collect();
        group_roster(entries)
    }
}

fn map_game(game: &SrGame) -> Game {
    let side = |team: Option<&SrTeam>, score: Option<u16>| match team {
        Some(team) => Competitor {
            id: team.id.clone().unwrap_or_default(),
            name: display_name(team.market.as_deref(), team.name.as_deref()),
            abbrev: team.alias.clone().unwrap_or_default(),
            score,
            logo: None,
        },
        None => Competitor::placeholder(),
    };
    let status = status_of(game.status.as_deref());

    Game {
        id: game.id.clone().unwrap_or_default(),
        home: side(game.home.as_ref(), game.home_points),
        away: side(game.away.as_ref(), game.away_points),
        status_text: status.label().to_owned(),
        status,
        period: None,
        clock: None,
        start_time: game.scheduled,
    }
}

fn map_team_record(team: SrTeamRecord) -> StandingsRow {
    StandingsRow {
        team: display_name(team.market.as_deref(), team.name.as_deref()),
        team_id: team.id.unwrap_or_default(),
        wins: team.wins.unwrap_or(0),
        losses: team.losses.unwrap_or(0),
        ot_losses: team.overtime_losses,
        points: team.points.unwrap_or(0),
        streak: team.streak.and_then(streak_label),
    }
}

fn map_goal(event: &SrEvent, period: u8, time: &str) -> GoalEvent {
    let of_type = |kind: &'static str| {
        event
            .statistics
            .iter()
            .filter(move |s| s.stat_type.as_deref() == Some(kind))
            .filter_map(|s| s.player.as_ref())
    };
    let scorer = of_type("score").next();

    GoalEvent {
        scorer: scorer
            .and_then(|p| p.full_name.clone())
            .unwrap_or_else(|| "Unknown".to_owned()),
        scorer_id: scorer.and_then(|p| p.id.clone()),
        profile_url: None,
        assists: of_type("assist").filter_map(|p| p.full_name.clone()).collect(),
        period,
        time: time.to_owned(),
        strength: None,
    }
}

fn display_name(market: Option<&str>, name: Option<&str>) -> String {
    match (market, name) {
        (Some(m), Some(n)) => format!("{m} {n}"),
        (None, Some(n)) | (Some(n), None) => n.to_owned(),
        (None, None) => crate::PLACEHOLDER_TEAM.to_owned(),
    }
}

/// "W3", "L1", "OT2".
fn streak_label(streak: SrStreak) -> Option<String> {
    let prefix = match streak.kind.as_deref()? {
        "win" => "W",
        "loss" => "L",
        "ot" | "overtime" => "OT",
        _ => return None,
    };
    Some(format!("{prefix}{}", streak.length.unwrap_or(1)))
}

fn status_of(raw: Option<&str>) -> GameStatus {
    match raw.unwrap_or_default() {
        "inprogress" | "halftime" => GameStatus::InProgress,
        "complete" | "closed" => GameStatus::Final,
        "postponed" | "cancelled" | "suspended" => GameStatus::Postponed,
        _ => GameStatus::Scheduled,
    }
}
