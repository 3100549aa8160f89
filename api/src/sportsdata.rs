//! SportsData.io NHL feeds. Keyed; teams are identified by their key ("BOS").
use crate::client::Endpoint;
use crate::provider::{
    Provider, decode, decode_list, format_seconds, lenient_list, lenient_slots, non_empty,
    slot_number,
};
use crate::{
    Competitor, Game, GameStatus, GameSummary, GoalEvent, PlayByPlayEntry, RosterEntry,
    RosterGroup, StandingsGroup, StandingsRow, group_roster,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const SPORTSDATA_NHL: &str = "https://api.sportsdata.io/v3/nhl";

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdGame {
    #[serde(rename = "GameID")]
    pub game_id: Option<u64>,
    pub status: Option<String>, // "Scheduled" | "InProgress" | "Final" | "F/OT" | "F/SO" | ...
    #[serde(rename = "DateTimeUTC")]
    pub date_time_utc: Option<String>,
    pub away_team: Option<String>,
    pub home_team: Option<String>,
    pub away_team_score: Option<u16>,
    pub home_team_score: Option<u16>,
    pub period: Option<String>, // "1" | "2" | "3" | "OT" | "SO"
    pub time_remaining_minutes: Option<u32>,
    pub time_remaining_seconds: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdStanding {
    pub key: Option<String>,
    pub city: Option<String>,
    pub name: Option<String>,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub overtime_losses: Option<u32>,
    pub points: Option<u32>,
    pub streak_description: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdBoxScore {
    pub game: Option<SdGame>,
    #[serde(default, deserialize_with = "lenient_slots")]
    pub periods: Vec<SdPeriod>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub player_games: Vec<SdPlayerGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdPeriod {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub scoring_plays: Vec<SdScoringPlay>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdScoringPlay {
    pub time_remaining_minutes: Option<u32>,
    pub time_remaining_seconds: Option<u32>,
    #[serde(rename = "ScoredByPlayerID")]
    pub scored_by: Option<u64>,
    #[serde(rename = "AssistedByPlayerID1")]
    pub first_assist: Option<u64>,
    #[serde(rename = "AssistedByPlayerID2")]
    pub second_assist: Option<u64>,
    pub power_play: Option<bool>,
    pub short_handed: Option<bool>,
    pub empty_net: Option<bool>,
}

impl SdScoringPlay {
    fn strength(&self) -> Option<String> {
        let tag = if self.empty_net == Some(true) {
            "EN"
        } else if self.power_play == Some(true) {
            "PP"
        } else if self.short_handed == Some(true) {
            "SH"
        } else {
            return None;
        };
        Some(tag.to_owned())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdPlayerGame {
    #[serde(rename = "PlayerID")]
    pub player_id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SdPlayer {
    #[serde(rename = "PlayerID")]
    pub player_id: Option<u64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SportsDataProvider {
    base: String,
}

impl Default for SportsDataProvider {
    fn default() -> Self {
        Self::with_base(SPORTSDATA_NHL)
    }
}

impl SportsDataProvider {
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Provider for SportsDataProvider {
    fn name(&self) -> &'static str {
        "sportsdata"
    }

    fn api_key_header(&self) -> Option<&'static str> {
        Some("Ocp-Apim-Subscription-Key")
    }

    fn schedule(&self, date: NaiveDate) -> Endpoint {
        let day = date.format("%Y-%b-%d").to_string().to_uppercase();
        Endpoint::new(format!("{}/scores/json/GamesByDate/{day}", self.base))
    }

    fn map_schedule(&self, raw: &Value) -> Vec<Game> {
        let games: Vec<SdGame> = decode_list(self.name(), raw);
        games.iter().map(map_game).collect()
    }

    fn standings(&self, season_start: i32) -> Endpoint {
        // Seasons are named after the year they end in.
        Endpoint::new(format!("{}/scores/json/Standings/{}", self.base, season_start + 1))
    }

    fn map_standings(&self, raw: &Value) -> Vec<StandingsGroup> {
        let teams: Vec<SdStanding> = decode_list(self.name(), raw);
        let mut groups: Vec<StandingsGroup> = Vec::new();
        for team in teams {
            let name = non_empty(team.division.clone())
                .or_else(|| team.conference.clone())
                .unwrap_or_default();
            let row = map_standing(team);
            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => group.rows.push(row),
                None => groups.push(StandingsGroup { name, rows: vec![row] }),
            }
        }
        groups
    }

    fn summary(&self, game_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/stats/json/BoxScore/{game_id}", self.base))
    }

    /// The box score carries scoring plays only, so the play list is the
    /// goal list rendered as text.
    fn map_summary(&self, game_id: &str, raw: &Value) -> GameSummary {
        let box_score: SdBoxScore = decode(self.name(), raw);
        let names: HashMap<u64, String> = box_score
            .player_games
            .iter()
            .filter_map(|p| Some((p.player_id?, p.name.clone()?)))
            .collect();
        let name_of = |id: Option<u64>| id.and_then(|id| names.get(&id).cloned());

        let mut goals = Vec::new();
        for (idx, period) in box_score.periods.iter().enumerate() {
            let number = period_number(period.name.as_deref()).unwrap_or(slot_number(idx));
            for play in &period.scoring_plays {
                goals.push(GoalEvent {
                    scorer: name_of(play.scored_by).unwrap_or_else(|| "Unknown".to_owned()),
                    scorer_id: play.scored_by.map(|id| id.to_string()),
                    profile_url: None,
                    assists: [play.first_assist, play.second_assist]
                        .into_iter()
                        .filter_map(name_of)
                        .collect(),
                    period: number,
                    time: clock(play.time_remaining_minutes, play.time_remaining_seconds)
                        .unwrap_or_default(),
                    strength: play.strength(),
                });
            }
        }

        let plays = goals
            .iter()
            .map(|g| PlayByPlayEntry {
                period: g.period,
                time: g.time.clone(),
                description: match g.strength.as_deref() {
                    Some(tag) => format!("{tag} goal by {} ({})", g.scorer, g.assists_label()),
                    None => format!("Goal by {} ({})", g.scorer, g.assists_label()),
                },
            })
            .collect();

        GameSummary {
            game_id: game_id.to_owned(),
            status: box_score
                .game
                .as_ref()
                .map(|g| status_of(g.status.as_deref()))
                .unwrap_or_default(),
            goals,
            plays,
        }
    }

    fn summary_is_complete(&self, raw: &Value) -> bool {
        let box_score: SdBoxScore = decode(self.name(), raw);
        box_score
            .game
            .is_some_and(|g| status_of(g.status.as_deref()).is_final())
    }

    fn roster(&self, team_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/scores/json/Players/{team_id}", self.base))
    }

    fn map_roster(&self, raw: &Value) -> Vec<RosterGroup> {
        let players: Vec<SdPlayer> = decode_list(self.name(), raw);
        let entries = players
            .into_iter()
            .map(|p| {
                let name = [p.first_name, p.last_name]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                RosterEntry {
                    id: p.player_id.map(|id| id.to_string()).unwrap_or_default(),
                    name,
                    position: p.position.unwrap_or_default(),
                    photo: non_empty(p.photo_url),
                }
            })
            .collect();
        group_roster(entries)
    }
}

fn map_game(game: &SdGame) -> Game {
    let side = |team: &Option<String>, score: Option<u16>| match non_empty(team.clone()) {
        Some(key) => Competitor {
            id: key.clone(),
            name: team_name(&key).map_or_else(|| key.clone(), str::to_owned),
            abbrev: key,
            score,
            logo: None,
        },
        None => Competitor::placeholder(),
    };
    let status = status_of(game.status.as_deref());

    Game {
        id: game.game_id.map(|id| id.to_string()).unwrap_or_default(),
        home: side(&game.home_team, game.home_team_score),
        away: side(&game.away_team, game.away_team_score),
        status_text: status_text(game.status.as_deref(), &status),
        status,
        period: period_number(game.period.as_deref()),
        clock: clock(game.time_remaining_minutes, game.time_remaining_seconds),
        start_time: game.date_time_utc.as_deref().and_then(parse_utc),
    }
}

fn map_standing(team: SdStanding) -> StandingsRow {
    let wins = team.wins.unwrap_or(0);
    let ot_losses = team.overtime_losses;
    let name = [team.city, team.name]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    StandingsRow {
        team_id: team.key.unwrap_or_default(),
        team: if name.is_empty() { crate::PLACEHOLDER_TEAM.to_owned() } else { name },
        wins,
        losses: team.losses.unwrap_or(0),
        ot_losses,
        // Some plans omit Points; derive it from the record.
        points: team.points.unwrap_or(2 * wins + ot_losses.unwrap_or(0)),
        streak: non_empty(team.streak_description),
    }
}

/// Schedules only carry team keys. Unknown keys are shown as they are.
fn team_name(key: &str) -> Option<&'static str> {
    let name = match key {
        "ANA" => "Anaheim Ducks",
        "ARI" => "Arizona Coyotes",
        "BOS" => "Boston Bruins",
        "BUF" => "Buffalo Sabres",
        "CAR" => "Carolina Hurricanes",
        "CBJ" => "Columbus Blue Jackets",
        "CGY" => "Calgary Flames",
        "CHI" => "Chicago Blackhawks",
        "COL" => "Colorado Avalanche",
        "DAL" => "Dallas Stars",
        "DET" => "Detroit Red Wings",
        "EDM" => "Edmonton Oilers",
        "FLA" => "Florida Panthers",
        "LA" | "LAK" => "Los Angeles Kings",
        "MIN" => "Minnesota Wild",
        "MON" | "MTL" => "Montreal Canadiens",
        "NJ" | "NJD" => "New Jersey Devils",
        "NSH" => "Nashville Predators",
        "NYI" => "New York Islanders",
        "NYR" => "New York Rangers",
        "OTT" => "Ottawa Senators",
        "PHI" => "Philadelphia Flyers",
        "PIT" => "Pittsburgh Penguins",
        "SEA" => "Seattle Kraken",
        "SJ" | "SJS" => "San Jose Sharks",
        "STL" => "St. Louis Blues",
        "TB" | "TBL" => "Tampa Bay Lightning",
        "TOR" => "Toronto Maple Leafs",
        "UTA" => "Utah Mammoth",
        "VAN" => "Vancouver Canucks",
        "VEG" | "VGK" => "Vegas Golden Knights",
        "WAS" | "WSH" => "Washington Capitals",
        "WPG" => "Winnipeg Jets",
        _ => return None,
    };
    Some(name)
}

fn status_of(raw: Option<&str>) -> GameStatus {
    match raw.unwrap_or_default() {
        "InProgress" => GameStatus::InProgress,
        "Final" | "F/OT" | "F/SO" => GameStatus::Final,
        "Postponed" | "Canceled" | "Suspended" => GameStatus::Postponed,
        _ => GameStatus::Scheduled,
    }
}

fn status_text(raw: Option<&str>, status: &GameStatus) -> String {
    match raw {
        Some("F/OT") => "Final/OT".to_owned(),
        Some("F/SO") => "Final/SO".to_owned(),
        _ => status.label().to_owned(),
    }
}

fn period_number(raw: Option<&str>) -> Option<u8> {
    match raw?.trim() {
        "OT" => Some(4),
        "SO" => Some(5),
        n => n.parse().ok(),
    }
}

fn clock(minutes: Option<u32>, seconds: Option<u32>) -> Option<String> {
    if minutes.is_none() && seconds.is_none() {
        return None;
    }
    let total = minutes
        .unwrap_or(0)
        .saturating_mul(60)
        .saturating_add(seconds.unwrap_or(0));
    Some(format_seconds(f64::from(total)))
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> SportsDataProvider {
        SportsDataProvider::default()
    }

    #[test]
    fn schedule_path_uses_uppercase_month() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            provider().schedule(date).url,
            "https://api.sportsdata.io/v3/nhl/scores/json/GamesByDate/2026-OCT-16"
        );
        assert_eq!(provider().api_key_header(), Some("Ocp-Apim-Subscription-Key"));
    }

    #[test]
    fn live_game_clock_comes_from_minutes_and_seconds() {
        let raw = json!([{
            "GameID": 19001,
            "Status": "InProgress",
            "DateTimeUTC": "2026-10-16T23:00:00",
            "AwayTeam": "TOR",
            "HomeTeam": "BOS",
            "AwayTeamScore": 1,
            "HomeTeamScore": 2,
            "Period": "OT",
            "TimeRemainingMinutes": 3,
            "TimeRemainingSeconds": 7
        }]);
        let games = provider().map_schedule(&raw);
        let game = &games[0];
        assert_eq!(game.home.abbrev, "BOS");
        assert_eq!(game.home.name, "Boston Bruins");
        assert_eq!(game.away.name, "Toronto Maple Leafs");
        assert_eq!(game.status_line(), "P4 3:07");
        assert!(game.start_time.is_some());
    }

    #[test]
    fn overtime_final_keeps_its_label() {
        let raw = json!([{"GameID": 1, "Status": "F/OT", "HomeTeam": "BOS"}]);
        let game = &provider().map_schedule(&raw)[0];
        assert_eq!(game.status, GameStatus::Final);
        assert_eq!(game.row().status, "Final/OT");
        assert_eq!(game.away, Competitor::placeholder());
    }

    #[test]
    fn points_fall_back_to_record() {
        let raw = json!([
            {"Key": "BOS", "City": "Boston", "Name": "Bruins", "Division": "Atlantic", "Wins": 10, "Losses": 3, "OvertimeLosses": 2},
            {"Key": "TOR", "City": "Toronto", "Name": "Maple Leafs", "Division": "Atlantic", "Wins": 9, "Losses": 5, "Points": 19},
            {"Key": "NYR", "City": "New York", "Name": "Rangers", "Division": "Metropolitan", "Wins": 8}
        ]);
        let groups = provider().map_standings(&raw);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Atlantic");
        assert_eq!(groups[0].rows[0].team, "Boston Bruins");
        assert_eq!(groups[0].rows[0].points, 22);
        assert_eq!(groups[0].rows[1].points, 19);
        assert_eq!(groups[1].rows[0].team_id, "NYR");
    }

    #[test]
    fn box_score_names_scorers_and_assists() {
        let raw = json!({
            "Game": {"GameID": 1, "Status": "F/SO"},
            "Periods": [
                {"Name": "1", "ScoringPlays": []},
                {"Name": "2", "ScoringPlays": [{
                    "TimeRemainingMinutes": 12,
                    "TimeRemainingSeconds": 5,
                    "ScoredByPlayerID": 30000001,
                    "AssistedByPlayerID1": 30000002,
                    "AssistedByPlayerID2": null
                }]}
            ],
            "PlayerGames": [
                {"PlayerID": 30000001, "Name": "David Pastrnak"},
                {"PlayerID": 30000002, "Name": "Charlie McAvoy"}
            ]
        });
        let summary = provider().map_summary("1", &raw);
        assert_eq!(summary.status, GameStatus::Final);
        let goal = &summary.goals[0];
        assert_eq!(goal.scorer, "David Pastrnak");
        assert_eq!(goal.assists, vec!["Charlie McAvoy"]);
        assert_eq!((goal.period, goal.time.as_str()), (2, "12:05"));
        assert_eq!(summary.plays[0].description, "Goal by David Pastrnak (Charlie McAvoy)");
        assert!(provider().summary_is_complete(&raw));
        assert!(!provider().summary_is_complete(&json!({"Game": {"Status": "InProgress"}})));
    }

    #[test]
    fn unknown_team_key_is_shown_as_is() {
        let raw = json!([{"GameID": 7, "Status": "Scheduled", "HomeTeam": "XYZ", "AwayTeam": "LA"}]);
        let game = &provider().map_schedule(&raw)[0];
        assert_eq!(game.home.name, "XYZ");
        assert_eq!(game.away.name, "Los Angeles Kings");
        assert_eq!(game.away.id, "LA");
    }

    #[test]
    fn malformed_game_is_skipped_and_the_rest_kept() {
        let raw = json!([
            {"GameID": 1, "Status": "Final", "HomeTeam": "BOS", "HomeTeamScore": 4},
            {"GameID": "two", "Status": "Final"},
            "garbage"
        ]);
        let games = provider().map_schedule(&raw);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "1");
        assert_eq!(games[0].home.score, Some(4));
    }

    #[test]
    fn huge_clock_values_saturate() {
        assert_eq!(clock(Some(2), Some(5)).as_deref(), Some("2:05"));
        assert_eq!(clock(None, None), None);
        let total = u64::from(u32::MAX);
        assert_eq!(
            clock(Some(u32::MAX), Some(u32::MAX)),
            Some(format!("{}:{:02}", total / 60, total % 60))
        );
    }

    #[test]
    fn scoring_play_strength_is_tagged() {
        let raw = json!({
            "Game": {"Status": "Final"},
            "Periods": [
                {"Name": "bogus", "ScoringPlays": "not a list"},
                {"ScoringPlays": [
                    {"TimeRemainingMinutes": 0, "TimeRemainingSeconds": 41, "ScoredByPlayerID": 1, "EmptyNet": true, "PowerPlay": false},
                    {"TimeRemainingMinutes": 9, "TimeRemainingSeconds": 0, "ScoredByPlayerID": 1, "PowerPlay": true},
                    {"ScoredByPlayerID": "one"}
                ]}
            ],
            "PlayerGames": [{"PlayerID": 1, "Name": "Brad Marchand"}]
        });
        let summary = provider().map_summary("1", &raw);
        assert_eq!(summary.goals.len(), 2);
        assert_eq!(summary.goals[0].strength.as_deref(), Some("EN"));
        assert_eq!(summary.goals[0].period, 2);
        assert_eq!(summary.goals[1].strength.as_deref(), Some("PP"));
        assert_eq!(summary.plays[1].description, "PP goal by Brad Marchand (unassisted)");
    }

    #[test]
    fn roster_joins_first_and_last_names() {
        let raw = json!([
            {"PlayerID": 1, "FirstName": "Jeremy", "LastName": "Swayman", "Position": "G"},
            {"PlayerID": 2, "FirstName": "Pavel", "LastName": "Zacha", "Position": "C", "PhotoUrl": "https://s3.sportsdata.io/2.png"}
        ]);
        let groups = provider().map_roster(&raw);
        assert_eq!(groups[0].players[0].name, "Pavel Zacha");
        assert_eq!(groups[1].players[0].name, "Jeremy Swayman");
    }
}
