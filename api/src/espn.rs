//! ESPN hockey API: raw wire types plus the adapter that maps them onto the
//! normalized rows. No API key; dates are `YYYYMMDD`.
use crate::client::Endpoint;
use crate::provider::{
    NO_CLOCK, Provider, decode, flexible_id, format_clock, lenient_list, lenient_opt_list,
    non_empty, split_home_away,
};
use crate::{
    Competitor, Game, GameStatus, GameSummary, GoalEvent, PlayByPlayEntry, RosterEntry,
    RosterGroup, StandingsGroup, StandingsRow, group_roster,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

const ESPN_SITE_V2: &str = "https://site.api.espn.com/apis/site/v2/sports/hockey/nhl";
const ESPN_WEB_V2: &str = "https://site.web.api.espn.com/apis/v2/sports/hockey/nhl";

// ---------------------------------------------------------------------------
// Scoreboard  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub events: Option<Vec<EspnEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<EspnStatus>,
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub competitions: Option<Vec<EspnCompetition>>,
    pub date: Option<String>, // ISO 8601
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type")]
    pub status_type: Option<EspnStatusType>,
    pub period: Option<u8>,
    /// Seconds remaining; usually a number, occasionally a string.
    pub clock: Option<Value>,
    #[serde(rename = "displayClock")]
    pub display_clock: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatusType {
    pub name: Option<String>, // "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", "STATUS_FINAL"
    pub description: Option<String>, // "Final", "In Progress"
    pub detail: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetition {
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub competitors: Option<Vec<EspnCompetitor>>,
    pub status: Option<EspnStatus>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EspnCompetitor {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(rename = "homeAway")]
    pub home_away: Option<String>, // "home" | "away"
    pub team: Option<EspnTeam>,
    pub score: Option<Value>, // ESPN sends scores as strings
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnTeam {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
}

// ---------------------------------------------------------------------------
// Standings  (web v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub children: Option<Vec<EspnStandingsNode>>,
}

/// Conferences carry either their own standings or nested divisions.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStandingsNode {
    pub name: Option<String>,
    pub standings: Option<EspnStandings>,
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub children: Option<Vec<EspnStandingsNode>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStandings {
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub entries: Option<Vec<EspnStandingsEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStandingsEntry {
    pub team: Option<EspnTeam>,
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub stats: Option<Vec<EspnStat>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStat {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub stat_type: Option<String>,
    pub value: Option<f64>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Game summary  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SummaryResponse {
    pub header: Option<EspnHeader>,
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub plays: Option<Vec<EspnPlay>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnHeader {
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub competitions: Option<Vec<EspnCompetition>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnPlay {
    pub period: Option<EspnPeriod>,
    pub clock: Option<EspnClock>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub play_type: Option<EspnPlayType>,
    #[serde(rename = "scoringPlay")]
    pub scoring_play: Option<bool>,
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub participants: Option<Vec<EspnParticipant>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnPeriod {
    pub number: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnClock {
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnPlayType {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnParticipant {
    pub athlete: Option<EspnAthlete>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnAthlete {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Team roster  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RosterResponse {
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub athletes: Option<Vec<EspnRosterItem>>,
}

/// Hockey rosters come grouped by position; other sports list athletes flat.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum EspnRosterItem {
    Group {
        #[serde(deserialize_with = "lenient_list")]
        items: Vec<EspnRosterAthlete>,
    },
    Athlete(EspnRosterAthlete),
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnRosterAthlete {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub position: Option<EspnPosition>,
    pub headshot: Option<EspnHeadshot>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnPosition {
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnHeadshot {
    pub href: Option<String>,
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EspnProvider {
    site: String,
    web: String,
}

impl Default for EspnProvider {
    fn default() -> Self {
        Self::with_hosts(ESPN_SITE_V2, ESPN_WEB_V2)
    }
}

impl EspnProvider {
    /// ESPN splits its API over two hosts; standings live on the "web" one.
    pub fn with_hosts(site: impl Into<String>, web: impl Into<String>) -> Self {
        Self { site: site.into(), web: web.into() }
    }
}

impl Provider for EspnProvider {
    fn name(&self) -> &'static str {
        "espn"
    }

    fn profile_url(&self, player_id: &str) -> Option<String> {
        Some(format!("https://www.espn.com/nhl/player/_/id/{player_id}"))
    }

    fn schedule(&self, date: NaiveDate) -> Endpoint {
        Endpoint::new(format!("{}/scoreboard", self.site))
            .query("dates", date.format("%Y%m%d").to_string())
    }

    fn map_schedule(&self, raw: &Value) -> Vec<Game> {
        let response: ScoreboardResponse = decode(self.name(), raw);
        response.events.unwrap_or_default().iter().map(map_event).collect()
    }

    fn standings(&self, season_start: i32) -> Endpoint {
        // ESPN labels a season by the year it ends in.
        Endpoint::new(format!("{}/standings", self.web))
            .query("season", (season_start + 1).to_string())
    }

    fn map_standings(&self, raw: &Value) -> Vec<StandingsGroup> {
        let response: StandingsResponse = decode(self.name(), raw);
        let mut groups = Vec::new();
        for node in response.children.unwrap_or_default() {
            collect_standings(node, &mut groups);
        }
        groups
    }

    fn summary(&self, game_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/summary", self.site)).query("event", game_id)
    }

    fn map_summary(&self, game_id: &str, raw: &Value) -> GameSummary {
        let response: SummaryResponse = decode(self.name(), raw);
        let status = header_status(&response)
            .map(status_of)
            .unwrap_or_default();

        let plays = response.plays.unwrap_or_default();
        let goals = plays
            .iter()
            .filter(|p| is_goal(p))
            .map(|p| {
                let mut athletes = p
                    .participants
                    .iter()
                    .flatten()
                    .filter_map(|part| part.athlete.as_ref());
                let scorer = athletes.next();
                let scorer_id = scorer.and_then(|a| a.id.clone());
                GoalEvent {
                    scorer: scorer
                        .and_then(|a| a.display_name.clone())
                        .unwrap_or_else(|| "Unknown".to_owned()),
                    profile_url: scorer_id.as_deref().and_then(|id| self.profile_url(id)),
                    scorer_id,
                    assists: athletes.filter_map(|a| a.display_name.clone()).collect(),
                    period: play_period(p),
                    time: play_clock(p),
                    strength: None,
                }
            })
            .collect();

        let plays = plays
            .iter()
            .map(|p| PlayByPlayEntry {
                period: play_period(p),
                time: play_clock(p),
                description: p.text.clone().unwrap_or_default(),
            })
            .collect();

        GameSummary { game_id: game_id.to_owned(), status, goals, plays }
    }

    fn summary_is_complete(&self, raw: &Value) -> bool {
        let response: SummaryResponse = decode(self.name(), raw);
        header_status(&response).is_some_and(|s| status_of(s).is_final())
    }

    fn roster(&self, team_id: &str) -> Endpoint {
        Endpoint::new(format!("{}/teams/{team_id}/roster", self.site))
    }

    fn map_roster(&self, raw: &Value) -> Vec<RosterGroup> {
        let response: RosterResponse = decode(self.name(), raw);
        let entries = response
            .athletes
            .unwrap_or_default()
            .into_iter()
            .flat_map(|item| match item {
                EspnRosterItem::Group { items } => items,
                EspnRosterItem::Athlete(a) => vec![a],
            })
            .map(|a| RosterEntry {
                id: a.id.unwrap_or_default(),
                name: non_empty(a.display_name)
                    .or(a.full_name)
                    .unwrap_or_default(),
                position: a
                    .position
                    .and_then(|p| p.abbreviation)
                    .unwrap_or_default(),
                photo: a.headshot.and_then(|h| non_empty(h.href)),
            })
            .collect();
        group_roster(entries)
    }
}

fn map_event(event: &EspnEvent) -> Game {
    // Scoreboards nest the status on the event; some payloads only have it
    // on the competition.
    let competition = event.competitions.as_deref().unwrap_or_default().first();
    let status = event
        .status
        .as_ref()
        .or_else(|| competition.and_then(|c| c.status.as_ref()));

    let competitors = competition
        .and_then(|c| c.competitors.as_deref())
        .unwrap_or_default();
    let (home, away) = split_home_away(competitors, |c| c.home_away.as_deref(), map_competitor);

    let status_text = status
        .and_then(|s| s.status_type.as_ref())
        .and_then(|t| t.description.clone().or_else(|| t.detail.clone()))
        .unwrap_or_default();

    Game {
        id: event.id.clone().unwrap_or_default(),
        home,
        away,
        status: status.map(status_of).unwrap_or_default(),
        status_text,
        period: status.and_then(|s| s.period),
        clock: status.and_then(live_clock),
        start_time: event.date.as_deref().and_then(parse_event_date),
    }
}

/// ESPN usually drops the seconds ("2026-10-16T23:00Z").
fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn map_competitor(c: &EspnCompetitor) -> Competitor {
    let team = c.team.as_ref();
    Competitor {
        id: team.and_then(|t| t.id.clone()).or_else(|| c.id.clone()).unwrap_or_default(),
        name: team
            .and_then(|t| t.display_name.clone())
            .unwrap_or_else(|| crate::PLACEHOLDER_TEAM.to_owned()),
        abbrev: team.and_then(|t| t.abbreviation.clone()).unwrap_or_default(),
        score: c.score.as_ref().and_then(score_value),
        logo: team.and_then(|t| non_empty(t.logo.clone())),
    }
}

fn score_value(raw: &Value) -> Option<u16> {
    match raw {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        _ => None,
    }
}

/// Prefer the numeric clock; fall back to ESPN's own display string when the
/// number is missing or unreadable.
fn live_clock(status: &EspnStatus) -> Option<String> {
    status
        .clock
        .as_ref()
        .map(format_clock)
        .filter(|c| c != NO_CLOCK)
        .or_else(|| non_empty(status.display_clock.clone()))
}

fn status_of(status: &EspnStatus) -> GameStatus {
    let Some(kind) = status.status_type.as_ref() else {
        return GameStatus::default();
    };
    if kind.completed == Some(true) {
        return GameStatus::Final;
    }
    kind.name.as_deref().map(parse_status).unwrap_or_default()
}

fn parse_status(s: &str) -> GameStatus {
    match s {
        "STATUS_IN_PROGRESS" | "STATUS_END_PERIOD" | "STATUS_INTERMISSION" => {
            GameStatus::InProgress
        }
        s if s.starts_with("STATUS_FINAL") => GameStatus::Final,
        "STATUS_POSTPONED" | "STATUS_CANCELED" | "STATUS_CANCELLED" | "STATUS_SUSPENDED" => {
            GameStatus::Postponed
        }
        _ => GameStatus::Scheduled,
    }
}

fn header_status(response: &SummaryResponse) -> Option<&EspnStatus> {
    response
        .header
        .as_ref()?
        .competitions
        .as_deref()?
        .first()?
        .status
        .as_ref()
}

fn is_goal(play: &EspnPlay) -> bool {
    play.scoring_play == Some(true)
        || play
            .play_type
            .as_ref()
            .and_then(|t| t.text.as_deref())
            .is_some_and(|t| t.eq_ignore_ascii_case("goal"))
}

fn play_period(play: &EspnPlay) -> u8 {
    play.period.as_ref().and_then(|p| p.number).unwrap_or_default()
}

fn play_clock(play: &EspnPlay) -> String {
    play.clock
        .as_ref()
        .and_then(|c| c.display_value.clone())
        .unwrap_or_default()
}

fn collect_standings(node: EspnStandingsNode, out: &mut Vec<StandingsGroup>) {
    let name = node.name.unwrap_or_default();
    match node.standings.and_then(|s| s.entries) {
        Some(entries) if !entries.is_empty() => {
            let rows = entries.iter().map(map_standings_entry).collect();
            out.push(StandingsGroup { name, rows });
        }
        _ => {
            for child in node.children.unwrap_or_default() {
                collect_standings(child, out);
            }
        }
    }
}

fn map_standings_entry(entry: &EspnStandingsEntry) -> StandingsRow {
    let stats = entry.stats.as_deref().unwrap_or_default();
    let count = |key: &str| stat(stats, key).and_then(|s| s.value).map(|v| v.max(0.0) as u32);
    let team = entry.team.as_ref();

    StandingsRow {
        team_id: team.and_then(|t| t.id.clone()).unwrap_or_default(),
        team: team
            .and_then(|t| t.display_name.clone())
            .unwrap_or_else(|| crate::PLACEHOLDER_TEAM.to_owned()),
        wins: count("wins").unwrap_or(0),
        losses: count("losses").unwrap_or(0),
        ot_losses: count("otLosses").or_else(|| count("overtimeLosses")),
        points: count("points").unwrap_or(0),
        streak: stat(stats, "streak").and_then(|s| non_empty(s.display_value.clone())),
    }
}

/// Statistics are looked up by name, never by position in the array.
fn stat<'a>(stats: &'a [EspnStat], key: &str) -> Option<&'a EspnStat> {
    stats.iter().find(|s| {
        s.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(key))
            || s.stat_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> EspnProvider {
        EspnProvider::default()
    }

    fn scoreboard(competitors: Value) -> Value {
        json!({
            "events": [{
                "id": "401559",
                "date": "2026-10-16T23:00Z",
                "status": {
                    "clock": 754.0,
                    "displayClock": "12:34",
                    "period": 2,
                    "type": {"name": "STATUS_IN_PROGRESS", "description": "In Progress", "completed": false}
                },
                "competitions": [{"competitors": competitors}]
            }]
        })
    }

    #[test]
    fn schedule_endpoint_uses_compact_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let endpoint = provider().schedule(date);
        assert!(endpoint.url.ends_with("/hockey/nhl/scoreboard"));
        assert_eq!(endpoint.query, vec![("dates".to_owned(), "20261016".to_owned())]);
    }

    #[test]
    fn competitors_are_split_by_role_not_position() {
        let raw = scoreboard(json!([
            {"homeAway": "away", "score": "2", "team": {"id": "21", "displayName": "Toronto Maple Leafs", "abbreviation": "TOR"}},
            {"homeAway": "home", "score": "3", "team": {"id": "1", "displayName": "Boston Bruins", "abbreviation": "BOS", "logo": "https://a.espncdn.com/bos.png"}}
        ]));
        let games = provider().map_schedule(&raw);
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.home.name, "Boston Bruins");
        assert_eq!(game.home.score, Some(3));
        assert_eq!(game.home.logo.as_deref(), Some("https://a.espncdn.com/bos.png"));
        assert_eq!(game.away.abbrev, "TOR");
        assert_eq!(game.status, GameStatus::InProgress);
        assert_eq!(game.status_line(), "P2 12:34");
        assert_eq!(
            game.start_time.map(|t| t.to_rfc3339()),
            Some("2026-10-16T23:00:00+00:00".to_owned())
        );
    }

    #[test]
    fn missing_home_role_yields_placeholder_row() {
        let raw = scoreboard(json!([
            {"homeAway": "away", "score": "2", "team": {"displayName": "Toronto Maple Leafs"}}
        ]));
        let games = provider().map_schedule(&raw);
        assert_eq!(games[0].home, Competitor::placeholder());
        assert_eq!(games[0].row().home, "TBD");
        assert_eq!(games[0].row().home_score, None);
        assert_eq!(games[0].away.name, "Toronto Maple Leafs");
    }

    #[test]
    fn unreadable_clock_falls_back_to_display_clock() {
        let mut raw = scoreboard(json!([]));
        raw["events"][0]["status"]["clock"] = json!({"weird": true});
        let games = provider().map_schedule(&raw);
        assert_eq!(games[0].clock.as_deref(), Some("12:34"));
    }

    #[test]
    fn unexpected_shape_maps_to_no_games() {
        assert!(provider().map_schedule(&json!({"events": "nope"})).is_empty());
        assert!(provider().map_schedule(&json!([])).is_empty());
    }

    #[test]
    fn one_malformed_event_does_not_hide_the_others() {
        let mut raw = scoreboard(json!([
            {"homeAway": "away", "score": "2", "team": {"displayName": "Toronto Maple Leafs"}},
            {"homeAway": "home", "score": "3", "team": {"displayName": "Boston Bruins"}}
        ]));
        let events = raw["events"].as_array_mut().unwrap();
        events.push(json!({"id": 2, "status": {"type": {"name": "STATUS_SCHEDULED"}}}));
        events.push(json!({"id": "3", "status": "garbled"}));

        let games = provider().map_schedule(&raw);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].home.name, "Boston Bruins");
        assert_eq!(games[1].id, "2");
        assert_eq!(games[1].status, GameStatus::Scheduled);
    }

    fn standings_entry(stats: Value) -> Value {
        json!({
            "children": [{
                "name": "Eastern Conference",
                "standings": {"entries": [{
                    "team": {"id": "1", "displayName": "Boston Bruins"},
                    "stats": stats
                }]}
            }]
        })
    }

    #[test]
    fn standings_are_read_by_stat_name() {
        let stats = json!([
            {"name": "wins", "value": 47.0},
            {"name": "losses", "value": 20.0},
            {"name": "otLosses", "value": 15.0},
            {"name": "points", "value": 109.0},
            {"name": "streak", "value": 3.0, "displayValue": "W3"}
        ]);
        let groups = provider().map_standings(&standings_entry(stats));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Eastern Conference");
        let row = &groups[0].rows[0];
        assert_eq!((row.wins, row.losses, row.ot_losses, row.points), (47, 20, Some(15), 109));
        assert_eq!(row.streak.as_deref(), Some("W3"));
        assert_eq!(row.team_id, "1");
    }

    #[test]
    fn standings_ignore_stat_order() {
        let ordered = json!([
            {"name": "wins", "value": 47.0},
            {"name": "losses", "value": 20.0},
            {"name": "gamesPlayed", "value": 82.0},
            {"name": "points", "value": 109.0}
        ]);
        let shuffled = json!([
            {"name": "points", "value": 109.0},
            {"name": "gamesPlayed", "value": 82.0},
            {"name": "losses", "value": 20.0},
            {"name": "wins", "value": 47.0}
        ]);
        let a = provider().map_standings(&standings_entry(ordered));
        let b = provider().map_standings(&standings_entry(shuffled));
        assert_eq!(a[0].rows, b[0].rows);
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let groups = provider().map_standings(&standings_entry(json!([{"name": "wins", "value": 3.0}])));
        let row = &groups[0].rows[0];
        assert_eq!((row.wins, row.losses, row.points), (3, 0, 0));
        assert_eq!(row.ot_losses, None);
    }

    #[test]
    fn nested_divisions_are_flattened() {
        let raw = json!({
            "children": [{
                "name": "Eastern Conference",
                "children": [
                    {"name": "Atlantic", "standings": {"entries": [{"team": {"displayName": "Boston Bruins"}, "stats": []}]}},
                    {"name": "Metropolitan", "standings": {"entries": [{"team": {"displayName": "New York Rangers"}, "stats": []}]}}
                ]
            }]
        });
        let names: Vec<String> = provider().map_standings(&raw).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Atlantic", "Metropolitan"]);
    }

    #[test]
    fn summary_extracts_goals_with_assists() {
        let raw = json!({
            "header": {"competitions": [{"status": {"type": {"name": "STATUS_FINAL", "completed": true}}}]},
            "plays": [
                {"period": {"number": 1}, "clock": {"displayValue": "15:02"}, "text": "Faceoff won by Boston"},
                {
                    "period": {"number": 1},
                    "clock": {"displayValue": "08:11"},
                    "text": "David Pastrnak Goal",
                    "scoringPlay": true,
                    "participants": [
                        {"athlete": {"id": "3114778", "displayName": "David Pastrnak"}},
                        {"athlete": {"id": "3900169", "displayName": "Charlie McAvoy"}},
                        {"athlete": {"id": "5149", "displayName": "Brad Marchand"}}
                    ]
                }
            ]
        });
        let summary = provider().map_summary("401559", &raw);
        assert_eq!(summary.status, GameStatus::Final);
        assert_eq!(summary.plays.len(), 2);
        assert_eq!(summary.goals.len(), 1);
        let goal = &summary.goals[0];
        assert_eq!(goal.scorer, "David Pastrnak");
        assert_eq!(goal.assists, vec!["Charlie McAvoy", "Brad Marchand"]);
        assert_eq!(goal.period, 1);
        assert_eq!(goal.time, "08:11");
        assert_eq!(
            goal.profile_url.as_deref(),
            Some("https://www.espn.com/nhl/player/_/id/3114778")
        );
        assert!(provider().summary_is_complete(&raw));
    }

    #[test]
    fn live_summary_is_not_complete() {
        let raw = json!({"header": {"competitions": [{"status": {"type": {"name": "STATUS_IN_PROGRESS"}}}]}});
        assert!(!provider().summary_is_complete(&raw));
        assert!(!provider().summary_is_complete(&json!({})));
    }

    #[test]
    fn grouped_roster_is_flattened_and_regrouped() {
        let raw = json!({
            "athletes": [
                {"position": "Goalies", "items": [
                    {"id": "1", "displayName": "Jeremy Swayman", "position": {"abbreviation": "G"}, "headshot": {"href": "https://a.espncdn.com/1.png"}}
                ]},
                {"position": "Centers", "items": [
                    {"id": "2", "fullName": "Pavel Zacha", "position": {"abbreviation": "C"}}
                ]}
            ]
        });
        let groups = provider().map_roster(&raw);
        assert_eq!(groups[0].position, "C");
        assert_eq!(groups[0].players[0].name, "Pavel Zacha");
        assert_eq!(groups[1].players[0].photo.as_deref(), Some("https://a.espncdn.com/1.png"));
    }
}
