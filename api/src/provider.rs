use crate::client::Endpoint;
use crate::espn::EspnProvider;
use crate::nhl::NhlStatsProvider;
use crate::sportradar::SportradarProvider;
use crate::sportsdata::SportsDataProvider;
use crate::{Competitor, Game, GameSummary, RosterGroup, StandingsGroup};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Schema mapping for one upstream sports-data API.
///
/// Each resource has an endpoint builder and a pure mapping function from
/// the provider's JSON to the normalized rows. Mapping never fails: JSON that
/// does not fit the provider's shape yields an empty result.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Header carrying the API key, for providers that need one.
    fn api_key_header(&self) -> Option<&'static str> {
        None
    }

    /// Whether game summaries go through the on-disk cache.
    fn uses_summary_cache(&self) -> bool {
        false
    }

    fn profile_url(&self, _player_id: &str) -> Option<String> {
        None
    }

    fn schedule(&self, date: NaiveDate) -> Endpoint;
    fn map_schedule(&self, raw: &Value) -> Vec<Game>;

    /// `season_start` is the calendar year the season opened in.
    fn standings(&self, season_start: i32) -> Endpoint;
    fn map_standings(&self, raw: &Value) -> Vec<StandingsGroup>;

    fn summary(&self, game_id: &str) -> Endpoint;
    fn map_summary(&self, game_id: &str, raw: &Value) -> GameSummary;
    /// True once the game in a summary blob is over and the blob can be kept.
    fn summary_is_complete(&self, raw: &Value) -> bool;

    fn roster(&self, team_id: &str) -> Endpoint;
    fn map_roster(&self, raw: &Value) -> Vec<RosterGroup>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Espn,
    NhlStats,
    SportsData,
    Sportradar,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Espn,
        ProviderKind::NhlStats,
        ProviderKind::SportsData,
        ProviderKind::Sportradar,
    ];

    pub fn build(self) -> Box<dyn Provider> {
        match self {
            ProviderKind::Espn => Box::new(EspnProvider::default()),
            ProviderKind::NhlStats => Box::new(NhlStatsProvider::default()),
            ProviderKind::SportsData => Box::new(SportsDataProvider::default()),
            ProviderKind::Sportradar => Box::new(SportradarProvider::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Espn => "espn",
            ProviderKind::NhlStats => "nhl",
            ProviderKind::SportsData => "sportsdata",
            ProviderKind::Sportradar => "sportradar",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "espn" => Ok(ProviderKind::Espn),
            "nhl" | "nhl-stats" | "statsapi" => Ok(ProviderKind::NhlStats),
            "sportsdata" | "sportsdata.io" => Ok(ProviderKind::SportsData),
            "sportradar" => Ok(ProviderKind::Sportradar),
            other => Err(format!(
                "unknown provider '{other}' (expected espn, nhl, sportsdata or sportradar)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by the adapters
// ---------------------------------------------------------------------------

/// Decode a provider payload into its wire type, or the empty default.
pub(crate) fn decode<T: DeserializeOwned + Default>(provider: &str, raw: &Value) -> T {
    match T::deserialize(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{provider}: unexpected response shape: {e}");
            T::default()
        }
    }
}

/// Decode a top-level JSON array entry by entry. Entries that do not fit `T`
/// are logged and skipped; anything other than an array is an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(provider: &str, raw: &Value) -> Vec<T> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match T::deserialize(item) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("{provider}: skipping malformed entry: {e}");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        _ => {
            log::warn!("{provider}: expected a list, got {}", type_name(raw));
            Vec::new()
        }
    }
}

/// `deserialize_with` for list fields: one bad entry drops that entry, not
/// the whole payload.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(decode_list("response", &raw))
}

/// As [`lenient_list`], but a malformed entry becomes `T::default()` so the
/// positions of the others are kept.
pub(crate) fn lenient_slots<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .map(|item| T::deserialize(item).unwrap_or_else(|e| {
            log::warn!("response: blanking malformed entry: {e}");
            T::default()
        }))
        .collect())
}

/// As [`lenient_list`], for fields where an absent list stays `None`.
pub(crate) fn lenient_opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => Ok(Some(decode_list("response", &raw))),
    }
}

/// Ids that arrive as either `"401"` or `401`.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pick the competitors tagged home and away. A missing role becomes a
/// placeholder instead of an error.
pub(crate) fn split_home_away<'a, T>(
    items: &'a [T],
    role: impl Fn(&T) -> Option<&str>,
    map: impl Fn(&'a T) -> Competitor,
) -> (Competitor, Competitor) {
    let find = |wanted: &str| {
        items
            .iter()
            .find(|c| role(*c).is_some_and(|r| r.eq_ignore_ascii_case(wanted)))
            .map(&map)
            .unwrap_or_else(Competitor::placeholder)
    };
    (find("home"), find("away"))
}

/// Render a clock value for display. Numbers (or numeric strings) are read as
/// seconds remaining; anything else is shown verbatim.
pub fn format_clock(raw: &Value) -> String {
    match raw {
        Value::Number(n) => n.as_f64().map(format_seconds).unwrap_or_else(|| NO_CLOCK.into()),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(secs) => format_seconds(secs),
            Err(_) if !s.trim().is_empty() => s.trim().to_owned(),
            Err(_) => NO_CLOCK.into(),
        },
        _ => NO_CLOCK.into(),
    }
}

pub const NO_CLOCK: &str = "--:--";

pub fn format_seconds(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return NO_CLOCK.into();
    }
    let total = secs.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// NHL seasons open in the fall: anything from September onwards belongs to
/// the season that starts that year.
pub fn season_start_year(date: NaiveDate) -> i32 {
    if date.month() >= 9 { date.year() } else { date.year() - 1 }
}

/// 1-based period number for the period at position `idx`.
pub(crate) fn slot_number(idx: usize) -> u8 {
    u8::try_from(idx.saturating_add(1)).unwrap_or(u8::MAX)
}

pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Convenience used by the UI for the team picker.
pub fn teams_from_standings(groups: &[StandingsGroup]) -> Vec<(String, String)> {
    let mut teams: Vec<(String, String)> = groups
        .iter()
        .flat_map(|g| g.rows.iter())
        .filter(|r| !r.team_id.is_empty())
        .map(|r| (r.team_id.clone(), r.team.clone()))
        .collect();
    teams.sort_by(|a, b| a.1.cmp(&b.1));
    teams.dedup_by(|a, b| a.0 == b.0);
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("ESPN".parse::<ProviderKind>(), Ok(ProviderKind::Espn));
        assert_eq!("nhl".parse::<ProviderKind>(), Ok(ProviderKind::NhlStats));
        assert_eq!(" SportsData ".parse::<ProviderKind>(), Ok(ProviderKind::SportsData));
        assert_eq!("sportradar".parse::<ProviderKind>(), Ok(ProviderKind::Sportradar));
        assert!("yahoo".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>(), Ok(kind));
            assert_eq!(kind.build().name(), kind.as_str());
        }
    }

    #[test]
    fn only_subscription_providers_take_a_key() {
        let keyed: Vec<&str> = ProviderKind::ALL
            .into_iter()
            .filter(|kind| kind.build().api_key_header().is_some())
            .map(|kind| kind.as_str())
            .collect();
        assert_eq!(keyed, vec!["sportsdata", "sportradar"]);
    }

    #[test]
    fn clock_seconds_render_as_minutes() {
        assert_eq!(format_clock(&json!(754.0)), "12:34");
        assert_eq!(format_clock(&json!("59.6")), "1:00");
        assert_eq!(format_clock(&json!(0)), "0:00");
    }

    #[test]
    fn clock_falls_back_when_not_seconds() {
        assert_eq!(format_clock(&json!("END")), "END");
        assert_eq!(format_clock(&json!("12:34")), "12:34");
        assert_eq!(format_clock(&json!("")), NO_CLOCK);
        assert_eq!(format_clock(&Value::Null), NO_CLOCK);
        assert_eq!(format_clock(&json!(-5)), NO_CLOCK);
    }

    #[test]
    fn season_rolls_over_in_september() {
        let spring = NaiveDate::from_ymd_opt(2026, 4, 10).unwrap();
        let fall = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(season_start_year(spring), 2025);
        assert_eq!(season_start_year(fall), 2026);
    }

    #[test]
    fn list_decoding_skips_bad_entries() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Row {
            n: u8,
        }
        let rows: Vec<Row> = decode_list("test", &json!([{"n": 1}, {"n": "x"}, 7, {"n": 3}]));
        assert_eq!(rows, vec![Row { n: 1 }, Row { n: 3 }]);
        assert!(decode_list::<Row>("test", &json!({"n": 1})).is_empty());
        assert!(decode_list::<Row>("test", &Value::Null).is_empty());
    }

    #[test]
    fn slot_numbers_saturate() {
        assert_eq!(slot_number(0), 1);
        assert_eq!(slot_number(254), 255);
        assert_eq!(slot_number(300), u8::MAX);
        assert_eq!(slot_number(usize::MAX), u8::MAX);
    }

    #[test]
    fn missing_roles_become_placeholders() {
        let items = vec![json!({"side": "away", "name": "Toronto"})];
        let (home, away) = split_home_away(
            &items,
            |c| c["side"].as_str(),
            |c| Competitor {
                name: c["name"].as_str().unwrap_or_default().into(),
                ..Default::default()
            },
        );
        assert_eq!(home, Competitor::placeholder());
        assert_eq!(away.name, "Toronto");
    }
}
