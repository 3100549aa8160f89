pub mod cache;
pub mod client;
pub mod espn;
pub mod nhl;
pub mod provider;
pub mod sportradar;
pub mod sportsdata;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many play-by-play entries the detail view shows.
pub const RECENT_PLAY_LIMIT: usize = 10;

/// Shown in place of a team that the provider did not tag as home or away.
pub const PLACEHOLDER_TEAM: &str = "TBD";

// ---------------------------------------------------------------------------
// Domain types: normalized rows, independent of any provider wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
    Postponed,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::InProgress => "In Progress",
            GameStatus::Final => "Final",
            GameStatus::Postponed => "Postponed",
        }
    }

    pub fn is_final(&self) -> bool {
        *self == GameStatus::Final
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Competitor {
    pub id: String,
    pub name: String,   // "Boston Bruins"
    pub abbrev: String, // "BOS"
    pub score: Option<u16>,
    pub logo: Option<String>,
}

impl Competitor {
    /// Stand-in for a missing home/away entry.
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_TEAM.to_owned(),
            ..Self::default()
        }
    }
}

/// One game on the schedule. Rebuilt from scratch on every poll.
#[derive(Debug, Clone, Default)]
pub struct Game {
    pub id: String,
    pub home: Competitor,
    pub away: Competitor,
    pub status: GameStatus,
    /// Provider's own wording, e.g. "Final/OT" or "In Progress".
    pub status_text: String,
    pub period: Option<u8>,
    pub clock: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn row(&self) -> GameRow {
        GameRow {
            away: self.away.name.clone(),
            away_score: self.away.score,
            home: self.home.name.clone(),
            home_score: self.home.score,
            status: self.status_text().to_owned(),
        }
    }

    pub fn status_text(&self) -> &str {
        if self.status_text.is_empty() {
            self.status.label()
        } else {
            &self.status_text
        }
    }

    /// Status plus period and clock while the game is live.
    pub fn status_line(&self) -> String {
        match (self.is_live(), self.period, self.clock.as_deref()) {
            (true, Some(period), Some(clock)) => format!("P{period} {clock}"),
            (true, Some(period), None) => format!("P{period}"),
            _ => self.status_text().to_owned(),
        }
    }
}

/// Display-ready schedule row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRow {
    pub away: String,
    pub away_score: Option<u16>,
    pub home: String,
    pub home_score: Option<u16>,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StandingsGroup {
    pub name: String, // conference or division
    pub rows: Vec<StandingsRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandingsRow {
    pub team_id: String,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: Option<u32>,
    pub points: u32,
    pub streak: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalEvent {
    pub scorer: String,
    pub scorer_id: Option<String>,
    pub profile_url: Option<String>,
    pub assists: Vec<String>,
    pub period: u8,
    pub time: String,
    /// "PP", "SH" or "EN" when the provider reports it.
    pub strength: Option<String>,
}

impl GoalEvent {
    pub fn assists_label(&self) -> String {
        if self.assists.is_empty() {
            "unassisted".to_owned()
        } else {
            self.assists.join(", ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayByPlayEntry {
    pub period: u8,
    pub time: String,
    pub description: String,
}

/// Scoring plays and play-by-play for one game, fetched on demand.
#[derive(Debug, Clone, Default)]
pub struct GameSummary {
    pub game_id: String,
    pub status: GameStatus,
    pub goals: Vec<GoalEvent>,
    /// Full play list, oldest first.
    pub plays: Vec<PlayByPlayEntry>,
}

impl GameSummary {
    pub fn recent_plays(&self) -> &[PlayByPlayEntry] {
        recent_plays(&self.plays, RECENT_PLAY_LIMIT)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub position: String, // "C", "LW", "RW", "D", "G"
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RosterGroup {
    pub position: String,
    pub players: Vec<RosterEntry>,
}

/// The last `limit` entries, still in their original order.
pub fn recent_plays<T>(plays: &[T], limit: usize) -> &[T] {
    &plays[plays.len().saturating_sub(limit)..]
}

/// Group players by position abbreviation: C, LW, RW, D, G first, then any
/// other label alphabetically. Player order within a group is preserved.
pub fn group_roster(entries: Vec<RosterEntry>) -> Vec<RosterGroup> {
    const ORDER: [&str; 5] = ["C", "LW", "RW", "D", "G"];

    let mut groups: Vec<RosterGroup> = Vec::new();
    for entry in entries {
        let position = if entry.position.trim().is_empty() {
            "?".to_owned()
        } else {
            entry.position.trim().to_uppercase()
        };
        match groups.iter_mut().find(|g| g.position == position) {
            Some(group) => group.players.push(entry),
            None => groups.push(RosterGroup { position, players: vec![entry] }),
        }
    }

    groups.sort_by(|a, b| {
        let rank = |p: &str| ORDER.iter().position(|o| *o == p).unwrap_or(ORDER.len());
        rank(&a.position)
            .cmp(&rank(&b.position))
            .then_with(|| a.position.cmp(&b.position))
    });
    groups
}

/// Case-insensitive player lookup. An exact name match wins over a partial one.
pub fn find_player<'a>(groups: &'a [RosterGroup], query: &str) -> Option<&'a RosterEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let mut players = groups.iter().flat_map(|g| g.players.iter());
    let exact = players.clone().find(|p| p.name.to_lowercase() == needle);
    exact.or_else(|| players.find(|p| p.name.to_lowercase().contains(&needle)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, position: &str) -> RosterEntry {
        RosterEntry {
            id: name.to_lowercase(),
            name: name.into(),
            position: position.into(),
            photo: None,
        }
    }

    #[test]
    fn final_game_row_matches_display_shape() {
        let game = Game {
            id: "401".into(),
            home: Competitor {
                name: "Boston Bruins".into(),
                score: Some(3),
                ..Default::default()
            },
            away: Competitor {
                name: "Toronto Maple Leafs".into(),
                score: Some(2),
                ..Default::default()
            },
            status: GameStatus::Final,
            status_text: "Final".into(),
            ..Default::default()
        };
        let row = serde_json::to_value(game.row()).unwrap();
        assert_eq!(
            row,
            serde_json::json!({
                "away": "Toronto Maple Leafs",
                "away_score": 2,
                "home": "Boston Bruins",
                "home_score": 3,
                "status": "Final",
            })
        );
    }

    #[test]
    fn status_line_shows_period_and_clock_only_when_live() {
        let mut game = Game {
            status: GameStatus::InProgress,
            status_text: "In Progress".into(),
            period: Some(2),
            clock: Some("12:34".into()),
            ..Default::default()
        };
        assert_eq!(game.status_line(), "P2 12:34");
        game.status = GameStatus::Final;
        game.status_text = String::new();
        assert_eq!(game.status_line(), "Final");
    }

    #[test]
    fn recent_plays_keeps_last_ten_in_order() {
        let plays: Vec<u32> = (1..=25).collect();
        assert_eq!(recent_plays(&plays, RECENT_PLAY_LIMIT), &(16..=25).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn recent_plays_with_short_list_returns_everything() {
        let plays = [1, 2, 3];
        assert_eq!(recent_plays(&plays, RECENT_PLAY_LIMIT), &[1, 2, 3]);
        assert!(recent_plays::<u8>(&[], RECENT_PLAY_LIMIT).is_empty());
    }

    #[test]
    fn roster_groups_follow_hockey_position_order() {
        let groups = group_roster(vec![
            player("Jeremy Swayman", "G"),
            player("Charlie McAvoy", "d"),
            player("David Pastrnak", "RW"),
            player("Elias Lindholm", "C"),
            player("Brad Marchand", "LW"),
            player("Pavel Zacha", "C"),
            player("Mystery Man", ""),
        ]);
        let order: Vec<&str> = groups.iter().map(|g| g.position.as_str()).collect();
        assert_eq!(order, vec!["C", "LW", "RW", "D", "G", "?"]);
        assert_eq!(groups[0].players.len(), 2);
        assert_eq!(groups[0].players[0].name, "Elias Lindholm");
    }

    #[test]
    fn find_player_prefers_exact_match() {
        let groups = group_roster(vec![
            player("Pavel Zacha", "C"),
            player("Zach", "D"),
        ]);
        assert_eq!(find_player(&groups, "zach").map(|p| p.name.as_str()), Some("Zach"));
        assert_eq!(find_player(&groups, "ZACHA").map(|p| p.name.as_str()), Some("Pavel Zacha"));
        assert!(find_player(&groups, "Crosby").is_none());
        assert!(find_player(&groups, "   ").is_none());
    }

    #[test]
    fn goal_without_assists_reads_unassisted() {
        let goal = GoalEvent::default();
        assert_eq!(goal.assists_label(), "unassisted");
    }
}
