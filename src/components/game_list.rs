use chrono::Local;
use rink_api::{Competitor, Game, GameStatus};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

/// Width of the team-name column on each side of a game line.
const NAME_W: usize = 22;

/// One line per game:
///
/// ```text
/// > Toronto Maple Leafs     2  @  Boston Bruins           3   Final
///   Montreal Canadiens      -  @  Ottawa Senators         -   7:00 PM
/// ```
pub struct GameList<'a> {
    pub games: &'a [Game],
    pub selected: usize,
}

impl<'a> Widget for GameList<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Keep the selection on screen.
        let visible = area.height as usize;
        let first = self.selected.saturating_sub(visible.saturating_sub(1));

        for (row, (idx, game)) in self
            .games
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let selected = idx == self.selected;
            let line = format_game_line(game, selected, area.width as usize);
            let y = area.y + row as u16;
            buf.set_string(area.x, y, &line, line_style(game, selected));
        }
    }
}

fn line_style(game: &Game, selected: bool) -> Style {
    let base = match game.status {
        GameStatus::InProgress => Style::default().fg(Color::Green),
        GameStatus::Final => Style::default().fg(Color::White),
        GameStatus::Postponed => Style::default().fg(Color::Red),
        GameStatus::Scheduled => Style::default().fg(Color::Gray),
    };
    if selected {
        base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        base
    }
}

/// Exactly `width` characters, so a selected line is highlighted edge to edge.
pub fn format_game_line(game: &Game, selected: bool, width: usize) -> String {
    let marker = if selected { '>' } else { ' ' };
    let line = format!(
        "{marker} {}  @  {}   {}",
        format_side(&game.away),
        format_side(&game.home),
        status_label(game),
    );
    let clipped: String = line.chars().take(width).collect();
    format!("{clipped:<width$}")
}

fn format_side(team: &Competitor) -> String {
    let name: String = team.name.chars().take(NAME_W).collect();
    let score = team
        .score
        .map(|s| format!("{s:>2}"))
        .unwrap_or_else(|| " -".to_string());
    format!("{name:<NAME_W$}{score}")
}

fn status_label(game: &Game) -> String {
    match (&game.status, game.start_time) {
        (GameStatus::Scheduled, Some(start)) => {
            start.with_timezone(&Local).format("%-I:%M %p").to_string()
        }
        _ => game.status_line(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(status: GameStatus, status_text: &str) -> Game {
        Game {
            id: "401".into(),
            home: Competitor { name: "Boston Bruins".into(), score: Some(3), ..Default::default() },
            away: Competitor { name: "Toronto Maple Leafs".into(), score: Some(2), ..Default::default() },
            status,
            status_text: status_text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn line_is_padded_to_width() {
        let line = format_game_line(&game(GameStatus::Final, "Final"), false, 80);
        assert_eq!(line.chars().count(), 80);
        assert!(line.starts_with("  Toronto Maple Leafs"));
        assert!(line.contains(" 2  @  Boston Bruins"));
        assert!(line.trim_end().ends_with("Final"));
    }

    #[test]
    fn narrow_area_clips_instead_of_wrapping() {
        let line = format_game_line(&game(GameStatus::Final, "Final"), true, 12);
        assert_eq!(line, "> Toronto Ma");
    }

    #[test]
    fn live_game_shows_period_and_clock() {
        let mut live = game(GameStatus::InProgress, "In Progress");
        live.period = Some(3);
        live.clock = Some("4:20".into());
        assert!(format_game_line(&live, false, 100).contains("P3 4:20"));
    }

    #[test]
    fn missing_scores_render_as_dashes() {
        let mut upcoming = game(GameStatus::Scheduled, "");
        upcoming.home.score = None;
        upcoming.away.score = None;
        let line = format_game_line(&upcoming, false, 100);
        assert!(line.contains(" -  @  "));
        assert!(line.contains("Scheduled"));
    }

    #[test]
    fn render_keeps_selection_visible() {
        let games: Vec<Game> = (0..10)
            .map(|i| {
                let mut g = game(GameStatus::Final, "Final");
                g.away.name = format!("Team {i}");
                g
            })
            .collect();
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        GameList { games: &games, selected: 7 }.render(area, &mut buf);

        let last_row: String = (0..60u16).map(|x| buf[(x, 2u16)].symbol().to_string()).collect();
        assert!(last_row.starts_with("> Team 7"), "got {last_row:?}");
    }
}
