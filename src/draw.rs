use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::game_list::GameList;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, Panes};
use rink_api::{GameSummary, StandingsGroup};

static TABS: &[&str; 5] = &["Games", "Standings", "Game Detail", "Roster", "Debug"];

/// Raw payload sections in the order the Debug tab lists them.
static DEBUG_SECTIONS: &[&str; 4] = &["games", "standings", "summary", "roster"];

const HELP_TEXT: &str = "\
Tabs
  1  Games          2  Standings      3  Game Detail
  4  Roster         5  Debug          ?  Help (Esc to close)

Date
  [  previous day   ]  next day       t  today

Games
  j/k or arrows  move         Enter  open game detail

Game Detail
  j/k  scroll plays           Esc    back to Games

Roster
  Tab  next team              /      search player (Enter/Esc)
  Esc  clear search           j/k    scroll

Anywhere
  R  refresh now    d  raw JSON pane    f  full screen
  \"  log pane       q  quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let panes = Panes {
        full_screen: app.settings.full_screen,
        debug: app.state.debug.show,
        logs: app.state.show_logs,
    };

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), panes);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Games => draw_games(f, layout.main, app),
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::GameDetail => draw_game_detail(f, layout.main, app),
            MenuItem::Roster => draw_roster(f, layout.main, app),
            MenuItem::Debug => draw_debug_tab(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(area) = layout.debug {
            draw_debug_pane(f, area, app);
        }
        if let Some(area) = layout.logs {
            draw_logs(f, area);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = drawn {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Games => 0,
        MenuItem::Standings => 1,
        MenuItem::GameDetail => 2,
        MenuItem::Roster => 3,
        MenuItem::Debug => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_games(f: &mut Frame, area: Rect, app: &App) {
    let games = &app.state.games;
    let title = format!(
        " Games | {} | {} ",
        games.date.format("%a %b %-d, %Y"),
        app.state.provider
    );
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [legend, content] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("j/k move, Enter detail, [ ] change day, t today")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    if let Some(msg) = games.empty_message() {
        draw_message(f, content, msg);
        return;
    }
    let list = games.games.ready().map(Vec::as_slice).unwrap_or_default();
    f.render_widget(GameList { games: list, selected: games.selected }, content);
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let standings = &app.state.standings;
    if let Some(msg) = standings.empty_message() {
        draw_message(f, inner, msg);
        return;
    }
    let groups = standings.groups.ready().map(Vec::as_slice).unwrap_or_default();
    let paragraph = Paragraph::new(standings_lines(groups)).scroll((standings.scroll_offset, 0));
    f.render_widget(paragraph, inner);
}

fn standings_lines(groups: &[StandingsGroup]) -> Vec<Line<'static>> {
    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for group in groups.iter().filter(|g| !g.rows.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("{:<26}{:>4}{:>4}{:>4}{:>5}  STRK", group.name, "W", "L", "OTL", "PTS"),
            header_style,
        )));
        for row in &group.rows {
            let otl = row.ot_losses.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
            let streak = row.streak.as_deref().unwrap_or("");
            let team: String = row.team.chars().take(25).collect();
            lines.push(Line::from(format!(
                "{team:<26}{:>4}{:>4}{otl:>4}{:>5}  {streak}",
                row.wins, row.losses, row.points
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn draw_game_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Game Detail ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let detail = &app.state.detail;
    let Some(game) = detail.game.as_ref() else {
        draw_message(f, inner, detail.empty_message().unwrap_or_default());
        return;
    };

    let [header, content] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);
    let score = |s: Option<u16>| s.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
    let header_lines = vec![
        Line::from(Span::styled(
            format!(
                "{} {}  @  {} {}",
                game.away.name,
                score(game.away.score),
                game.home.name,
                score(game.home.score)
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(game.status_line(), status_style(game.is_live()))),
    ];
    f.render_widget(Paragraph::new(header_lines), header);

    match (detail.empty_message(), detail.summary.ready()) {
        (None, Some(summary)) => {
            let paragraph = Paragraph::new(summary_lines(summary))
                .wrap(Wrap { trim: false })
                .scroll((detail.scroll_offset, 0));
            f.render_widget(paragraph, content);
        }
        (msg, _) => draw_message(f, content, msg.unwrap_or_default()),
    }
}

fn status_style(live: bool) -> Style {
    if live {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn summary_lines(summary: &GameSummary) -> Vec<Line<'static>> {
    let section = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled("Scoring", section))];

    if summary.goals.is_empty() {
        lines.push(Line::from(Span::styled("  No goals yet", dim)));
    }
    for goal in &summary.goals {
        let tag = goal.strength.as_deref().map(|s| format!(" [{s}]")).unwrap_or_default();
        lines.push(Line::from(format!(
            "  P{} {:>5}  {} ({}){tag}",
            goal.period,
            goal.time,
            goal.scorer,
            goal.assists_label()
        )));
        if let Some(url) = goal.profile_url.as_deref() {
            lines.push(Line::from(Span::styled(format!("           {url}"), dim)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Recent plays", section)));
    let recent = summary.recent_plays();
    if recent.is_empty() {
        lines.push(Line::from(Span::styled("  No plays yet", dim)));
    }
    for play in recent {
        lines.push(Line::from(format!("  P{} {:>5}  {}", play.period, play.time, play.description)));
    }
    lines
}

fn draw_roster(f: &mut Frame, area: Rect, app: &App) {
    let roster = &app.state.roster;
    let team = roster
        .selected_team()
        .map(|(_, name)| name.as_str())
        .unwrap_or("No team");
    let block = default_border(Color::White).title(format!(" Roster | {team} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [search_area, content] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);
    draw_search(f, search_area, app);

    if let Some(msg) = roster.empty_message() {
        draw_message(f, content, msg);
        return;
    }

    let highlighted = roster.search_result().and_then(Result::ok).map(|p| p.id.as_str());
    let mut lines = Vec::new();
    for group in roster.groups.ready().map(Vec::as_slice).unwrap_or_default() {
        lines.push(Line::from(Span::styled(
            group.position.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for player in &group.players {
            let style = if highlighted == Some(player.id.as_str()) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("  {}", player.name), style)));
        }
    }
    f.render_widget(Paragraph::new(lines).scroll((roster.scroll_offset, 0)), content);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let roster = &app.state.roster;
    let search = &roster.search;

    let (text, style) = if search.composing {
        (format!("/{}_", search.input), Style::default().fg(Color::White))
    } else {
        match roster.search_result() {
            Some(Ok(player)) => {
                let link = player
                    .photo
                    .as_deref()
                    .map(|url| format!("  {url}"))
                    .unwrap_or_default();
                (
                    format!("{} ({}){link}", player.name, player.position),
                    Style::default().fg(Color::Green),
                )
            }
            Some(Err(msg)) => (msg.to_owned(), Style::default().fg(Color::Red)),
            None => (
                "Tab next team, / search player".to_owned(),
                Style::default().fg(Color::DarkGray),
            ),
        }
    };

    let block = default_border(Color::DarkGray).title(" Search ");
    f.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn draw_debug_tab(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Debug: raw provider payloads ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut text = String::new();
    for section in DEBUG_SECTIONS {
        text.push_str(&format!("== {section} ==\n{}\n\n", app.state.debug.pretty(section)));
    }
    f.render_widget(
        Paragraph::new(text).scroll((app.state.debug.scroll_offset, 0)),
        inner,
    );
}

/// Raw JSON behind whichever tab is showing.
fn draw_debug_pane(f: &mut Frame, area: Rect, app: &App) {
    let section = match app.state.active_tab {
        MenuItem::Standings => "standings",
        MenuItem::GameDetail => "summary",
        MenuItem::Roster => "roster",
        MenuItem::Games | MenuItem::Debug | MenuItem::Help => "games",
    };
    let block = default_border(Color::DarkGray).title(format!(" {section} JSON "));
    f.render_widget(
        Paragraph::new(app.state.debug.pretty(section))
            .style(Style::default().fg(Color::Gray))
            .block(block),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::White));
    f.render_widget(logs, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    f.render_widget(Paragraph::new(HELP_TEXT).block(block), area);
}

fn draw_message(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rink_api::{GoalEvent, PlayByPlayEntry, StandingsRow};

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn standings_rows_show_record_points_and_streak() {
        let groups = vec![
            StandingsGroup {
                name: "Atlantic".into(),
                rows: vec![StandingsRow {
                    team: "Boston Bruins".into(),
                    wins: 5,
                    losses: 2,
                    ot_losses: Some(1),
                    points: 11,
                    streak: Some("W3".into()),
                    ..Default::default()
                }],
            },
            StandingsGroup { name: "Empty".into(), rows: vec![] },
        ];
        let lines = text(&standings_lines(&groups));
        assert!(lines[0].starts_with("Atlantic"));
        assert!(lines[1].starts_with("Boston Bruins"));
        assert!(lines[1].ends_with("5   2   1   11  W3"), "got {:?}", lines[1]);
        assert!(!lines.iter().any(|l| l.starts_with("Empty")));
    }

    #[test]
    fn summary_lists_goals_then_last_ten_plays() {
        let summary = GameSummary {
            goals: vec![GoalEvent {
                scorer: "David Pastrnak".into(),
                profile_url: Some("https://www.espn.com/nhl/player/_/id/3114778".into()),
                assists: vec!["Charlie McAvoy".into()],
                period: 1,
                time: "5:12".into(),
                ..Default::default()
            }],
            plays: (1..=12)
                .map(|i| PlayByPlayEntry { period: 2, time: "1:00".into(), description: format!("play {i}") })
                .collect(),
            ..Default::default()
        };

        let lines = text(&summary_lines(&summary));
        assert!(lines[1].contains("David Pastrnak (Charlie McAvoy)"));
        assert!(lines[2].contains("/id/3114778"));
        let plays: Vec<&String> = lines.iter().filter(|l| l.contains("play ")).collect();
        assert_eq!(plays.len(), 10);
        assert!(plays[0].ends_with("play 3"));
    }

    #[test]
    fn goal_line_shows_strength_tag() {
        let summary = GameSummary {
            goals: vec![GoalEvent {
                scorer: "Brad Marchand".into(),
                period: 3,
                time: "0:41".into(),
                strength: Some("EN".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let lines = text(&summary_lines(&summary));
        assert!(lines[1].ends_with("Brad Marchand (unassisted) [EN]"), "got {:?}", lines[1]);
    }

    #[test]
    fn empty_summary_says_so() {
        let lines = text(&summary_lines(&GameSummary::default()));
        assert!(lines.contains(&"  No goals yet".to_string()));
        assert!(lines.contains(&"  No plays yet".to_string()));
    }
}
