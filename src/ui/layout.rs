use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Which optional panes share the screen with the active tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panes {
    pub full_screen: bool,
    pub debug: bool,
    pub logs: bool,
}

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug)]
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    /// Raw JSON of the active section, beside the tab.
    pub debug: Option<Rect>,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, Panes::default())
    }

    pub fn update(&mut self, area: Rect, panes: Panes) {
        *self = Self::from_rect(area, panes);
    }

    fn from_rect(area: Rect, panes: Panes) -> Self {
        let (tab_bar, body) = if panes.full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [tab, body] = Layout::vertical([
                Constraint::Length(TAB_BAR_HEIGHT),
                Constraint::Fill(1),
            ])
            .areas(area);
            (Self::split_tab_bar(tab), body)
        };

        let (body, logs) = if panes.logs {
            let [body, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)])
                    .areas(body);
            (body, Some(logs))
        } else {
            (body, None)
        };

        let (main, debug) = if panes.debug {
            let [main, debug] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .areas(body);
            (main, Some(debug))
        } else {
            (body, None)
        };

        LayoutAreas { tab_bar, main, debug, logs }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}
