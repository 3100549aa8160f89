use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut request: Option<NetworkRequest> = None;

    // The search box swallows every key until it is submitted or cancelled.
    if guard.state.roster.search.composing {
        match key_event.code {
            KeyCode::Enter => guard.submit_search(),
            KeyCode::Esc => guard.cancel_search(),
            KeyCode::Backspace => {
                guard.state.roster.search.input.pop();
            }
            Char(c) => guard.state.roster.search.input.push(c),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Games),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('3'), _) => guard.update_tab(MenuItem::GameDetail),
        (_, Char('4'), _) => {
            guard.update_tab(MenuItem::Roster);
            request = guard.roster_request();
        }
        (_, Char('5'), _) => guard.update_tab(MenuItem::Debug),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Date picker
        (_, Char('['), _) => request = Some(guard.shift_date(-1)),
        (_, Char(']'), _) => request = Some(guard.shift_date(1)),
        (_, Char('t'), _) => request = Some(guard.jump_to_today()),

        // Games navigation
        (MenuItem::Games, Char('j') | KeyCode::Down, _) => guard.state.games.select_next(),
        (MenuItem::Games, Char('k') | KeyCode::Up, _) => guard.state.games.select_prev(),
        (MenuItem::Games, KeyCode::Enter, _) => request = guard.open_selected_game(),

        (MenuItem::GameDetail, KeyCode::Esc, _) => guard.update_tab(MenuItem::Games),

        // Roster: team picker and player search
        (MenuItem::Roster, KeyCode::Tab, _) => request = guard.cycle_team(),
        (MenuItem::Roster, Char('/'), _) => guard.start_search(),
        (MenuItem::Roster, KeyCode::Esc, _) => guard.state.roster.search.query = None,

        // Scrolling on the remaining tabs
        (_, Char('j') | KeyCode::Down, _) => {
            if let Some(offset) = guard.scroll_mut() {
                *offset = offset.saturating_add(1);
            }
        }
        (_, Char('k') | KeyCode::Up, _) => {
            if let Some(offset) = guard.scroll_mut() {
                *offset = offset.saturating_sub(1);
            }
        }

        // Global
        (_, Char('R'), _) => request = Some(NetworkRequest::RefreshAll),
        (_, Char('d'), _) => guard.toggle_debug(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}
