use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::{App, InputMode, View};

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.pending_quit {
            app.quit();
        } else {
            app.pending_quit = true;
        }
        return;
    }
    app.pending_quit = false;

    match app.input_mode {
        InputMode::Filter | InputMode::Command => handle_prompt_key(app, key),
        InputMode::Normal => match app.view {
            View::List => handle_list_key(app, key),
            View::Results => handle_results_key(app, key),
        },
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.input);
            let mode = app.input_mode;
            app.input_mode = InputMode::Normal;
            match mode {
                InputMode::Filter => app.apply_filter(&input),
                InputMode::Command => app.run_command(&input),
                InputMode::Normal => {}
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc if !app.toasts.is_empty() => app.toasts.dismiss(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_bottom(),
        KeyCode::Char(' ') => app.toggle_mark(),
        KeyCode::Char('a') => app.toggle_show_all(),
        KeyCode::Char('/') => {
            app.input = app.filter_source().unwrap_or_default().to_string();
            app.input_mode = InputMode::Filter;
        }
        KeyCode::Char(':') => {
            app.input.clear();
            app.input_mode = InputMode::Command;
        }
        KeyCode::Char('r') => {
            app.start_action("read", Vec::new());
        }
        KeyCode::Char('d') => {
            app.start_action("done", Vec::new());
        }
        KeyCode::Char('h') => {
            app.start_action("hide", Vec::new());
        }
        KeyCode::Char('o') => {
            app.start_action("open", Vec::new());
        }
        KeyCode::Enter if app.queue.action().is_empty() => {}
        // back to the last result view
        KeyCode::Enter => app.view = View::Results,
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.dismiss_results(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_results(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_results(-1),
        _ => {}
    }
}
