use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use taskboard::client::ApiClient;
use taskboard::config::ClientSettings;
use taskboard::store::{Priority, TaskStatus};
use taskboard::ui::{self, App, Focus};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let settings = ClientSettings::from_env();
    let client = ApiClient::new(&settings)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial load; a failure degrades to an empty board with a notice.
    let mut app = App::new(Local::now().date_naive());
    let fetched = runtime.block_on(client.fetch_tasks());
    app.board.finish_load(fetched, Instant::now());

    let result = run_app(&mut terminal, &mut app, &client, &runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
    runtime: &Runtime,
) -> Result<()> {
    loop {
        app.today = Local::now().date_naive();
        app.board.tick(Instant::now());
        app.clamp_selection();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll so notices dismiss themselves even when the keyboard is idle.
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.focus {
            Focus::List => handle_list_key(key.code, app, client, runtime)?,
            _ => handle_form_key(key.code, app, client, runtime)?,
        }

        if app.quit {
            return Ok(());
        }
    }
}

fn handle_list_key(
    code: KeyCode,
    app: &mut App,
    client: &ApiClient,
    runtime: &Runtime,
) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Tab => app.focus = Focus::Title,
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Esc => app.board.dismiss_notice(),
        KeyCode::Up | KeyCode::Char('k') => app.selected = app.selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => app.selected += 1,
        KeyCode::Char('s') => app.board.status_filter = app.board.status_filter.cycle(),
        KeyCode::Char('p') => app.board.priority_filter = app.board.priority_filter.cycle(),
        KeyCode::Char('o') => app.board.sort = app.board.sort.toggle(),
        KeyCode::Char('r') => {
            app.board.loading = true;
            let fetched = runtime.block_on(client.fetch_tasks());
            app.board.finish_load(fetched, Instant::now());
        }
        KeyCode::Char('x') | KeyCode::Enter => toggle_selected(app, client, runtime),
        KeyCode::Char('d') => delete_selected(app, client, runtime),
        _ => {}
    }
    Ok(())
}

fn handle_form_key(
    code: KeyCode,
    app: &mut App,
    client: &ApiClient,
    runtime: &Runtime,
) -> Result<()> {
    match code {
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Esc => app.board.dismiss_notice(),
        KeyCode::Enter => submit_draft(app, client, runtime),
        KeyCode::Backspace => {
            if let Some(value) = form_value(app) {
                value.pop();
            }
        }
        KeyCode::Left if app.focus == Focus::Priority => {
            app.board.draft.priority = prev_priority(app.board.draft.priority);
        }
        KeyCode::Right if app.focus == Focus::Priority => {
            app.board.draft.priority = next_priority(app.board.draft.priority);
        }
        KeyCode::Char(c) => {
            if let Some(value) = form_value(app) {
                value.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

/// The text buffer behind the focused field, if it is a text field.
fn form_value(app: &mut App) -> Option<&mut String> {
    match app.focus {
        Focus::Title => Some(&mut app.board.draft.title),
        Focus::Description => Some(&mut app.board.draft.description),
        Focus::DueDate => Some(&mut app.board.draft.due_date),
        Focus::Priority | Focus::List => None,
    }
}

fn next_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::Medium,
        Priority::Medium => Priority::High,
        Priority::High => Priority::Low,
    }
}

fn prev_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::High,
        Priority::Medium => Priority::Low,
        Priority::High => Priority::Medium,
    }
}

/// Validate and, only if the form is clean, send the create. Validation
/// failures stay on the form; no request goes out.
fn submit_draft(app: &mut App, client: &ApiClient, runtime: &Runtime) {
    let Some(payload) = app.board.submit_payload(app.today) else {
        return;
    };
    if !app.board.begin_submit() {
        return;
    }
    let result = runtime.block_on(client.create_task(&payload));
    app.board.finish_create(result, Instant::now());
}

fn toggle_selected(app: &mut App, client: &ApiClient, runtime: &Runtime) {
    let Some((id, status)) = app
        .board
        .visible()
        .get(app.selected)
        .map(|t| (t.id, t.status))
    else {
        return;
    };
    if !app.board.begin_submit() {
        return;
    }
    let next = match status {
        TaskStatus::Completed => TaskStatus::Pending,
        TaskStatus::Pending => TaskStatus::Completed,
    };
    let result = runtime.block_on(client.update_status(id, next));
    app.board.finish_toggle(result, Instant::now());
}

fn delete_selected(app: &mut App, client: &ApiClient, runtime: &Runtime) {
    let Some(id) = app.board.visible().get(app.selected).map(|t| t.id) else {
        return;
    };
    if !app.board.begin_submit() {
        return;
    }
    let result = runtime.block_on(client.delete_task(id));
    app.board.finish_delete(id, result, Instant::now());
}
