//! Terminal rendering for the board.
//!
//! Pure view layer: everything drawn here is read from [`App`], all state
//! changes happen in the event loop that owns it.

use crate::board::{Board, NoticeKind, Phase};
use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Description,
    DueDate,
    Priority,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Description,
            Focus::Description => Focus::DueDate,
            Focus::DueDate => Focus::Priority,
            Focus::Priority => Focus::List,
            Focus::List => Focus::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Title => Focus::List,
            Focus::Description => Focus::Title,
            Focus::DueDate => Focus::Description,
            Focus::Priority => Focus::DueDate,
            Focus::List => Focus::Priority,
        }
    }
}

pub struct App {
    pub board: Board,
    pub focus: Focus,
    pub selected: usize,
    pub today: NaiveDate,
    pub quit: bool,
}

impl App {
    pub fn new(today: NaiveDate) -> App {
        App {
            board: Board::new(),
            focus: Focus::Title,
            selected: 0,
            today,
            quit: false,
        }
    }

    /// Keep the selection inside the currently visible list.
    pub fn clamp_selection(&mut self) {
        let len = self.board.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_form(f, app, chunks[0]);
    draw_filter_bar(f, app, chunks[1]);
    draw_task_list(f, app, chunks[2]);
    draw_notice(f, app, chunks[3]);
    draw_help(f, app, chunks[4]);
}

// ── Form ───────────────────────────────────────────────────────

fn field_line<'a>(
    label: &'a str,
    value: &'a str,
    focused: bool,
    error: Option<&'a str>,
) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        Span::styled(format!("{label:<13}"), label_style),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }
    if let Some(message) = error {
        spans.push(Span::styled(
            format!("  {message}"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let draft = &app.board.draft;

    let priority_value = format!("◀ {} ▶", draft.priority);
    let lines = vec![
        field_line(
            "Title",
            &draft.title,
            app.focus == Focus::Title,
            draft.errors.title,
        ),
        field_line(
            "Description",
            &draft.description,
            app.focus == Focus::Description,
            None,
        ),
        field_line(
            "Due date",
            &draft.due_date,
            app.focus == Focus::DueDate,
            draft.errors.due_date,
        ),
        field_line(
            "Priority",
            &priority_value,
            app.focus == Focus::Priority,
            None,
        ),
    ];

    let title = if app.board.phase == Phase::Submitting {
        "Create a new task (working…)"
    } else {
        "Create a new task"
    };

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if app.focus == Focus::List {
                Style::default()
            } else {
                Style::default().fg(Color::Cyan)
            }),
    );
    f.render_widget(form, area);
}

// ── Filter bar ─────────────────────────────────────────────────

fn draw_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let board = &app.board;
    let bar = Line::from(vec![
        Span::styled(" Status: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(board.status_filter.label()),
        Span::raw("  │  "),
        Span::styled("Priority: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(board.priority_filter.label()),
        Span::raw("  │  "),
        Span::styled("Sort: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(board.sort.label()),
    ]);
    f.render_widget(Paragraph::new(bar), area);
}

// ── Task list ──────────────────────────────────────────────────

fn draw_task_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Tasks")
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::List {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if app.board.loading {
        let loading = Paragraph::new("Loading tasks…")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    let visible = app.board.visible();
    if visible.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from("You have no tasks yet."),
            Line::from(Span::styled(
                "Create your first task to start tracking your work.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| {
            let marker = if task.is_completed() { "✓" } else { " " };
            let due = task
                .due_date
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_else(|| "—".to_string());

            let title_style = if task.is_completed() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::raw(format!("[{marker}] ")),
                Span::styled(task.title.clone(), title_style),
                Span::styled(
                    format!("  {} priority", task.priority),
                    Style::default().fg(priority_color(task)),
                ),
                Span::raw(format!("  due {due}")),
            ];
            if task.is_overdue(app.today) {
                spans.push(Span::styled(
                    "  Overdue",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");

    let mut state = ListState::default();
    if app.focus == Focus::List {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn priority_color(task: &crate::client::TaskView) -> Color {
    use crate::store::Priority;
    match task.priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

// ── Notice & help ──────────────────────────────────────────────

fn draw_notice(f: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = app.board.notice() else {
        return;
    };

    let (icon, color) = match notice.kind {
        NoticeKind::Success => ("✓", Color::Green),
        NoticeKind::Error => ("!", Color::Red),
    };

    let mut spans = vec![Span::styled(
        format!(" {icon} {}", notice.title),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(message) = &notice.message {
        spans.push(Span::styled(
            format!(" — {message}"),
            Style::default().fg(color),
        ));
    }
    spans.push(Span::styled(
        "  (Esc to dismiss)",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.focus {
        Focus::List => {
            " ↑/↓ select · x toggle done · d delete · s status · p priority · o sort · r reload · Tab form · q quit"
        }
        Focus::Priority => " ←/→ choose priority · Enter add task · Tab next field",
        _ => " type to edit · Enter add task · Tab next field",
    };
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        area,
    );
}
