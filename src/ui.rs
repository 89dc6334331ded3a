use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io::{self, BufRead};
use tasklist::storage::Persistence;
use tasklist::task::{Priority, Task};
use tasklist::task_store::{FilterOption, TaskStore};

#[derive(Debug, Default)]
struct App {
    list: ListState,
    status: String,
}

pub fn run_app<B: Backend, P: Persistence>(
    terminal: &mut Terminal<B>,
    store: &mut TaskStore<P>,
) -> io::Result<()> {
    let mut app = App::default();
    loop {
        clamp_selection(&mut app, store.filtered_tasks().len());
        terminal.draw(|f| render(f, store, &mut app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let selected = app
            .list
            .selected()
            .and_then(|i| store.filtered_tasks().get(i).map(|t| (*t).clone()));

        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Char('a') => {
                app.status = add_interactive(store);
                terminal.clear()?;
            }
            KeyCode::Char('e') => {
                if let Some(task) = selected {
                    app.status = edit_interactive(store, task);
                    terminal.clear()?;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(task) = selected {
                    store.toggle_task(task.id);
                }
            }
            KeyCode::Char('p') => {
                if let Some(mut task) = selected {
                    task.priority = task.priority.next();
                    store.update_task(task);
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = selected {
                    store.delete_task(task.id);
                    app.status = format!("Deleted \"{}\"", task.title);
                }
            }
            KeyCode::Char('c') => {
                if store.completed_count() > 0 {
                    let removed = store.delete_completed();
                    app.status = format!("Cleared {} completed task(s)", removed);
                }
            }
            KeyCode::Char('f') | KeyCode::Tab => {
                store.set_filter(store.filter().next());
                app.list.select(Some(0));
            }
            KeyCode::Up => app.list.select_previous(),
            KeyCode::Down => app.list.select_next(),
            _ => {}
        }
    }
}

fn clamp_selection(app: &mut App, len: usize) {
    let selected = match (app.list.selected(), len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    };
    app.list.select(selected);
}

fn render<P: Persistence>(f: &mut Frame, store: &TaskStore<P>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let counts = Line::from(vec![
        Span::styled(
            format!("Total {}", store.total_count()),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("   "),
        Span::styled(
            format!("Active {}", store.active_count()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("   "),
        Span::styled(
            format!("Completed {}", store.completed_count()),
            Style::default().fg(Color::Green),
        ),
    ]);
    f.render_widget(
        Paragraph::new(counts).block(Block::default().title("My Tasks").borders(Borders::ALL)),
        chunks[0],
    );

    let selected_filter = FilterOption::ALL
        .iter()
        .position(|option| *option == store.filter())
        .unwrap_or(0);
    let tabs = Tabs::new(FilterOption::ALL.iter().map(|option| option.label()))
        .block(Block::default().borders(Borders::ALL))
        .select(selected_filter)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[1]);

    let today = Local::now().date_naive();
    let tasks = store.filtered_tasks();
    let items: Vec<ListItem> = tasks.iter().map(|t| task_item(t, today)).collect();
    let title = if items.is_empty() {
        "No tasks - press 'a' to add one"
    } else {
        "Tasks"
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, chunks[2], &mut app.list);

    let footer = if app.status.is_empty() {
        "a add  e edit  space toggle  p priority  d delete  c clear done  f filter  q quit"
    } else {
        app.status.as_str()
    };
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn task_item(task: &Task, today: NaiveDate) -> ListItem<'_> {
    let (mark, title_style) = if task.is_completed {
        (
            "[x] ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ] ", Style::default().fg(Color::White))
    };

    let mut header = vec![
        Span::raw(mark),
        Span::styled(&task.title, title_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority.label()),
            Style::default()
                .fg(priority_color(task.priority))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(due) = task.due_date {
        let style = if task.is_overdue(today) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header.push(Span::styled(format!(" (Due: {})", due), style));
    }

    let detail = Line::from(Span::styled(
        detail_text(task),
        Style::default().fg(Color::Gray),
    ));
    ListItem::new(vec![Line::from(header), detail])
}

fn detail_text(task: &Task) -> String {
    let created = task
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    if task.description.is_empty() {
        format!("    Created {}", created)
    } else {
        format!("    Created {} - {}", created, task.description)
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority.color() {
        "green" => Color::Green,
        "orange" => Color::Rgb(255, 165, 0),
        "red" => Color::Red,
        _ => Color::Gray,
    }
}

fn add_interactive<P: Persistence>(store: &mut TaskStore<P>) -> String {
    let Some(title) = prompt("Enter task title (empty to cancel)").filter(|t| !t.is_empty())
    else {
        return "Add cancelled".to_string();
    };
    let description = prompt("Enter description (optional)").unwrap_or_default();
    let priority = prompt("Enter priority (low/medium/high) [medium]")
        .and_then(|input| parse_priority(&input))
        .unwrap_or_default();
    let due_date = prompt("Enter due date (YYYY-MM-DD, optional)")
        .and_then(|input| parse_due_date(&input));

    store.add_task(title.clone(), description, priority, due_date);
    format!("Added \"{}\"", title)
}

fn edit_interactive<P: Persistence>(store: &mut TaskStore<P>, mut task: Task) -> String {
    if let Some(title) = prompt(&format!("Title [{}]", task.title)).filter(|t| !t.is_empty()) {
        task.title = title;
    }
    let description = prompt(&format!("Description [{}] ('-' clears)", task.description));
    match field_edit(description) {
        FieldEdit::Keep => {}
        FieldEdit::Clear => task.description.clear(),
        FieldEdit::Set(description) => task.description = description,
    }
    let current_due = task
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "none".to_string());
    match field_edit(prompt(&format!("Due date [{}] ('-' clears)", current_due))) {
        FieldEdit::Keep => {}
        FieldEdit::Clear => task.due_date = None,
        FieldEdit::Set(input) => {
            if let Some(date) = parse_due_date(&input) {
                task.due_date = Some(date);
            }
        }
    }

    let title = task.title.clone();
    if store.update_task(task) {
        format!("Updated \"{}\"", title)
    } else {
        "Task no longer exists".to_string()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FieldEdit {
    Keep,
    Clear,
    Set(String),
}

/// Empty input keeps the current value, `-` clears it.
fn field_edit(input: Option<String>) -> FieldEdit {
    match input {
        None => FieldEdit::Keep,
        Some(text) if text.is_empty() => FieldEdit::Keep,
        Some(text) if text == "-" => FieldEdit::Clear,
        Some(text) => FieldEdit::Set(text),
    }
}

fn parse_priority(input: &str) -> Option<Priority> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Priority::ALL.into_iter().find(|p| {
        let label = p.label();
        label.eq_ignore_ascii_case(input) || label[..1].eq_ignore_ascii_case(input)
    })
}

fn parse_due_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let answer = read_answer(&mut io::stdin().lock());
    enable_raw_mode().ok();
    answer
}

/// Trimmed next line, or `None` once input is closed or unreadable.
fn read_answer(reader: &mut impl BufRead) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}
