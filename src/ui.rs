use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup};
use crate::task::{Priority, Task};
use crate::view;

const HINT: &str = " Tab: next field · ←/→: change · Enter: add/toggle · Esc: quit ";

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(f.area());

    let filter_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);

    let form_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(18),
            Constraint::Percentage(22),
            Constraint::Percentage(15),
        ])
        .split(rows[1]);

    text_input(f, app, Focus::Search, "Search", &app.search, filter_row[0]);
    selector(f, app, Focus::Status, "Status", app.status.label(), filter_row[1]);
    text_input(
        f,
        app,
        Focus::Description,
        "Task description",
        &app.description,
        form_row[0],
    );
    selector(f, app, Focus::Priority, "Priority", app.priority.as_str(), form_row[1]);
    text_input(
        f,
        app,
        Focus::DueDate,
        "Due (YYYY-MM-DD)",
        &app.due_input,
        form_row[2],
    );
    add_button(f, app, form_row[3]);
    task_list(f, app, rows[2]);

    if let Some(popup) = &app.popup {
        draw_popup(f, popup, f.area());
    }
}

fn block(app: &App, focus: Focus, title: &str) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(if app.focus == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
}

fn text_input(f: &mut Frame, app: &App, focus: Focus, title: &str, text: &str, area: Rect) {
    f.render_widget(Paragraph::new(text).block(block(app, focus, title)), area);
    if app.focus == focus && app.popup.is_none() {
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(area.right().saturating_sub(2));
        f.set_cursor_position((x, area.y + 1));
    }
}

fn selector(f: &mut Frame, app: &App, focus: Focus, title: &str, value: &str, area: Rect) {
    let line = Line::from(vec![
        Span::raw("◀ "),
        Span::styled(value.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ▶"),
    ]);
    f.render_widget(Paragraph::new(line).block(block(app, focus, title)), area);
}

fn add_button(f: &mut Frame, app: &App, area: Rect) {
    let style = if app.focus == Focus::AddButton {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    let button = Paragraph::new(Span::styled(" Add Task ", style)).block(block(
        app,
        Focus::AddButton,
        "",
    ));
    f.render_widget(button, area);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

fn task_item(task: &Task) -> ListItem<'static> {
    let marker = if task.done { "[x] " } else { "[ ] " };
    let text_style = if task.done {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(priority_color(task.priority))
    };
    ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::styled(view::row_text(task), text_style),
    ]))
}

fn task_list(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_tasks();
    let title = format!("Tasks ({}/{})", visible.len(), app.store.len());
    let items: Vec<ListItem> = visible.iter().map(|(_, t)| task_item(t)).collect();

    let list = List::new(items)
        .block(block(app, Focus::List, &title).title_bottom(HINT))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if app.focus == Focus::List && !visible.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_popup(f: &mut Frame, popup: &Popup, area: Rect) {
    let width = 60.min(area.width);
    let text = format!("{}\n\nEnter/Esc to close", popup.message);
    let rows = Paragraph::new(text.as_str())
        .wrap(Wrap { trim: false })
        .line_count(width.saturating_sub(2));
    // Two extra rows for the borders.
    let height = u16::try_from(rows.saturating_add(2))
        .unwrap_or(u16::MAX)
        .min(area.height);
    let rect = centered_rect(width, height, area);

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(popup.title.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
