use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Frame,
};
use crate::filters::{aggregate, by_weekday, progress_stats, visible_weekdays};
use crate::models::Priority;
use crate::reference::{category_info, current_weekday, weekday_info};
use super::app::{App, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Weekday tabs
            Constraint::Length(3), // Progress
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let stats = progress_stats(app.repo.tasks(), app.weekend_mode);
    let today = current_weekday();
    let days = visible_weekdays(app.weekend_mode);

    let titles: Vec<String> = days
        .iter()
        .map(|d| {
            let agg = stats.by_weekday.get(d).copied().unwrap_or_default();
            let marker = if *d == today { "*" } else { "" };
            format!("{}{} {}/{}", weekday_info(*d).short_label, marker, agg.completed, agg.total)
        })
        .collect();
    let selected = days.iter().position(|d| *d == app.selected_weekday).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(if app.weekend_mode { "Weekend Days" } else { "Your Week" }))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let day = aggregate(&by_weekday(app.repo.tasks(), app.selected_weekday));
    let filters = app.filter_options();
    let progress = format!(
        "{}: {}/{} done ({}%)  |  {}: {}/{} ({}%)  |  category: {}  priority: {}  show: {}{}",
        weekday_info(app.selected_weekday).label,
        day.completed,
        day.total,
        day.percentage,
        if app.weekend_mode { "Weekend" } else { "Week" },
        stats.overall.completed,
        stats.overall.total,
        stats.overall.percentage,
        filters.category.map(|c| category_info(c).label).unwrap_or("all"),
        filters.priority.map(|p| p.as_str()).unwrap_or("all"),
        app.completion_filter.label(),
        filters.search_term.map(|s| format!("  search: \"{}\"", s)).unwrap_or_default(),
    );
    let progress = Paragraph::new(progress)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("Progress"));
    f.render_widget(progress, chunks[1]);

    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|t| {
            let style = if t.completed {
                Style::default().fg(Color::DarkGray)
            } else {
                match t.priority {
                    Priority::High => Style::default().fg(Color::Red),
                    Priority::Medium => Style::default().fg(Color::Yellow),
                    Priority::Low => Style::default().fg(Color::Green),
                }
            };
            Row::new(vec![
                Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                Cell::from(t.title.clone()),
                Cell::from(t.description.clone().unwrap_or_default()),
                Cell::from(category_info(t.category).label),
                Cell::from(t.priority.as_str()),
                Cell::from(t.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Title", "Description", "Category", "Priority", "Due"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(format!("Tasks for {}", weekday_info(app.selected_weekday).label)))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[2], &mut app.state);

    let help_text = match (&app.message, &app.input_mode) {
        (Some(msg), _) => msg.clone(),
        (None, InputMode::Normal) => "q: Quit | h/l: Day | a: Add | e: Edit | Space: Done | d: Del | x: Clear Done | w: Weekend | c/p/f: Filters | /: Search".to_string(),
        (None, InputMode::Editing) | (None, InputMode::Searching) => "Enter: Save | Esc: Cancel".to_string(),
        (None, InputMode::Adding) => "Enter: Next Step | Esc: Cancel".to_string(),
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[3]);

    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => format!("Add Task to {}: Enter Title", weekday_info(app.selected_weekday).label),
                1 => "Add Task: Enter Description (Optional)".to_string(),
                2 => {
                    let choices: Vec<&str> = app.category_choices().iter().map(|c| c.as_str()).collect();
                    format!("Add Task: Category [{}]", choices.join(", "))
                }
                3 => "Add Task: Priority [high, medium, low]".to_string(),
                _ => "Add Task".to_string(),
            },
            InputMode::Editing => "Edit Title".to_string(),
            InputMode::Searching => "Search".to_string(),
            InputMode::Normal => String::new(),
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
