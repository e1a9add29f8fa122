// UI module for rendering the TUI.
// Contains widgets for the tab bar, workflow forms, gallery, and modals.

mod gallery;
mod modal;
mod tabs;
mod workflow;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode, Tab};
use crate::state::ConsoleLevel;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Modals render last, on top of everything.
    if let InputMode::AttachingImage { input } = &app.input_mode {
        modal::draw_attach_modal(frame, input);
    }
    if app.active_tab == Tab::Gallery {
        if let Some(id) = app.gallery.confirm_delete.clone() {
            let name = app
                .gallery_store
                .get(&id)
                .map(|entry| entry.image.name.clone())
                .unwrap_or_else(|| id.clone());
            modal::draw_confirm_delete_modal(frame, &name);
        }
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.active_tab {
        Tab::Gallery => gallery::draw_gallery_tab(frame, app, area),
        Tab::Console => draw_console_tab(frame, app, area),
        tab => {
            if let Some(kind) = tab.workflow_kind() {
                let editing = app.input_mode == InputMode::EditingPrompt;
                workflow::draw_workflow_tab(frame, app.workflow(kind), editing, area);
            }
        }
    }
}

/// Draw the Console tab with activity messages.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console_messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    // Show newest messages first (reverse order)
    let items: Vec<ListItem> = app
        .console_messages
        .iter()
        .rev()
        .map(|msg| {
            let (icon, color) = match msg.level {
                ConsoleLevel::Error => ("❌", Color::Red),
                ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                ConsoleLevel::Info => ("ℹ️", Color::Cyan),
            };

            let time = gallery::format_relative_time(&msg.timestamp);

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(time, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.console_list_state);
}

/// Draw the status bar with keybinding hints.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match &app.input_mode {
        InputMode::EditingPrompt => vec![
            Span::raw(" type to edit prompt  "),
            Span::raw("↵/Esc "),
            Span::styled("Done", Style::default().fg(Color::DarkGray)),
        ],
        InputMode::AttachingImage { .. } => vec![
            Span::raw(" type a file path  "),
            Span::raw("↵ "),
            Span::styled("Attach", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("Cancel", Style::default().fg(Color::DarkGray)),
        ],
        InputMode::Normal => match app.active_tab {
            Tab::Gallery => vec![
                Span::raw(" ↑↓ "),
                Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
                Span::raw("  ↵ "),
                Span::styled("Detail", Style::default().fg(Color::DarkGray)),
                Span::raw("  d "),
                Span::styled("Delete", Style::default().fg(Color::DarkGray)),
                Span::raw("  x "),
                Span::styled("Export", Style::default().fg(Color::DarkGray)),
                Span::raw("  Tab "),
                Span::styled("Switch", Style::default().fg(Color::DarkGray)),
                Span::raw("  q "),
                Span::styled("Quit", Style::default().fg(Color::DarkGray)),
            ],
            Tab::Console => vec![
                Span::raw(" ↑↓ "),
                Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
                Span::raw("  Tab "),
                Span::styled("Switch", Style::default().fg(Color::DarkGray)),
                Span::raw("  q "),
                Span::styled("Quit", Style::default().fg(Color::DarkGray)),
            ],
            _ => {
                let mut hints = vec![
                    Span::raw(" p "),
                    Span::styled("Prompt", Style::default().fg(Color::DarkGray)),
                    Span::raw("  a "),
                    Span::styled("Attach", Style::default().fg(Color::DarkGray)),
                ];
                let offers_ratio = app
                    .active_tab
                    .workflow_kind()
                    .is_some_and(|kind| kind.offers_aspect_ratio());
                if offers_ratio {
                    hints.push(Span::raw("  r "));
                    hints.push(Span::styled("Ratio", Style::default().fg(Color::DarkGray)));
                }
                hints.extend([
                    Span::raw("  ↵ "),
                    Span::styled("Generate", Style::default().fg(Color::DarkGray)),
                    Span::raw("  s "),
                    Span::styled("Save", Style::default().fg(Color::DarkGray)),
                    Span::raw("  Tab "),
                    Span::styled("Switch", Style::default().fg(Color::DarkGray)),
                    Span::raw("  q "),
                    Span::styled("Quit", Style::default().fg(Color::DarkGray)),
                ]);
                hints
            }
        },
    };

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}
