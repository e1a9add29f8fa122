// Gallery tab rendering.
// List of saved creations, newest first, with a metadata detail view.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::gallery::GalleryImage;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Draw the gallery tab: detail view when one is open, the list otherwise.
pub fn draw_gallery_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    if let Some(id) = app.gallery.detail.clone() {
        if let Some(entry) = app.gallery_store.get(&id) {
            draw_detail(frame, entry, area);
            return;
        }
        // Entry vanished underneath the detail view.
        app.gallery.close_detail();
    }
    draw_list(frame, app, area);
}

fn draw_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Gallery ");

    if app.gallery_store.is_empty() {
        let text = Paragraph::new("Your gallery is empty. Save a creation to see it here.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .gallery_store
        .images()
        .iter()
        .map(|entry| {
            let time = format_relative_time(&entry.timestamp);
            ListItem::new(Line::from(vec![
                Span::raw("🖼 "),
                Span::styled(entry.image.name.clone(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(truncate(&entry.prompt, 50), Style::default().fg(Color::White)),
                Span::styled(format!("  {}", time), Style::default().fg(Color::DarkGray)),
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

    frame.render_stateful_widget(list_widget, area, &mut app.gallery.list_state);
}

fn draw_detail(frame: &mut Frame, entry: &GalleryImage, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", entry.image.name));

    let local = entry.timestamp.with_timezone(&chrono::Local);
    let lines = vec![
        Line::from(vec![
            Span::styled("Prompt:    ", Style::default().fg(Color::DarkGray)),
            Span::styled(entry.prompt.clone(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Saved:     ", Style::default().fg(Color::DarkGray)),
            Span::raw(local.format("%Y-%m-%d %H:%M:%S %z").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Filename:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(entry.image.name.clone()),
        ]),
        Line::from(vec![
            Span::styled("Type:      ", Style::default().fg(Color::DarkGray)),
            Span::raw(entry.image.mime_type.clone()),
        ]),
        Line::from(vec![
            Span::styled("Size:      ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("~{} KiB", entry.image.payload_size() / 1024)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "x export  d delete  Esc back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::media::ImageFile;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_gallery_tab(frame, app, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_gallery_shows_empty_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = App::new(None, temp_dir.path().join("gallery.json"));

        let text = render(&mut app);
        assert!(text.contains("Your gallery is empty"));
    }

    #[test]
    fn test_saved_entry_replaces_empty_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = App::new(None, temp_dir.path().join("gallery.json"));
        let image = ImageFile::from_inline("QUJD".into(), "image/png".into(), "bike.png".into());
        app.gallery_store.append(image, "a red bicycle".into());

        let text = render(&mut app);
        assert!(!text.contains("Your gallery is empty"));
        assert!(text.contains("bike.png"));
    }
}
