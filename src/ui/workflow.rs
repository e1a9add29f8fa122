// Workflow form rendering.
// Each workflow tab is the same thin form: prompt, image slots, aspect
// ratio, and a result panel reflecting the current phase.

use ratatui::{prelude::*, widgets::*};

use crate::state::{
    GenerationOutput, GenerationResult, ImageSlots, WorkflowPhase, WorkflowState,
};

/// Draw a workflow tab: input form on top, result panel below.
pub fn draw_workflow_tab(frame: &mut Frame, state: &WorkflowState, editing: bool, area: Rect) {
    let ratio_line = if state.kind.offers_aspect_ratio() { 1 } else { 0 };
    let form_height = 3 + state.slots.len() as u16 + ratio_line;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Prompt
            Constraint::Length(form_height), // Slots + aspect ratio
            Constraint::Min(3),              // Result panel
        ])
        .split(area);

    draw_prompt(frame, state, editing, chunks[0]);
    draw_inputs(frame, state, chunks[1]);
    draw_result(frame, state, chunks[2]);
}

fn draw_prompt(frame: &mut Frame, state: &WorkflowState, editing: bool, area: Rect) {
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Prompt ");

    let mut spans = vec![Span::raw(state.prompt.as_str())];
    if editing {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    } else if state.prompt.is_empty() {
        let hint = if state.kind.requires_prompt() {
            "press p to type a prompt"
        } else {
            "(optional for this workflow)"
        };
        spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(widget, area);
}

fn draw_inputs(frame: &mut Frame, state: &WorkflowState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Inputs ");

    let mut lines: Vec<Line> = state
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let marker = if i == state.active_slot { "▸ " } else { "  " };
            let contents = match &slot.images {
                ImageSlots::Single(None) => {
                    Span::styled("empty", Style::default().fg(Color::DarkGray))
                }
                ImageSlots::Single(Some(image)) => {
                    Span::styled(image.name.clone(), Style::default().fg(Color::Cyan))
                }
                ImageSlots::Multiple(images) if images.is_empty() => {
                    Span::styled("empty", Style::default().fg(Color::DarkGray))
                }
                ImageSlots::Multiple(images) => Span::styled(
                    format!("{} file(s)", images.len()),
                    Style::default().fg(Color::Cyan),
                ),
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{}: ", slot.label), Style::default().fg(Color::White)),
                contents,
            ])
        })
        .collect();

    if state.kind.offers_aspect_ratio() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("Aspect ratio: ", Style::default().fg(Color::White)),
            Span::styled(
                state.aspect_ratio.as_str(),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled("  (r to cycle)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let widget = Paragraph::new(lines).block(block);
    frame.render_widget(widget, area);
}

fn draw_result(frame: &mut Frame, state: &WorkflowState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", state.kind.title()));

    match &state.phase {
        WorkflowPhase::Idle => {
            let text = Paragraph::new("Press Enter to generate")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(text, area);
        }
        WorkflowPhase::Requesting { message } => {
            let text = Paragraph::new(format!("⏳ {}...", message))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(text, area);
        }
        WorkflowPhase::Failed(message) => {
            let text = Paragraph::new(format!("❌ {}", message))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
        }
        WorkflowPhase::Succeeded(result) => {
            let lines = result_lines(state, result);
            let text = Paragraph::new(lines).block(block);
            frame.render_widget(text, area);
        }
    }
}

fn result_lines<'a>(state: &'a WorkflowState, result: &'a GenerationResult) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    match &result.output {
        GenerationOutput::Image(image) => {
            lines.push(Line::from(vec![
                Span::raw("✅ "),
                Span::styled(image.name.as_str(), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("  {}  ~{} KiB", image.mime_type, image.payload_size() / 1024),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            if result.saved {
                lines.push(Line::from(Span::styled(
                    "💾 Saved to gallery",
                    Style::default().fg(Color::Green),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "Press s to save to gallery",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            if state.kind.offers_handoff() {
                lines.push(Line::from(Span::styled(
                    "Press c to continue in the Video workflow",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        GenerationOutput::Video(url) => {
            lines.push(Line::from(vec![
                Span::raw("🎬 "),
                Span::styled(url.as_str(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(Span::styled(
                "Open the URL in a player to watch",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines
}
