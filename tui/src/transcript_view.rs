//! Chat transcript rendering.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
};

use marg_session::Transcript;
use marg_types::{Role, Turn, TurnBody, WizardSession};

use crate::reveal::RevealTracker;
use crate::theme::{Glyphs, Palette};
use crate::wrap::wrap_text;

pub(crate) struct TranscriptView<'a> {
    pub transcript: &'a Transcript,
    pub reveal: &'a RevealTracker,
    pub awaiting_reply: bool,
    pub spinner: &'static str,
    pub focused_wizard: Option<usize>,
}

pub(crate) fn draw_transcript(
    frame: &mut Frame,
    view: &TranscriptView<'_>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = Block::default().padding(Padding::horizontal(1));
    let inner = block.inner(area);
    let width = usize::from(inner.width.max(1));

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (index, turn) in view.transcript.turns().iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        lines.push(header_line(turn, palette, glyphs));
        match turn.body() {
            TurnBody::Text(text) => {
                push_text_lines(&mut lines, text, view.reveal.visible_chars(index), width, palette);
            }
            TurnBody::Wizard(wizard) => {
                push_wizard_card(
                    &mut lines,
                    wizard,
                    view.focused_wizard == Some(index),
                    palette,
                    glyphs,
                );
            }
        }
    }

    if view.awaiting_reply {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", view.spinner),
                Style::default().fg(palette.accent),
            ),
            Span::styled(
                "Thinking...",
                Style::default()
                    .fg(palette.text_muted)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    // Bottom-anchored: always show the newest turns, like a chat log.
    let visible = usize::from(inner.height);
    let scroll = lines.len().saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn header_line(turn: &Turn, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    let (icon, style) = match turn.role() {
        Role::User => (
            glyphs.user,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Role::Assistant => (
            glyphs.assistant,
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
    };
    Line::from(Span::styled(
        format!("{icon} {}", turn.role().label()),
        style,
    ))
}

fn push_text_lines(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    visible_chars: Option<usize>,
    width: usize,
    palette: &Palette,
) {
    let shown: String = match visible_chars {
        Some(count) => text.chars().take(count).collect(),
        None => text.to_string(),
    };
    let style = Style::default().fg(palette.text_primary);
    for logical in shown.split('\n') {
        for row in wrap_text(logical, width) {
            lines.push(Line::from(Span::styled(row, style)));
        }
    }
}

fn push_wizard_card(
    lines: &mut Vec<Line<'static>>,
    wizard: &WizardSession,
    focused: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let name = wizard.spec().name().unwrap_or("Guide").to_string();
    let summary = format!(
        "{} {name} - step {}/{} ({}%)",
        glyphs.wizard,
        wizard.current_step_index() + 1,
        wizard.step_count(),
        wizard.step_progress_percent(),
    );
    lines.push(Line::from(Span::styled(
        summary,
        Style::default().fg(palette.warning),
    )));
    let hint = if focused {
        "guide open below - Esc returns to the prompt"
    } else {
        "press Tab to open this guide"
    };
    lines.push(Line::from(Span::styled(
        format!("  {hint}"),
        Style::default().fg(palette.text_muted),
    )));
}
