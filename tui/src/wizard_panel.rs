//! Wizard panel: step card plus the documents-checklist sidebar.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph, Wrap},
};

use marg_types::WizardSession;

use crate::theme::{Glyphs, Palette};

const SIDEBAR_WIDTH: u16 = 34;

pub(crate) fn draw_wizard_panel(
    frame: &mut Frame,
    wizard: &WizardSession,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    focused: bool,
) {
    let has_checklist = !wizard.spec().checklist().is_empty();
    let chunks = if has_checklist && area.width > SIDEBAR_WIDTH + 30 {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30)])
            .split(area)
    };

    draw_step_card(frame, wizard, chunks[0], palette, glyphs, focused);
    if let Some(sidebar) = chunks.get(1) {
        draw_checklist(frame, wizard, *sidebar, palette, glyphs);
    }
}

fn draw_step_card(
    frame: &mut Frame,
    wizard: &WizardSession,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(palette.primary)
    } else {
        Style::default().fg(palette.bg_border)
    };
    let title = wizard.spec().name().unwrap_or("Guide").to_string();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(format!(" {} {title} ", glyphs.wizard))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // step counter
            Constraint::Length(1), // progress gauge
            Constraint::Min(1),    // step body
            Constraint::Length(1), // controls hint
        ])
        .split(inner);

    let counter = Line::from(vec![
        Span::styled(
            format!(
                "Step {} of {}",
                wizard.current_step_index() + 1,
                wizard.step_count()
            ),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}% complete", wizard.step_progress_percent()),
            Style::default().fg(palette.text_muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(counter), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.primary).bg(palette.bg_highlight))
        .ratio(f64::from(wizard.step_progress_percent()) / 100.0)
        .label("");
    frame.render_widget(gauge, rows[1]);

    let step = wizard.current_step();
    let mut body: Vec<Line<'static>> = Vec::new();
    body.push(Line::from(Span::styled(
        format!("{}. {}", step.id, step.title),
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    )));
    body.push(Line::from(Span::styled(
        step.description.clone(),
        Style::default().fg(palette.text_secondary),
    )));
    if let Some(details) = &step.details {
        body.push(Line::from(Span::styled(
            format!("Tip: {details}"),
            Style::default().fg(palette.accent),
        )));
    }
    if let Some(link) = &step.link {
        let label = step.action_label.as_deref().unwrap_or("Open link");
        body.push(Line::from(Span::styled(
            format!("{label} {} {link}", glyphs.link),
            Style::default().fg(palette.accent),
        )));
    }
    frame.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }),
        rows[2],
    );

    let next_label = if wizard.is_last_step() {
        "Finish Guide"
    } else {
        "Next Step"
    };
    let hint = format!("[\u{2190}] Previous  [\u{2192}] {next_label}  [1-9] toggle document");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(palette.text_muted),
        ))),
        rows[3],
    );
}

fn draw_checklist(
    frame: &mut Frame,
    wizard: &WizardSession,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(" Documents Checklist ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let checklist = wizard.spec().checklist();
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            "{}/{} ready ({}%)",
            wizard.checked_count(),
            checklist.len(),
            wizard.checklist_progress_percent(),
        ),
        Style::default().fg(palette.text_muted),
    )));
    lines.push(Line::from(""));

    for (index, item) in checklist.iter().enumerate() {
        let checked = wizard.is_checked(index);
        let (box_glyph, style) = if checked {
            (
                glyphs.check_on,
                Style::default()
                    .fg(palette.text_muted)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            (glyphs.check_off, Style::default().fg(palette.text_primary))
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. ", index + 1),
                Style::default().fg(palette.text_muted),
            ),
            Span::styled(
                format!("{box_glyph} "),
                Style::default().fg(if checked {
                    palette.success
                } else {
                    palette.text_secondary
                }),
            ),
            Span::styled(item.clone(), style),
        ]));
    }

    let official_link = wizard.spec().official_link();
    if official_link.starts_with("http") {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Official portal {} {official_link}", glyphs.link),
            Style::default().fg(palette.accent),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
