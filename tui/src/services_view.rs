//! Catalog pages: services listing and service detail.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};

use marg_session::{DetailPage, ServiceView, ServicesPage};

use crate::theme::{Glyphs, Palette};
use crate::wizard_panel::draw_wizard_panel;

pub(crate) fn draw_services(
    frame: &mut Frame,
    page: &ServicesPage,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    spinner: &'static str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(" Government Services ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match page {
        ServicesPage::Idle | ServicesPage::Loading { .. } => {
            centered_note(frame, inner, format!("{spinner} Loading services..."), palette);
        }
        ServicesPage::Failed(message) => {
            draw_page_error(frame, inner, "Could not load services", message, "[Esc] Back", palette);
        }
        ServicesPage::Ready { services, selected } => {
            if services.is_empty() {
                centered_note(frame, inner, "No services found.".to_string(), palette);
                return;
            }
            let mut lines: Vec<Line<'static>> = Vec::new();
            for (index, service) in services.iter().enumerate() {
                let is_selected = index == *selected;
                let marker = if is_selected { glyphs.bullet } else { " " };
                let name_style = if is_selected {
                    Style::default()
                        .fg(palette.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.text_primary)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{marker} "), Style::default().fg(palette.accent)),
                    Span::styled(service.name.clone(), name_style),
                    Span::styled(
                        format!("  v{}", service.version),
                        Style::default().fg(palette.text_muted),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", service.description),
                    Style::default().fg(palette.text_secondary),
                )));
                if index + 1 < services.len() {
                    lines.push(Line::from(""));
                }
            }
            // Keep the selection on screen for long listings.
            let row_of_selected = selected * 3;
            let visible = usize::from(inner.height);
            let scroll = row_of_selected.saturating_sub(visible.saturating_sub(3)) as u16;
            frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
        }
    }
}

pub(crate) fn draw_service_detail(
    frame: &mut Frame,
    page: &DetailPage,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    spinner: &'static str,
) {
    match page {
        DetailPage::Idle | DetailPage::Loading { .. } => {
            centered_note(
                frame,
                area,
                format!("{spinner} Loading service details..."),
                palette,
            );
        }
        DetailPage::NotFound(message) => {
            draw_page_error(
                frame,
                area,
                "Error",
                message,
                "[Esc] Back to Services",
                palette,
            );
        }
        DetailPage::Failed(message) => {
            draw_page_error(
                frame,
                area,
                "Could not load service",
                message,
                "[Esc] Back to Services",
                palette,
            );
        }
        DetailPage::Ready(view) => draw_detail_ready(frame, view, area, palette, glyphs),
    }
}

fn draw_detail_ready(
    frame: &mut Frame,
    view: &ServiceView,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let record = &view.record;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(8),    // wizard
            Constraint::Length(1), // disclaimer
        ])
        .split(area);

    let header = vec![
        Line::from(Span::styled(
            record.name.clone(),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            record.description.clone(),
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(Span::styled(
            format!(
                "Version: {}    Last updated: {}",
                record.version, record.last_updated
            ),
            Style::default().fg(palette.text_muted),
        )),
    ];
    frame.render_widget(
        Paragraph::new(header).block(Block::default().padding(Padding::horizontal(1))),
        rows[0],
    );

    if let Some(wizard) = &view.wizard {
        draw_wizard_panel(frame, wizard, rows[1], palette, glyphs, true);
    } else {
        centered_note(
            frame,
            rows[1],
            "This service has no guided steps yet.".to_string(),
            palette,
        );
    }

    if !record.legal_disclaimer.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("Disclaimer: {}", record.legal_disclaimer),
                Style::default().fg(palette.text_muted),
            )))
            .alignment(Alignment::Center),
            rows[2],
        );
    }
}

fn centered_note(frame: &mut Frame, area: Rect, text: String, palette: &Palette) {
    let note = Paragraph::new(text)
        .style(Style::default().fg(palette.text_muted))
        .alignment(Alignment::Center);
    let y = area.y + area.height / 2;
    let note_area = Rect {
        x: area.x,
        y: y.min(area.y + area.height.saturating_sub(1)),
        width: area.width,
        height: 1,
    };
    frame.render_widget(note, note_area);
}

fn draw_page_error(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    back_hint: &str,
    palette: &Palette,
) {
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        Line::from(Span::styled(
            back_hint.to_string(),
            Style::default().fg(palette.accent),
        )),
    ];
    let y_offset = (area.height / 2).saturating_sub(2);
    let error_area = Rect {
        x: area.x,
        y: area.y + y_offset,
        width: area.width,
        height: area.height.saturating_sub(y_offset).min(5),
    };
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        error_area,
    );
}
