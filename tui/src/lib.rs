//! TUI rendering and key handling for marg using ratatui.
//!
//! The binary owns the frame loop; this crate owns everything view-side:
//! the prompt editor, the reveal effect, per-route drawing, and the mapping
//! from key events to session operations.

mod input;
mod reveal;
mod services_view;
mod theme;
mod transcript_view;
mod wizard_panel;
mod wrap;

pub use input::InputLine;
pub use reveal::RevealTracker;
pub use theme::{Glyphs, Palette, glyphs, palette};

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use marg_session::{App, Route, SubmitOutcome, WizardCommand};
use marg_types::Turn;

use self::services_view::{draw_service_detail, draw_services};
use self::transcript_view::{TranscriptView, draw_transcript};
use self::wizard_panel::draw_wizard_panel;

const WIZARD_PANEL_HEIGHT: u16 = 14;
const INPUT_HEIGHT: u16 = 3;
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// Presentation options resolved from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub reveal_cps: u32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            ascii_only: false,
            high_contrast: false,
            reduced_motion: false,
            reveal_cps: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChatFocus {
    #[default]
    Input,
    Wizard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// View state for one terminal session.
pub struct Tui {
    options: UiOptions,
    input: InputLine,
    reveal: RevealTracker,
    focus: ChatFocus,
    spinner_clock: Duration,
}

impl Tui {
    #[must_use]
    pub fn new(options: UiOptions) -> Self {
        Self {
            options,
            input: InputLine::new(),
            reveal: RevealTracker::new(),
            focus: ChatFocus::Input,
            spinner_clock: Duration::ZERO,
        }
    }

    /// Advance time-based view state. Called once per frame.
    pub fn tick(&mut self, dt: Duration, app: &App) {
        self.spinner_clock += dt;
        let transcript = app.chat().transcript();
        self.reveal.sync(transcript, self.options.reduced_motion);
        self.reveal.advance(dt, transcript, self.options.reveal_cps);

        // A wizard focus can outlive its route (e.g. after navigating away
        // and clearing the listing); fall back to the prompt quietly.
        if self.focus == ChatFocus::Wizard && transcript.last_wizard_index().is_none() {
            self.focus = ChatFocus::Input;
        }
    }

    pub fn draw(&self, frame: &mut Frame, app: &App) {
        let palette = theme::palette(self.options);
        let glyphs = theme::glyphs(self.options);
        let spinner = glyphs.spinner_frame(
            (self.spinner_clock.as_millis() / SPINNER_INTERVAL.as_millis()) as usize,
        );

        let bg = Block::default().style(Style::default().bg(palette.bg_dark));
        frame.render_widget(bg, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());
        let body = chunks[0];
        let status = chunks[1];

        match app.route() {
            Route::Chat => self.draw_chat(frame, app, body, &palette, &glyphs, spinner),
            Route::Services => {
                draw_services(frame, app.router().services_page(), body, &palette, &glyphs, spinner);
            }
            Route::ServiceDetail => {
                draw_service_detail(
                    frame,
                    app.router().detail_page(),
                    body,
                    &palette,
                    &glyphs,
                    spinner,
                );
            }
        }

        self.draw_status_bar(frame, app, status, &palette, &glyphs);
    }

    fn draw_chat(
        &self,
        frame: &mut Frame,
        app: &App,
        area: Rect,
        palette: &Palette,
        glyphs: &Glyphs,
        spinner: &'static str,
    ) {
        let transcript = app.chat().transcript();
        let focused_wizard = match self.focus {
            ChatFocus::Wizard => transcript.last_wizard_index(),
            ChatFocus::Input => None,
        };

        let constraints = if focused_wizard.is_some() {
            vec![
                Constraint::Min(4),
                Constraint::Length(WIZARD_PANEL_HEIGHT),
                Constraint::Length(INPUT_HEIGHT),
            ]
        } else {
            vec![Constraint::Min(4), Constraint::Length(INPUT_HEIGHT)]
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let view = TranscriptView {
            transcript,
            reveal: &self.reveal,
            awaiting_reply: app.chat().is_awaiting_reply(),
            spinner,
            focused_wizard,
        };
        draw_transcript(frame, &view, rows[0], palette, glyphs);

        if let Some(index) = focused_wizard
            && let Some(wizard) = transcript.turns().get(index).and_then(Turn::wizard)
        {
            draw_wizard_panel(frame, wizard, rows[1], palette, glyphs, true);
        }

        let input_area = *rows.last().expect("layout always has an input row");
        self.draw_input(frame, app, input_area, palette);
    }

    fn draw_input(&self, frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
        let focused = self.focus == ChatFocus::Input;
        let border_style = if focused {
            Style::default().fg(palette.primary)
        } else {
            Style::default().fg(palette.bg_border)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);

        let text: Line<'static> = if self.input.is_empty() {
            Line::from(Span::styled(
                "Type 'PAN', 'Aadhaar'...",
                Style::default().fg(palette.text_muted),
            ))
        } else {
            Line::from(Span::styled(
                self.input.text().to_string(),
                Style::default().fg(palette.text_primary),
            ))
        };

        frame.render_widget(Paragraph::new(text).block(block), area);

        if focused && app.route() == Route::Chat {
            frame.set_cursor_position(Position::new(
                inner.x + self.input.cursor_display_width(),
                inner.y,
            ));
        }
    }

    fn draw_status_bar(
        &self,
        frame: &mut Frame,
        app: &App,
        area: Rect,
        palette: &Palette,
        glyphs: &Glyphs,
    ) {
        let hints = match (app.route(), self.focus) {
            (Route::Chat, ChatFocus::Input) => {
                "Enter send · Tab guide · Ctrl+S services · Ctrl+C quit"
            }
            (Route::Chat, ChatFocus::Wizard) => {
                "←/→ steps · 1-9 documents · Esc prompt · Ctrl+C quit"
            }
            (Route::Services, _) => "↑/↓ select · Enter open · r reload · Esc chat · Ctrl+C quit",
            (Route::ServiceDetail, _) => "←/→ steps · 1-9 documents · Esc services · Ctrl+C quit",
        };

        let (auth_glyph, auth_label, auth_color) = if app.is_authenticated() {
            (glyphs.auth_on, "signed in", palette.success)
        } else {
            (glyphs.auth_off, "guest", palette.text_muted)
        };
        let auth = format!("{auth_glyph} {auth_label}");
        let pad = usize::from(area.width)
            .saturating_sub(hints.chars().count() + auth.chars().count() + 1);

        let line = Line::from(vec![
            Span::styled(hints, Style::default().fg(palette.text_muted)),
            Span::raw(" ".repeat(pad)),
            Span::styled(auth, Style::default().fg(auth_color)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Map one key event onto the session. Returns [`KeyOutcome::Quit`] when
    /// the user asked to leave; the caller tears the session down.
    pub fn handle_key(&mut self, app: &mut App, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match app.route() {
            Route::Chat => self.handle_chat_key(app, key),
            Route::Services => Self::handle_services_key(app, key),
            Route::ServiceDetail => Self::handle_detail_key(app, key),
        }
        KeyOutcome::Continue
    }

    fn handle_chat_key(&mut self, app: &mut App, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.focus = ChatFocus::Input;
            app.open_services();
            return;
        }

        match self.focus {
            ChatFocus::Input => match key.code {
                KeyCode::Enter => {
                    match app.submit_query(self.input.text()) {
                        SubmitOutcome::Submitted | SubmitOutcome::IgnoredBlank => {
                            let _ = self.input.take_text();
                        }
                        // Keep the draft; the user can resend once the
                        // pending reply settles.
                        SubmitOutcome::RejectedBusy => {}
                    }
                }
                KeyCode::Tab => {
                    if app.chat().transcript().last_wizard_index().is_some() {
                        self.focus = ChatFocus::Wizard;
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.insert_char(c);
                }
                KeyCode::Backspace => self.input.backspace(),
                KeyCode::Left => self.input.move_left(),
                KeyCode::Right => self.input.move_right(),
                KeyCode::Home => self.input.move_home(),
                KeyCode::End => self.input.move_end(),
                _ => {}
            },
            ChatFocus::Wizard => {
                if let Some(command) = wizard_command_for(key.code) {
                    let chat = app.chat_mut();
                    if let Some(index) = chat.transcript().last_wizard_index()
                        && let Some(wizard) = chat.transcript_mut().wizard_mut(index)
                    {
                        command.apply(wizard);
                    }
                } else if matches!(key.code, KeyCode::Esc | KeyCode::Tab) {
                    self.focus = ChatFocus::Input;
                }
            }
        }
    }

    fn handle_services_key(app: &mut App, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => app.router_mut().back(),
            KeyCode::Up => app.router_mut().services_select_prev(),
            KeyCode::Down => app.router_mut().services_select_next(),
            KeyCode::Char('r') => app.router_mut().open_services(),
            KeyCode::Enter => {
                if let Some(id) = app.router().selected_service_id().map(ToString::to_string) {
                    app.router_mut().open_service(&id);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(app: &mut App, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            app.router_mut().back();
            return;
        }
        if let Some(command) = wizard_command_for(key.code)
            && let Some(wizard) = app.router_mut().detail_wizard_mut()
        {
            command.apply(wizard);
        }
    }
}

fn wizard_command_for(code: KeyCode) -> Option<WizardCommand> {
    match code {
        KeyCode::Left => Some(WizardCommand::Prev),
        KeyCode::Right => Some(WizardCommand::Next),
        KeyCode::Char(c @ '1'..='9') => {
            Some(WizardCommand::ToggleChecklist(c as usize - '1' as usize))
        }
        _ => None,
    }
}
