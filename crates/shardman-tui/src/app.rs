//! Main application state and event loop.
//!
//! A single cooperative loop owns all state: it polls the background job
//! slot, reconciles the status snapshot on a fixed cadence, draws, and
//! handles one input event per iteration. All systemd reads happen through
//! the job runner's runtime; mutating actions go through the single job
//! slot so at most one is ever in flight.

use std::io;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::sync::Arc;

use shardman_chat::{recent_chat_lines, ChatTransport, ConsoleFifoTransport};
use shardman_config::Config;
use shardman_core::{Shard, ShardAction, MASTER_SHARD};
use shardman_supervisor::{ShardController, StatusProvider, Updater};
use tracing::{info, warn};

use crate::event::{AppEvent, InputHandler};
use crate::global_panel::GlobalPanel;
use crate::jobs::{JobPoll, JobRunner};
use crate::log_view::LogView;
use crate::selection::{Focus, Selection};
use crate::shard_panel::ShardPanel;
use crate::side_panel::SidePanel;
use crate::theme::Theme;

pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Status snapshot refresh cadence.
const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Input poll timeout, bounding loop latency.
const EVENT_POLL: Duration = Duration::from_millis(50);
/// Journal lines fetched when the log viewer opens.
const JOURNAL_LINES: u32 = 200;
/// Chat log lines kept for the side pane.
const CHAT_TAIL: usize = 50;
/// Minimum terminal size for the full layout.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

/// The dashboard application.
pub struct App {
    config: Config,
    theme: Theme,
    provider: Arc<StatusProvider>,
    controller: ShardController,
    updater: Updater,
    chat_transport: Option<ConsoleFifoTransport>,
    runner: JobRunner,
    input: InputHandler,
    selection: Selection,
    shards: Vec<Shard>,
    chat_lines: Vec<String>,
    log_view: Option<LogView>,
    compose: Option<String>,
    status_message: Option<String>,
    refreshed_at: Option<DateTime<Local>>,
    last_poll: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> AppResult<Self> {
        let theme = Theme::load(&config.config_dir);
        let provider = Arc::new(StatusProvider::new(config.shards.clone()));
        let runner = JobRunner::new(Arc::clone(&provider))?;
        let updater = Updater::new(config.updater_path.clone());

        let chat_transport = match ConsoleFifoTransport::new() {
            Ok(transport) => Some(transport),
            Err(e) => {
                warn!(error = %e, "chat transport unavailable");
                None
            }
        };

        let shards = runner.block_on(provider.poll());
        let chat_lines = recent_chat_lines(&config.chat_log_path(), CHAT_TAIL);

        Ok(Self {
            config,
            theme,
            provider,
            controller: ShardController::new(),
            updater,
            chat_transport,
            runner,
            input: InputHandler::new(),
            selection: Selection::new(),
            shards,
            chat_lines,
            log_view: None,
            compose: None,
            status_message: None,
            refreshed_at: Some(Local::now()),
            last_poll: Instant::now(),
            should_quit: false,
        })
    }

    /// Run the main application loop.
    pub fn run(&mut self) -> AppResult<()> {
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal);

        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> AppResult<()> {
        while !self.should_quit {
            self.poll_jobs();
            self.maybe_reconcile();

            // The chat pane refreshes every paint, independent of the
            // status cadence; only the viewer freezes it.
            if self.log_view.is_none() {
                self.chat_lines = recent_chat_lines(&self.config.chat_log_path(), CHAT_TAIL);
            }

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(EVENT_POLL)? {
                match event::read()? {
                    Event::Key(key) => {
                        let app_event = self.input.handle_key(key);
                        self.handle_event(app_event);
                    }
                    Event::Resize(_, _) => {
                        self.selection.clamp(self.shards.len());
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Drain the job slot, adopting the completion snapshot.
    fn poll_jobs(&mut self) {
        match self.runner.poll() {
            JobPoll::Completed(outcome) => {
                self.shards = outcome.snapshot;
                self.selection.clamp(self.shards.len());
                self.last_poll = Instant::now();
                self.refreshed_at = Some(Local::now());
                self.status_message = Some(if outcome.success {
                    format!("{}: done", outcome.label)
                } else {
                    format!("{}: failed ({})", outcome.label, outcome.detail)
                });
            }
            JobPoll::Aborted => {
                // The slot is free but no snapshot arrived; resync inline.
                self.shards = self.runner.block_on(self.provider.poll());
                self.selection.clamp(self.shards.len());
                self.last_poll = Instant::now();
                self.status_message = Some("background operation failed unexpectedly".to_string());
            }
            JobPoll::Idle | JobPoll::Pending => {}
        }
    }

    /// Refresh the status snapshot on the fixed cadence.
    ///
    /// Skipped while the log viewer is open (the viewer is a static page)
    /// and while a job is in flight (its completion snapshot supersedes
    /// any cadence poll).
    fn maybe_reconcile(&mut self) {
        if self.log_view.is_some() || self.runner.is_busy() {
            return;
        }
        if self.last_poll.elapsed() < POLL_INTERVAL {
            return;
        }
        self.shards = self.runner.block_on(self.provider.poll());
        self.selection.clamp(self.shards.len());
        self.refreshed_at = Some(Local::now());
        self.last_poll = Instant::now();
    }

    /// Apply one application event to the state.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ForceQuit => self.should_quit = true,
            AppEvent::Back => {
                if self.log_view.take().is_some() {
                    // Selection is untouched; force a prompt refresh.
                    self.last_poll = Instant::now() - POLL_INTERVAL;
                } else {
                    self.should_quit = true;
                }
            }
            AppEvent::NavigateUp => match &mut self.log_view {
                Some(view) => view.scroll_up(),
                None => self.selection.move_up(self.shards.len()),
            },
            AppEvent::NavigateDown => match &mut self.log_view {
                Some(view) => view.scroll_down(),
                None => self.selection.move_down(self.shards.len()),
            },
            AppEvent::NavigateLeft => {
                if self.log_view.take().is_some() {
                    self.last_poll = Instant::now() - POLL_INTERVAL;
                } else {
                    self.selection.cycle_left();
                }
            }
            AppEvent::NavigateRight => {
                if self.log_view.is_none() {
                    self.selection.cycle_right();
                }
            }
            AppEvent::Confirm => {
                if self.log_view.is_none() {
                    self.execute_selection();
                }
            }
            AppEvent::ToggleEnable => {
                if self.log_view.is_none() {
                    self.toggle_enable();
                }
            }
            AppEvent::ComposeChat => {
                if self.log_view.is_some() {
                    // Not available from the viewer.
                    self.input.set_compose_mode(false);
                } else {
                    self.compose = Some(String::new());
                }
            }
            AppEvent::TextInput(c) => {
                if let Some(buffer) = &mut self.compose {
                    buffer.push(c);
                }
            }
            AppEvent::Backspace => {
                if let Some(buffer) = &mut self.compose {
                    buffer.pop();
                }
            }
            AppEvent::Submit => {
                if let Some(text) = self.compose.take() {
                    self.send_chat(&text);
                }
            }
            AppEvent::Cancel => {
                self.compose = None;
            }
            AppEvent::None => {}
        }
    }

    /// Run the focused action.
    fn execute_selection(&mut self) {
        match self.selection.focus() {
            Focus::Shard(row) => {
                let Some(shard) = self.shards.get(row) else {
                    return;
                };
                let name = shard.name.clone();
                match self.selection.row_action().shard_action() {
                    Some(action) => self.submit_shard_action(name, action),
                    None => self.open_log_view(name),
                }
            }
            Focus::Global(_) => {
                let Some(global) = self.selection.global_action() else {
                    return;
                };
                match global.shard_action() {
                    Some(action) => self.submit_fleet_action(action),
                    None => self.run_update(),
                }
            }
        }
    }

    fn submit_shard_action(&mut self, name: String, action: ShardAction) {
        let label = format!("{action} {name}");
        let controller = self.controller;
        let target = name.clone();
        let accepted = self.runner.submit(label.clone(), async move {
            vec![(target.clone(), controller.apply(&target, action).await)]
        });
        self.report_submission(accepted, &label);
    }

    fn submit_fleet_action(&mut self, action: ShardAction) {
        if self.shards.is_empty() {
            self.status_message = Some("no shards configured".to_string());
            return;
        }
        let label = format!("{action} all shards");
        let controller = self.controller;
        let names: Vec<String> = self.shards.iter().map(|s| s.name.clone()).collect();
        let accepted = self
            .runner
            .submit(label.clone(), async move {
                controller.apply_all(action, &names).await
            });
        self.report_submission(accepted, &label);
    }

    /// Run the updater inline, blocking the loop until it finishes.
    ///
    /// Unlike unit actions this does not go through the job slot; the
    /// refreshed snapshot is visible on the very next paint.
    fn run_update(&mut self) {
        if self.runner.is_busy() {
            self.status_message = Some("another operation is still running".to_string());
            return;
        }
        info!("running updater");
        self.status_message = Some("updating game install...".to_string());
        let output = self.runner.block_on(self.updater.run());
        self.shards = self.runner.block_on(self.provider.poll());
        self.selection.clamp(self.shards.len());
        self.last_poll = Instant::now();
        self.refreshed_at = Some(Local::now());
        self.status_message = Some(if output.success {
            "update finished".to_string()
        } else {
            format!("update failed: {}", output.summary())
        });
    }

    fn report_submission(&mut self, accepted: bool, label: &str) {
        self.status_message = Some(if accepted {
            info!(job = %label, "operation started");
            format!("{label}...")
        } else {
            "another operation is still running".to_string()
        });
    }

    /// Toggle enable/disable for the focused shard.
    fn toggle_enable(&mut self) {
        let Focus::Shard(row) = self.selection.focus() else {
            return;
        };
        let Some(shard) = self.shards.get(row) else {
            return;
        };
        let action = if shard.is_enabled {
            ShardAction::Disable
        } else {
            ShardAction::Enable
        };
        self.submit_shard_action(shard.name.clone(), action);
    }

    /// Fetch the journal tail and open the full-screen viewer.
    fn open_log_view(&mut self, name: String) {
        let text = self
            .runner
            .block_on(self.controller.fetch_logs(&name, JOURNAL_LINES));
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        self.log_view = Some(LogView::new(name, lines));
    }

    /// Deliver a chat message through the Master console.
    fn send_chat(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let Some(transport) = &self.chat_transport else {
            self.status_message = Some("chat transport unavailable".to_string());
            return;
        };
        self.status_message = Some(match transport.send(MASTER_SHARD, text) {
            Ok(()) => format!("announced: {text}"),
            Err(e) => format!("chat failed: {e}"),
        });
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let notice = Paragraph::new(format!(
                "Terminal too small (need at least {MIN_WIDTH}x{MIN_HEIGHT})"
            ))
            .style(Style::default().fg(self.theme.warning));
            frame.render_widget(notice, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        if self.log_view.is_some() {
            self.draw_log_view(frame, chunks[1]);
        } else {
            self.draw_dashboard(frame, chunks[1]);
        }
        self.draw_footer(frame, chunks[2]);

        if self.compose.is_some() {
            self.draw_compose(frame, area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let running = self.shards.iter().filter(|s| s.is_running).count();
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.config.cluster_name),
                Style::default()
                    .fg(self.theme.header)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{running}/{} running", self.shards.len()),
                Style::default().fg(self.theme.text_dim),
            ),
        ]);
        frame.render_widget(Paragraph::new(title), area);
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Percentage(38)])
            .split(area);

        // Grid box: 3 rows plus borders.
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(5)])
            .split(columns[0]);

        let in_shard_region = matches!(self.selection.focus(), Focus::Shard(_));
        frame.render_widget(
            ShardPanel::new(&self.shards, &self.selection, &self.theme)
                .focused(in_shard_region),
            left[0],
        );
        frame.render_widget(
            GlobalPanel::new(&self.selection, &self.theme).focused(!in_shard_region),
            left[1],
        );

        let mut side = SidePanel::new(&self.chat_lines, &self.theme);
        if let Some(at) = self.refreshed_at {
            side = side.refreshed_at(at);
        }
        frame.render_widget(side, columns[1]);
    }

    fn draw_log_view(&mut self, frame: &mut Frame, area: Rect) {
        let Some(view) = &mut self.log_view else {
            return;
        };
        let viewport = area.height.saturating_sub(2) as usize;
        view.clamp_to(viewport);

        let lines: Vec<Line<'_>> = view
            .visible(viewport)
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        let block = Block::default()
            .title(format!(" Logs: {} ", view.shard))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border_focus));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if self.runner.is_busy() {
            spans.push(Span::styled(
                " [WAITING...] ",
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(message) = &self.status_message {
            spans.push(Span::styled(
                format!(" {message} "),
                Style::default().fg(self.theme.text),
            ));
        }
        let hints = if self.log_view.is_some() {
            "↑/↓ scroll  q/esc back"
        } else if self.compose.is_some() {
            "enter send  esc cancel"
        } else {
            "arrows move  enter run  e toggle boot  c chat  q quit"
        };
        spans.push(Span::styled(
            format!(" {hints}"),
            Style::default().fg(self.theme.hotkey),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_compose(&self, frame: &mut Frame, area: Rect) {
        let Some(buffer) = &self.compose else {
            return;
        };
        let width = area.width.saturating_sub(8).min(60).max(20);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + area.height / 2 - 2,
            width,
            height: 3,
        };
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Announce to players ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border_focus));
        frame.render_widget(
            Paragraph::new(format!("> {buffer}"))
                .style(Style::default().fg(self.theme.text))
                .block(block),
            popup,
        );
    }
}
