//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - Conductor for everything the orb does
//! - A reply backend called off the frame loop
//!
//! Replies come back over an mpsc channel and are handed to
//! [`Conductor::handle_inbound`]; the Conductor is ticked once per frame and
//! its raster drawn with half-block cells above the conversation.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

use zenorb_core::{BackendError, Conductor, EngineConfig, InboundTurn, ReplyBackend};

use crate::theme::{DIM_GRAY, ERROR_RED, PROMPT};
use crate::widgets::{
    conversation_lines, raster_size, ConversationState, ConversationView, OrbView,
};

/// Display refresh interval (~60 fps)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const PROMPT_SYMBOL: &str = "› ";

type Reply = Result<InboundTurn, BackendError>;

/// Screen regions, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AppLayout {
    orb: Rect,
    conversation: Rect,
    input: Rect,
    status: Rect,
}

impl AppLayout {
    fn new(area: Rect) -> Self {
        let [orb, conversation, input, status] = Layout::vertical([
            Constraint::Percentage(55),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            orb,
            conversation,
            input,
            status,
        }
    }
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Engine ===
    /// Owns the orb and the conversation
    conductor: Conductor,
    /// Where agent replies come from
    backend: Arc<dyn ReplyBackend>,
    /// Handed to each reply task
    reply_tx: mpsc::UnboundedSender<Reply>,
    /// Replies waiting to be handed to the Conductor
    reply_rx: mpsc::UnboundedReceiver<Reply>,
    /// A reply task is in flight
    awaiting_reply: bool,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Conversation scroll position
    conversation: ConversationState,
    /// Last backend error, shown in the status line
    status: Option<String>,
    /// Current screen regions
    layout: AppLayout,
}

impl App {
    /// Create a new App instance
    pub fn new(config: EngineConfig, backend: Arc<dyn ReplyBackend>) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            conductor: Conductor::new(config),
            backend,
            reply_tx,
            reply_rx,
            awaiting_reply: false,
            input_buffer: String::new(),
            conversation: ConversationState::default(),
            status: None,
            layout: AppLayout::new(Rect::default()),
        }
    }

    /// Lay out `area` and start the engine with a matching raster
    pub fn start(&mut self, area: Rect) {
        self.layout = AppLayout::new(area);
        let (width, height) = raster_size(self.layout.orb);
        self.conductor.start(width, height);
    }

    /// Run until the user quits
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let size = terminal.size()?;
        self.start(Rect::new(0, 0, size.width, size.height));

        let mut event_stream = EventStream::new();

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(&event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.quit(),
                },

                Some(reply) = self.reply_rx.recv() => self.handle_reply(reply),

                // Frame tick
                _ = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            if !self.running {
                break;
            }
            self.conductor.tick();
            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    /// Whether the app is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The engine behind the screen
    pub fn conductor(&self) -> &Conductor {
        &self.conductor
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Resize(w, h) => self.handle_resize(*w, *h),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if ctrl => self.quit(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) if !ctrl => self.input_buffer.push(c),
            KeyCode::PageUp => self.conversation.scroll(self.page()),
            KeyCode::PageDown => self.conversation.scroll(-self.page()),
            KeyCode::End => self.conversation.scroll_to_bottom(),
            _ => {}
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        self.layout = AppLayout::new(Rect::new(0, 0, width, height));
        let (w, h) = raster_size(self.layout.orb);
        self.conductor.resize(w, h);
    }

    fn page(&self) -> isize {
        isize::try_from(self.layout.conversation.height / 2)
            .unwrap_or(isize::MAX)
            .max(1)
    }

    /// A reply is in flight or the last one is still animating
    fn is_busy(&self) -> bool {
        self.awaiting_reply || self.conductor.pending_jobs() > 0
    }

    /// Send the input line to the backend
    ///
    /// Ignored when the input is blank, while a reply is pending, and until
    /// the last reply has finished typing and started its colour change.
    fn submit(&mut self) {
        if self.is_busy() || self.input_buffer.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input_buffer).trim().to_string();
        if self.conductor.push_user_turn(&text).is_none() {
            return;
        }
        self.awaiting_reply = true;
        self.status = None;
        self.conversation.scroll_to_bottom();

        let backend = Arc::clone(&self.backend);
        let tx = self.reply_tx.clone();
        tokio::spawn(async move {
            let reply = backend.reply(&text).await;
            if tx.send(reply).is_err() {
                tracing::debug!("App closed before the reply arrived");
            }
        });
    }

    fn handle_reply(&mut self, reply: Reply) {
        self.awaiting_reply = false;
        match reply {
            Ok(turn) => {
                self.conductor.handle_inbound(turn);
                self.conversation.scroll_to_bottom();
            }
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "Reply failed");
                self.status = Some(format!("{} unavailable: {e}", self.backend.name()));
            }
        }
    }

    fn quit(&mut self) {
        self.conductor.dispose();
        self.running = false;
    }

    fn render(&mut self, frame: &mut Frame) {
        let layout = AppLayout::new(frame.area());

        frame.render_widget(OrbView::new(self.conductor.frame()), layout.orb);

        let lines = conversation_lines(
            self.conductor.store().views(),
            usize::from(layout.conversation.width),
        );
        frame.render_stateful_widget(
            ConversationView::new(lines),
            layout.conversation,
            &mut self.conversation,
        );

        let input = Line::from(vec![
            Span::styled(PROMPT_SYMBOL, Style::default().fg(PROMPT)),
            Span::raw(self.input_buffer.as_str()),
        ]);
        frame.render_widget(input, layout.input);
        let cursor_x = PROMPT_SYMBOL.width() + self.input_buffer.width();
        let cursor_x = u16::try_from(cursor_x).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            layout.input.x + cursor_x.min(layout.input.width.saturating_sub(1)),
            layout.input.y,
        ));

        frame.render_widget(self.status_line(), layout.status);
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(error) = &self.status {
            return Line::styled(error.clone(), Style::default().fg(ERROR_RED));
        }
        let hint = if self.is_busy() {
            "thinking…"
        } else {
            "Enter send · Esc quit · PgUp/PgDn scroll"
        };
        Line::styled(hint, Style::default().fg(DIM_GRAY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use zenorb_core::LoopState;

    struct EchoBackend;

    #[async_trait]
    impl ReplyBackend for EchoBackend {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn health_check(&self) -> bool {
            true
        }

        async fn reply(&self, message: &str) -> Result<InboundTurn, BackendError> {
            Ok(InboundTurn::text(format!("You said {message}")).with_color("#1e5aa8"))
        }
    }

    struct DownBackend;

    #[async_trait]
    impl ReplyBackend for DownBackend {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn health_check(&self) -> bool {
            false
        }

        async fn reply(&self, _message: &str) -> Result<InboundTurn, BackendError> {
            Err(BackendError::Decode("no content".into()))
        }
    }

    fn started(backend: Arc<dyn ReplyBackend>) -> App {
        let mut app = App::new(EngineConfig::default(), backend);
        app.start(Rect::new(0, 0, 40, 20));
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_start_sizes_raster_to_orb_area() {
        let app = started(Arc::new(EchoBackend));
        let (w, h) = raster_size(app.layout.orb);
        assert_eq!(app.conductor().frame().size(), (w, h));
        assert_eq!(w, 40);
    }

    #[test]
    fn test_typing_and_backspace_edit_input() {
        let mut app = started(Arc::new(EchoBackend));
        type_text(&mut app, "hey");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input_buffer, "he");
    }

    #[test]
    fn test_blank_input_is_not_sent() {
        let mut app = started(Arc::new(EchoBackend));
        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.conductor().turns().is_empty());
        assert!(!app.awaiting_reply);
    }

    #[tokio::test]
    async fn test_reply_is_handed_to_conductor() {
        let mut app = started(Arc::new(EchoBackend));
        type_text(&mut app, "hi");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.awaiting_reply);
        assert_eq!(app.input_buffer, "");
        assert_eq!(app.conductor().turns().len(), 1);

        let reply = app.reply_rx.recv().await.expect("reply should arrive");
        app.handle_reply(reply);

        assert!(!app.awaiting_reply);
        let turns = app.conductor().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].source_text(), "You said hi");
        assert!(turns[1].is_revealing());
    }

    #[tokio::test]
    async fn test_sent_text_is_trimmed() {
        let mut app = started(Arc::new(EchoBackend));
        type_text(&mut app, "  hi  ");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.conductor().turns()[0].source_text(), "hi");
    }

    #[tokio::test]
    async fn test_input_stays_locked_until_reply_settles() {
        let mut app = started(Arc::new(EchoBackend));
        type_text(&mut app, "hi");
        app.handle_key(key(KeyCode::Enter));
        let reply = app.reply_rx.recv().await.expect("reply should arrive");
        app.handle_reply(reply);

        // Still typing the reply
        type_text(&mut app, "again");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.conductor().turns().len(), 2);
        assert_eq!(app.input_buffer, "again");

        // Long enough for the reveal and the colour delay
        for t in (0..=20_000).step_by(10) {
            app.conductor.tick_at(Duration::from_millis(t));
        }
        assert_eq!(app.conductor().pending_jobs(), 0);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.conductor().turns().len(), 3);
        assert_eq!(app.conductor().turns()[2].source_text(), "again");
    }

    #[test]
    fn test_page_is_half_the_conversation() {
        let app = started(Arc::new(EchoBackend));
        let expected = isize::try_from(app.layout.conversation.height / 2).unwrap_or(1).max(1);
        assert_eq!(app.page(), expected);
        assert!(app.page() >= 1);
    }

    #[tokio::test]
    async fn test_second_send_waits_for_reply() {
        let mut app = started(Arc::new(EchoBackend));
        type_text(&mut app, "one");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "two");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.conductor().turns().len(), 1);
        assert_eq!(app.input_buffer, "two");
    }

    #[tokio::test]
    async fn test_backend_error_shows_in_status() {
        let mut app = started(Arc::new(DownBackend));
        type_text(&mut app, "hi");
        app.handle_key(key(KeyCode::Enter));

        let reply = app.reply_rx.recv().await.expect("reply should arrive");
        app.handle_reply(reply);

        assert_eq!(app.conductor().turns().len(), 1);
        let status = app.status.clone().unwrap_or_default();
        assert!(status.starts_with("down unavailable"), "{status}");
    }

    #[test]
    fn test_escape_disposes_engine() {
        let mut app = started(Arc::new(EchoBackend));
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.is_running());
        assert_eq!(app.conductor().state(), LoopState::Disposed);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = started(Arc::new(EchoBackend));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
        assert_eq!(app.input_buffer, "");
    }

    #[test]
    fn test_resize_follows_orb_area() {
        let mut app = started(Arc::new(EchoBackend));
        app.handle_event(&Event::Resize(60, 30));
        let expected = raster_size(app.layout.orb);
        assert_eq!(app.conductor().frame().size(), expected);
        assert_eq!(expected.0, 60);
    }
}
