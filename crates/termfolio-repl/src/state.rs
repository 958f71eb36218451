use termfolio_core::chat::ChatRequest;
use termfolio_core::{ChatSession, CoreConfig, LineRenderer, Portfolio, Session, SubmitEvent};

use crate::editor::LineEditor;
use crate::format::{chat_view_raw, finish, print_header_raw};
use crate::render::paint_line;

pub(crate) struct ReplState {
    pub(crate) config: CoreConfig,
    pub(crate) session: Session,
    pub(crate) chat: ChatSession,
    pub(crate) renderer: LineRenderer,
    pub(crate) editor: LineEditor,
    pub(crate) chat_editor: LineEditor,
    pub(crate) color: bool,
}

impl ReplState {
    pub(crate) fn new(config: CoreConfig, content: Portfolio, color: bool) -> Self {
        let vocab = config.vocabulary();
        let renderer = LineRenderer::new(vocab.namespace());
        let session = Session::new(vocab, content, config.title.clone());
        let chat = ChatSession::new(config.owner.clone());
        Self {
            config,
            session,
            chat,
            renderer,
            editor: LineEditor::new(),
            chat_editor: LineEditor::new(),
            color,
        }
    }

    /// Everything above the input area: title bar, then the chat panel when
    /// open, otherwise the transcript.
    pub(crate) fn screen_lines(&self) -> Vec<String> {
        let mut lines = vec![
            finish(print_header_raw(&self.config.header_line()), self.color),
            String::new(),
        ];
        if self.chat.is_open() {
            lines.extend(chat_view_raw(&self.chat).into_iter().map(|l| finish(l, self.color)));
        } else {
            lines.extend(
                self.renderer
                    .render_all(self.session.transcript())
                    .iter()
                    .map(|l| paint_line(l, self.color)),
            );
        }
        lines
    }

    /// The editor keys go to: the chat editor while chat is open.
    pub(crate) fn active_editor(&self) -> &LineEditor {
        if self.chat.is_open() {
            &self.chat_editor
        } else {
            &self.editor
        }
    }

    pub(crate) fn active_editor_mut(&mut self) -> &mut LineEditor {
        if self.chat.is_open() {
            &mut self.chat_editor
        } else {
            &mut self.editor
        }
    }

    pub(crate) fn prompt_glyph(&self) -> &'static str {
        if self.chat.is_open() {
            "›"
        } else {
            "$"
        }
    }

    pub(crate) fn status_text(&self) -> String {
        if self.chat.is_open() {
            let activity = if self.chat.is_busy() { "thinking… · " } else { "" };
            format!(
                "{activity}{} mode · Enter send · Ctrl+T switch mode · Ctrl+R 👍 · Esc close",
                self.chat.mode().name()
            )
        } else {
            format!(
                "{} · Tab complete · ↑↓ history · help for commands",
                self.session.vocab().namespace()
            )
        }
    }

    /// Submit the prompt line to the session. Opening the assistant disables
    /// the prompt until the panel closes.
    pub(crate) fn submit_command(&mut self) -> SubmitEvent {
        let Some(line) = self.editor.submit() else {
            return SubmitEvent::Ignored;
        };
        tracing::debug!(%line, "Command submitted");
        let event = self.session.submit(&line);
        if event == SubmitEvent::ChatOpened {
            self.chat.open();
            self.chat_editor.discard();
            self.editor.input.set_disabled(true);
        }
        event
    }

    /// Send the chat draft. `None` when the draft is blank or a reply is
    /// still pending.
    pub(crate) fn send_chat(&mut self) -> Option<ChatRequest> {
        let text = self.chat_editor.buffer().to_string();
        let request = self.chat.begin(&text, self.session.content())?;
        self.chat_editor.submit();
        Some(request)
    }

    pub(crate) fn close_chat(&mut self) {
        self.chat.close();
        self.session.close_chat();
        self.editor.input.set_disabled(false);
    }
}
