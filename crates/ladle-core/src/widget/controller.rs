//! The widget state machine.
//!
//! `ChatWidget` owns the session, the visible state and at most one active
//! turn. Turns run as spawned tasks and report back over a bounded channel;
//! every update carries its turn id, and anything from a superseded turn is
//! dropped on arrival. The committed transcript never contains a streaming
//! message: the placeholder lives beside it and is only merged into
//! [`ChatWidget::visible_messages`].

use std::sync::Arc;

use ladle_types::chat::{ChatMessage, ChatRequest, ChatSession, MessageRole};
use ladle_types::upload::{UploadError, UploadedFile};
use ladle_types::widget::{WidgetConfig, WidgetState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::renderer::WidgetRenderer;
use super::transport::ChatTransport;
use super::turn::{TurnError, TurnUpdate, run_turn};
use crate::chat::session::{
    commit_message, create_greeting_session, create_message, format_for_upstream, truncate_history,
};
use crate::chat::store::SessionStore;
use crate::upload::FileUpload;

/// Assistant message committed in place of a failed reply.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I encountered an error while accessing the recipe knowledge base. Please try again.";

const UPDATE_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("message is empty")]
    Blank,

    #[error("a reply is still streaming")]
    Busy,

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// What a processed turn update did to the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The placeholder now shows this full reply text.
    Streaming { content: String },
    /// The reply was committed.
    Completed { message: ChatMessage },
    /// The turn failed and the apology was committed instead.
    Failed {
        error: TurnError,
        message: ChatMessage,
    },
    /// The turn was cancelled; nothing was committed.
    Aborted,
}

impl WidgetEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WidgetEvent::Streaming { .. })
    }
}

struct ActiveTurn {
    id: u64,
    cancel: CancellationToken,
}

pub struct ChatWidget<T, S, R> {
    config: WidgetConfig,
    transport: Arc<T>,
    store: S,
    renderer: R,
    session: ChatSession,
    state: WidgetState,
    streaming: Option<ChatMessage>,
    attachment: Option<UploadedFile>,
    active: Option<ActiveTurn>,
    next_turn_id: u64,
    updates_tx: mpsc::Sender<TurnUpdate>,
    updates_rx: mpsc::Receiver<TurnUpdate>,
}

impl<T, S, R> ChatWidget<T, S, R>
where
    T: ChatTransport,
    S: SessionStore,
    R: WidgetRenderer,
{
    /// Restore the persisted session, or start a fresh greeting session and
    /// persist it. A corrupt or unreadable blob counts as no session.
    pub async fn mount(config: WidgetConfig, transport: Arc<T>, store: S, mut renderer: R) -> Self {
        let restored = match store.load().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load session, starting fresh");
                None
            }
        };

        let (session, fresh) = match restored {
            Some(mut session) => {
                session.messages.retain(|m| !m.is_streaming);
                (session, false)
            }
            None => (create_greeting_session(&config.greeting), true),
        };

        tracing::info!(session_id = %session.id, messages = session.messages.len(), fresh, "widget mounted");

        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        renderer.state_changed(WidgetState::Minimized);
        renderer.transcript_changed(&session.messages);

        let widget = Self {
            config,
            transport,
            store,
            renderer,
            session,
            state: WidgetState::Minimized,
            streaming: None,
            attachment: None,
            active: None,
            next_turn_id: 0,
            updates_tx,
            updates_rx,
        };
        if fresh {
            widget.persist().await;
        }
        widget
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.active.is_some()
    }

    pub fn attachment(&self) -> Option<&UploadedFile> {
        self.attachment.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Committed transcript plus the streaming placeholder, if any, last.
    pub fn visible_messages(&self) -> Vec<ChatMessage> {
        self.session
            .messages
            .iter()
            .chain(self.streaming.iter())
            .cloned()
            .collect()
    }

    pub fn toggle(&mut self) -> WidgetState {
        self.state = self.state.toggled();
        self.renderer.state_changed(self.state);
        self.state
    }

    /// User-facing send: rejects blank input and input while a reply is
    /// streaming, then starts a turn.
    pub async fn submit(&mut self, input: &str) -> Result<u64, WidgetError> {
        if input.trim().is_empty() {
            return Err(WidgetError::Blank);
        }
        if self.is_sending() {
            return Err(WidgetError::Busy);
        }
        Ok(self.send(input).await)
    }

    /// Start a turn, superseding any turn still in flight.
    ///
    /// The superseded turn is cancelled silently; nothing it produces is
    /// applied. Returns the new turn id.
    pub async fn send(&mut self, text: &str) -> u64 {
        self.cancel_active();

        commit_message(
            &mut self.session,
            create_message(MessageRole::User, text.trim(), false),
        );
        self.renderer.transcript_changed(&self.session.messages);
        self.persist().await;

        let file_url = self.attachment.take().map(|file| file.url);
        let history = truncate_history(&self.session.messages, self.config.max_messages);
        let request = ChatRequest {
            messages: format_for_upstream(&history),
            file_url,
            max_tokens: Some(self.config.max_tokens),
        };

        self.next_turn_id += 1;
        let turn_id = self.next_turn_id;
        let cancel = CancellationToken::new();

        let placeholder = create_message(MessageRole::Assistant, "", true);
        self.renderer.streaming_changed(Some(&placeholder));
        self.streaming = Some(placeholder);
        self.renderer.sending_changed(true);

        tracing::debug!(turn_id, messages = request.messages.len(), "starting turn");
        tokio::spawn(run_turn(
            Arc::clone(&self.transport),
            request,
            turn_id,
            cancel.clone(),
            self.updates_tx.clone(),
        ));
        self.active = Some(ActiveTurn {
            id: turn_id,
            cancel,
        });
        turn_id
    }

    /// Wait for and apply the next update of the active turn.
    ///
    /// Returns `None` when no turn is active.
    pub async fn next_update(&mut self) -> Option<WidgetEvent> {
        loop {
            let active_id = self.active.as_ref()?.id;
            let update = self.updates_rx.recv().await?;
            if update.turn_id() != active_id {
                tracing::trace!(turn_id = update.turn_id(), active_id, "dropping stale turn update");
                continue;
            }
            return Some(self.apply_update(update).await);
        }
    }

    /// Drive the active turn to its end and return how it ended.
    pub async fn wait_for_turn(&mut self) -> Option<WidgetEvent> {
        loop {
            let event = self.next_update().await?;
            if event.is_terminal() {
                return Some(event);
            }
        }
    }

    /// Replace the session with a fresh greeting session.
    ///
    /// Any turn in flight is cancelled silently, and the pending attachment
    /// is dropped. The old blob is removed before the new session is stored.
    pub async fn clear(&mut self) {
        self.cancel_active();
        self.attachment = None;
        if let Err(e) = self.store.clear().await {
            tracing::warn!(session_id = %self.session.id, error = %e, "failed to remove session");
        }
        self.session = create_greeting_session(&self.config.greeting);
        tracing::info!(session_id = %self.session.id, "session cleared");
        self.renderer.transcript_changed(&self.session.messages);
        self.persist().await;
    }

    /// Validate and upload a file to send with the next turn.
    ///
    /// Validation runs before any network call.
    pub async fn attach_file(&mut self, file: FileUpload) -> Result<UploadedFile, WidgetError> {
        if !self.config.allow_file_upload {
            return Err(UploadError::Disabled.into());
        }
        file.validate()?;
        let uploaded = self.transport.upload(file).await?;
        tracing::info!(name = %uploaded.name, size = uploaded.size, "file attached");
        self.attachment = Some(uploaded.clone());
        Ok(uploaded)
    }

    pub fn detach_file(&mut self) -> Option<UploadedFile> {
        self.attachment.take()
    }

    async fn apply_update(&mut self, update: TurnUpdate) -> WidgetEvent {
        match update {
            TurnUpdate::Partial { content, .. } => {
                if let Some(placeholder) = self.streaming.as_mut() {
                    placeholder.content.clone_from(&content);
                }
                self.renderer.streaming_changed(self.streaming.as_ref());
                WidgetEvent::Streaming { content }
            }
            TurnUpdate::Finished { result, .. } => {
                self.active = None;
                self.streaming = None;
                self.renderer.streaming_changed(None);

                let event = match result {
                    Ok(content) => {
                        let message = create_message(MessageRole::Assistant, content, false);
                        commit_message(&mut self.session, message.clone());
                        WidgetEvent::Completed { message }
                    }
                    Err(TurnError::Aborted) => WidgetEvent::Aborted,
                    Err(error) => {
                        let message = create_message(MessageRole::Assistant, APOLOGY_MESSAGE, false);
                        commit_message(&mut self.session, message.clone());
                        WidgetEvent::Failed { error, message }
                    }
                };

                if !matches!(event, WidgetEvent::Aborted) {
                    self.renderer.transcript_changed(&self.session.messages);
                    self.persist().await;
                }
                self.renderer.sending_changed(false);
                event
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some(turn) = self.active.take() {
            tracing::debug!(turn_id = turn.id, "cancelling superseded turn");
            turn.cancel.cancel();
            self.streaming = None;
            self.renderer.streaming_changed(None);
            self.renderer.sending_changed(false);
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.session).await {
            tracing::warn!(session_id = %self.session.id, error = %e, "failed to persist session");
        }
    }
}

impl<T, S, R> Drop for ChatWidget<T, S, R> {
    fn drop(&mut self) {
        if let Some(turn) = self.active.take() {
            turn.cancel.cancel();
        }
    }
}
