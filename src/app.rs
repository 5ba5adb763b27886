use std::sync::Arc;

use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::controller::ChatController;
use crate::endpoint::{ChatEndpoint, ChatReply};
use crate::error::EndpointError;
use crate::panel::Panel;
use crate::surface::ChatSurface;

/// Terminal-side state of the widget: input box, send control, model
/// selector and the chat panel.
#[derive(Debug)]
pub struct ChatView {
    pub input: String,
    /// Cursor position in the input, in characters
    pub cursor: usize,
    pub selected_model: String,
    pub send_enabled: bool,
    pub input_focused: bool,
    pub panel: Panel,
}

impl ChatView {
    pub fn new(selected_model: String) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            selected_model,
            send_enabled: true,
            input_focused: true,
            panel: Panel::new(),
        }
    }
}

impl ChatSurface for ChatView {
    fn input_text(&self) -> &str {
        &self.input
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn selected_model(&self) -> &str {
        &self.selected_model
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }

    fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
        self.cursor = self.input.chars().count();
    }

    fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }
}

pub type ReplyTask = JoinHandle<Result<ChatReply, EndpointError>>;

pub struct App {
    pub should_quit: bool,
    pub view: ChatView,
    pub controller: ChatController,
    pub reply_task: Option<ReplyTask>,
    pub endpoint_url: String,

    // "Thinking" animation, advanced on tick
    pub animation_frame: u8,

    // Model picker
    pub available_models: Vec<String>,
    pub show_model_picker: bool,
    pub model_picker_state: ListState,
    /// Whether picking a model writes it back to the config file
    pub persist_model_choice: bool,
}

impl App {
    pub fn new(config: &Config, endpoint: Arc<dyn ChatEndpoint>) -> Self {
        let controller = ChatController::new(endpoint)
            .with_system_prompt(config.system_prompt.as_deref());

        Self {
            should_quit: false,
            view: ChatView::new(config.initial_model()),
            controller,
            reply_task: None,
            endpoint_url: config.endpoint_url().to_string(),
            animation_frame: 0,
            available_models: config.models(),
            show_model_picker: false,
            model_picker_state: ListState::default(),
            persist_model_choice: true,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.controller.is_pending()
    }

    /// Submit the input box and run the request on a background task
    pub fn submit(&mut self) {
        if !self.view.send_enabled() {
            return;
        }
        let Some(request) = self.controller.begin_submit(&mut self.view) else {
            return;
        };

        let endpoint = self.controller.endpoint();
        self.animation_frame = 0;
        self.reply_task = Some(tokio::spawn(async move { endpoint.send(&request).await }));
    }

    /// Apply the reply if the background request has finished
    pub async fn poll_reply(&mut self) {
        let finished = self
            .reply_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if finished {
            self.wait_for_reply().await;
        }
    }

    /// Wait for the background request (if any) and apply its outcome
    pub async fn wait_for_reply(&mut self) {
        let Some(task) = self.reply_task.take() else {
            return;
        };
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "chat request task failed");
                Err(EndpointError::transport(err.to_string()))
            }
        };
        self.controller.finish_submit(&mut self.view, outcome);
    }

    /// Abort any in-flight request before exiting
    pub fn shutdown(&mut self) {
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }
        self.controller.cancel(&mut self.view);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Model picker methods
    pub fn open_model_picker(&mut self) {
        if self.available_models.is_empty() {
            return;
        }
        // Select current model if in list, otherwise first
        let current_idx = self
            .available_models
            .iter()
            .position(|m| m == &self.view.selected_model)
            .unwrap_or(0);
        self.model_picker_state.select(Some(current_idx));
        self.show_model_picker = true;
    }

    pub fn model_picker_nav_down(&mut self) {
        let len = self.available_models.len();
        if len > 0 {
            let i = self.model_picker_state.selected().unwrap_or(0);
            self.model_picker_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn model_picker_nav_up(&mut self) {
        let i = self.model_picker_state.selected().unwrap_or(0);
        self.model_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_model(&mut self) {
        if let Some(i) = self.model_picker_state.selected() {
            if let Some(model) = self.available_models.get(i) {
                self.view.selected_model = model.clone();
                self.show_model_picker = false;
                debug!(model = %model, "model selected");
                if self.persist_model_choice {
                    if let Err(err) = Config::save_default_model(model) {
                        warn!(error = %err, "could not save default model");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::HttpEndpoint;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(endpoint_url: &str) -> App {
        let config = Config {
            endpoint_url: Some(endpoint_url.to_string()),
            ..Config::new()
        };
        let mut app = App::new(&config, Arc::new(HttpEndpoint::new(config.endpoint_url())));
        app.persist_model_choice = false;
        app
    }

    #[tokio::test]
    async fn test_submit_runs_request_in_background() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "Hello there"})))
            .mount(&server)
            .await;

        let mut app = test_app(&server.uri());
        app.view.input = "Hi".to_string();
        app.submit();

        assert!(app.is_waiting());
        assert!(!app.view.send_enabled);
        assert!(app.reply_task.is_some());

        app.wait_for_reply().await;

        assert!(!app.is_waiting());
        assert!(app.view.send_enabled);
        assert_eq!(app.controller.transcript().len(), 2);
        assert_eq!(app.view.panel.last().unwrap().text(), "Hello there");
    }

    #[tokio::test]
    async fn test_submit_ignored_while_send_disabled() {
        let server = MockServer::start().await;
        let mut app = test_app(&server.uri());
        app.view.input = "Hi".to_string();
        app.view.send_enabled = false;

        app.submit();

        assert!(app.reply_task.is_none());
        assert!(app.controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_aborts_pending_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"content": "late"}))
                    .set_delay(std::time::Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let mut app = test_app(&server.uri());
        app.view.input = "Hi".to_string();
        app.submit();
        app.shutdown();

        assert!(app.reply_task.is_none());
        assert!(!app.is_waiting());
        assert!(app.view.send_enabled);
        assert!(!app.view.panel.has_placeholder());
    }

    #[tokio::test]
    async fn test_poll_reply_without_task_is_noop() {
        let mut app = test_app("http://localhost:8000");
        app.poll_reply().await;
        assert!(app.view.panel.is_empty());
    }

    #[test]
    fn test_model_picker_selects_model() {
        let mut app = test_app("http://localhost:8000");
        assert_eq!(app.view.selected_model, "openai_gpt-3.5-turbo");

        app.open_model_picker();
        assert!(app.show_model_picker);
        assert_eq!(app.model_picker_state.selected(), Some(0));

        app.model_picker_nav_down();
        app.model_picker_nav_down();
        assert_eq!(app.model_picker_state.selected(), Some(1));

        app.select_model();
        assert!(!app.show_model_picker);
        assert_eq!(app.view.selected_model, "anthropic_claude-3-haiku");
    }

    #[test]
    fn test_focus_input_moves_cursor_to_end() {
        let mut view = ChatView::new("m".to_string());
        view.input = "héllo".to_string();
        view.cursor = 0;
        view.focus_input();
        assert_eq!(view.cursor, 5);
    }
}
