pub mod app;
pub mod config;
pub mod controller;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod logging;
pub mod message;
pub mod panel;
pub mod surface;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use config::Config;
pub use controller::{ChatController, WidgetState};
pub use endpoint::{ChatEndpoint, ChatReply, ChatRequest, HttpEndpoint};
pub use error::EndpointError;
pub use message::{ChatMessage, ChatRole, Transcript};
pub use panel::{EntryId, EntryKind, Panel};
pub use surface::ChatSurface;
