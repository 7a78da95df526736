//! Application layer: the document model, its HTML codec, undo history,
//! persisted settings and the controller that ties them to the widgets.

pub mod document;
pub mod error;
pub mod file_filters;
pub mod html;
pub mod messages;
pub mod settings;
pub mod state;
pub mod undo;

pub use document::RichDocument;
pub use error::{AppError, Result};
pub use messages::{FormatCommand, Message};
pub use settings::AppSettings;
pub use state::AppState;
