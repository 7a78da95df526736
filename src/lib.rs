//! HtmlPad library crate.
//!
//! The binary in `main.rs` only wires the FLTK event loop to the message
//! dispatch; everything else lives here so the document, undo and HTML
//! layers can be unit tested without a display.

pub mod app;
pub mod ui;
