use super::document::{Alignment, FontFamily, FontSize, TextColor};

/// A formatting command from the Style/Align/Color/Font menus, applied to
/// the rich view's current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatCommand {
    Bold,
    Italic,
    PlainText,
    Align(Alignment),
    Color(TextColor),
    Family(FontFamily),
    Size(FontSize),
}

/// All messages that can be sent through the FLTK channel.
/// Each menu callback sends one of these; the dispatch loop in main
/// handles them. Commands are a closed enum — menu labels are display
/// text only and never drive dispatch.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    FileQuit,

    // Edit
    EditUndo,
    EditRedo,
    EditCut,
    EditCopy,
    EditPaste,
    SelectAll,

    // Formatting
    Format(FormatCommand),

    // View
    ToggleWordWrap,
    ToggleDarkMode,

    // Tabs
    TabChanged,

    // Help
    ShowAbout,

    /// The rich pane's buffer changed: `deleted` was removed at `pos` and
    /// `inserted` put in its place. Sent from the buffer modify callback
    /// so the document model and undo history can mirror the edit.
    RichEdited {
        pos: usize,
        inserted: String,
        deleted: String,
    },
    /// The source pane's buffer changed (dirty tracking only; the model
    /// is not touched until the next tab switch).
    SourceEdited,
}
