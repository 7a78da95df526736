use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fltk::{
    dialog,
    group::{Group, Tabs},
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

use super::document::{CharStyle, RichDocument, StyleTable};
use super::file_filters;
use super::messages::FormatCommand;
use super::settings::{AppSettings, ThemeMode};
use super::undo::{Edit, UndoManager};
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::main_window::MainWidgets;
use crate::ui::theme::apply_theme;

/// Which of the two editing surfaces is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Rich,
    Source,
}

/// Current-file and dirty-flag bookkeeping, kept free of widgets so the
/// window-title logic is testable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileState {
    pub path: Option<PathBuf>,
    pub dirty: bool,
}

impl FileState {
    /// State right after a successful open or save-as.
    pub fn on_disk(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            dirty: false,
        }
    }

    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Window title: the file name (or "Untitled"), starred while dirty.
    pub fn window_title(&self) -> String {
        let name = match &self.path {
            Some(path) => display_name(path),
            None => "Untitled".to_string(),
        };
        let prefix = if self.dirty { "*" } else { "" };
        format!("{}{} - HtmlPad", prefix, name)
    }
}

/// Owns the document, the current file, the undo history and all the
/// widgets. Every command from the dispatch loop lands here; the widgets
/// only ever receive pushed refreshes, never a handle to the model.
pub struct AppState {
    pub window: Window,
    pub menu: MenuBar,
    tabs: Tabs,
    rich_page: Group,
    source_page: Group,
    rich_editor: TextEditor,
    source_editor: TextEditor,
    rich_style_buffer: TextBuffer,

    document: RichDocument,
    file: FileState,
    undo: UndoManager,
    active_tab: ActiveTab,
    /// Set while state pushes text into a buffer programmatically, so the
    /// modify callbacks stay quiet (the equivalent of detaching the undo
    /// listener around a document reset).
    sync_guard: Rc<Cell<bool>>,

    pub settings: AppSettings,
    dark_mode: bool,
}

impl AppState {
    pub fn new(widgets: MainWidgets, settings: AppSettings, sync_guard: Rc<Cell<bool>>) -> Self {
        let dark_mode = settings.theme_mode == ThemeMode::Dark;
        Self {
            window: widgets.wind,
            menu: widgets.menu,
            tabs: widgets.tabs,
            rich_page: widgets.rich_page,
            source_page: widgets.source_page,
            rich_editor: widgets.rich_editor,
            source_editor: widgets.source_editor,
            rich_style_buffer: widgets.rich_style_buffer,
            document: RichDocument::new(),
            file: FileState::default(),
            undo: UndoManager::new(),
            active_tab: ActiveTab::Rich,
            sync_guard,
            settings,
            dark_mode,
        }
    }

    fn rich_buffer(&self) -> TextBuffer {
        self.rich_editor.buffer().expect("rich editor has a buffer")
    }

    fn source_buffer(&self) -> TextBuffer {
        self.source_editor
            .buffer()
            .expect("source editor has a buffer")
    }

    // --- View refresh ---

    /// Rebuild the rich pane's style data from the document and push it to
    /// the editor.
    fn refresh_rich_view(&mut self) {
        let mut table = StyleTable::new();
        let style_bytes = self.document.style_bytes(&mut table);
        self.rich_style_buffer.set_text(&style_bytes);
        let entries = table.entries(self.settings.font_size as i32, self.dark_mode);
        self.rich_editor
            .set_highlight_data(self.rich_style_buffer.clone(), entries);
        self.rich_editor.redraw();
        self.update_window_title();
    }

    pub fn update_window_title(&mut self) {
        self.window.set_label(&self.file.window_title());
    }

    fn update_edit_menu(&self) {
        self.set_menu_item_enabled("Edit/Undo", self.undo.can_undo());
        self.set_menu_item_enabled("Edit/Redo", self.undo.can_redo());
    }

    fn set_menu_item_enabled(&self, path: &str, enabled: bool) {
        let idx = self.menu.find_index(path);
        if idx >= 0 {
            if let Some(mut item) = self.menu.at(idx) {
                if enabled {
                    item.activate();
                } else {
                    item.deactivate();
                }
            }
        }
    }

    fn update_menu_checkbox(&self, path: &str, checked: bool) {
        let idx = self.menu.find_index(path);
        if idx >= 0 {
            if let Some(mut item) = self.menu.at(idx) {
                if checked {
                    item.set();
                } else {
                    item.clear();
                }
            }
        }
    }

    // --- Document lifecycle ---

    /// Replace the document wholesale: new instance in, buffers rewritten
    /// under the sync guard, undo history gone.
    pub fn reset_document(&mut self, doc: RichDocument) {
        self.document = doc;
        self.sync_guard.set(true);
        let mut buf = self.rich_buffer();
        buf.set_text(self.document.text());
        self.sync_guard.set(false);
        self.rich_editor.set_insert_position(0);
        self.undo.clear();
        self.refresh_rich_view();
        self.update_edit_menu();
    }

    pub fn create_new_document(&mut self) {
        self.show_rich_tab();
        self.reset_document(RichDocument::new());
        self.sync_guard.set(true);
        let mut sbuf = self.source_buffer();
        sbuf.set_text("");
        self.sync_guard.set(false);
        self.file = FileState::default();
        self.update_window_title();
    }

    pub fn open_document(&mut self) {
        self.select_rich_tab();
        let Some(path) = native_open_dialog(&file_filters::html_filter()) else {
            return;
        };
        self.open_file(PathBuf::from(path));
    }

    pub fn open_file(&mut self, path: PathBuf) {
        match fs::read_to_string(&path) {
            Ok(content) => {
                self.reset_document(RichDocument::from_html(&content));
                self.file = FileState::on_disk(path);
                self.update_window_title();
            }
            Err(e) => {
                eprintln!("Failed to open {}: {}", path.display(), e);
                dialog::alert_default(&format!("Error opening file: {}", e));
            }
        }
    }

    pub fn save_document(&mut self) {
        let Some(path) = self.file.path.clone() else {
            self.save_document_as();
            return;
        };
        // Pull any pending source-pane edits into the document first.
        self.select_rich_tab();
        match fs::write(&path, self.document.to_file_html()) {
            Ok(()) => {
                self.file.mark_saved();
                self.update_window_title();
            }
            Err(e) => {
                eprintln!("Failed to save {}: {}", path.display(), e);
                dialog::alert_default(&format!("Error saving file: {}", e));
            }
        }
    }

    pub fn save_document_as(&mut self) {
        self.select_rich_tab();
        let Some(chosen) = native_save_dialog(&file_filters::html_filter()) else {
            return;
        };
        let path = file_filters::ensure_html_extension(PathBuf::from(chosen));
        match fs::write(&path, self.document.to_file_html()) {
            Ok(()) => {
                self.file = FileState::on_disk(path);
                self.update_window_title();
            }
            Err(e) => {
                eprintln!("Failed to save {}: {}", path.display(), e);
                dialog::alert_default(&format!("Error saving file: {}", e));
            }
        }
    }

    /// Handle a quit request. Returns `true` if the app should exit.
    pub fn confirm_quit(&mut self) -> bool {
        if !self.file.dirty {
            return true;
        }
        let choice = dialog::choice2_default(
            "You have unsaved changes.",
            "Save",
            "Quit Without Saving",
            "Cancel",
        );
        match choice {
            Some(0) => {
                self.save_document();
                !self.file.dirty
            }
            Some(1) => true,
            _ => false,
        }
    }

    // --- Plain-text conversion (the tab sync path) ---

    /// The document through the file serializer, minus the `<html><body>`
    /// shell: bare text for a plain paragraph, markup only where
    /// formatting requires it.
    pub fn get_plain_text(&self) -> String {
        self.document.to_html()
    }

    /// Reset to a fresh document parsed from `text` (the reverse of
    /// [`get_plain_text`](Self::get_plain_text)).
    pub fn set_plain_text(&mut self, text: &str) {
        self.reset_document(RichDocument::from_html(text));
    }

    // --- Tabs ---

    fn current_tab_selection(&self) -> ActiveTab {
        match self.tabs.value() {
            Some(group) if group.as_widget_ptr() == self.source_page.as_widget_ptr() => {
                ActiveTab::Source
            }
            _ => ActiveTab::Rich,
        }
    }

    fn show_rich_tab(&mut self) {
        let _ = self.tabs.set_value(&self.rich_page);
        self.active_tab = ActiveTab::Rich;
        self.tabs.redraw();
    }

    /// Switch to the rich tab the way the tab-change sync would: pending
    /// source-pane edits are pulled into the document, then the history is
    /// cleared.
    fn select_rich_tab(&mut self) {
        if self.active_tab == ActiveTab::Source {
            let text = self.source_buffer().text();
            self.set_plain_text(&text);
        }
        self.show_rich_tab();
        self.undo.clear();
        self.update_edit_menu();
    }

    /// The one-way content sync, keyed on the destination tab. Always
    /// resets the undo history afterwards.
    pub fn selected_tab_changed(&mut self) {
        let dest = self.current_tab_selection();
        if dest == self.active_tab {
            return;
        }
        match dest {
            ActiveTab::Rich => {
                let text = self.source_buffer().text();
                self.set_plain_text(&text);
            }
            ActiveTab::Source => {
                let html = self.get_plain_text();
                self.sync_guard.set(true);
                let mut sbuf = self.source_buffer();
                sbuf.set_text(&html);
                self.sync_guard.set(false);
            }
        }
        self.active_tab = dest;
        self.undo.clear();
        self.update_edit_menu();
    }

    // --- Edits from the rich pane ---

    /// Mirror a user edit reported by the rich buffer's modify callback
    /// into the document and the undo history.
    pub fn rich_edited(&mut self, pos: usize, inserted: String, deleted: String) {
        self.document.delete(pos, deleted.len());
        self.document.insert(pos, &inserted);
        self.file.touch();
        self.undo.record(Edit::Text {
            pos,
            inserted,
            deleted,
        });
        self.refresh_rich_view();
        self.update_edit_menu();
    }

    pub fn source_edited(&mut self) {
        self.file.touch();
        self.update_window_title();
    }

    // --- Undo / redo ---

    pub fn undo(&mut self) {
        match self.undo.pop_undo() {
            Some(edit) => {
                self.revert(&edit);
                self.undo.push_undone(edit);
            }
            None => eprintln!("Nothing to undo"),
        }
        self.update_edit_menu();
    }

    pub fn redo(&mut self) {
        match self.undo.pop_redo() {
            Some(edit) => {
                self.reapply(&edit);
                self.undo.push_redone(edit);
            }
            None => eprintln!("Nothing to redo"),
        }
        self.update_edit_menu();
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    fn revert(&mut self, edit: &Edit) {
        match edit {
            Edit::Text {
                pos,
                inserted,
                deleted,
            } => self.splice(*pos, inserted.len(), deleted),
            Edit::Restyle { before, .. } => {
                self.document.restore_styles(before.clone());
                self.refresh_rich_view();
            }
        }
    }

    fn reapply(&mut self, edit: &Edit) {
        match edit {
            Edit::Text {
                pos,
                inserted,
                deleted,
            } => self.splice(*pos, deleted.len(), inserted),
            Edit::Restyle { after, .. } => {
                self.document.restore_styles(after.clone());
                self.refresh_rich_view();
            }
        }
    }

    /// Replace `remove_len` bytes at `pos` with `insert`, in the buffer
    /// (silently) and the document alike.
    fn splice(&mut self, pos: usize, remove_len: usize, insert: &str) {
        self.sync_guard.set(true);
        let mut buf = self.rich_buffer();
        if remove_len > 0 {
            buf.remove(pos as i32, (pos + remove_len) as i32);
        }
        if !insert.is_empty() {
            buf.insert(pos as i32, insert);
        }
        self.sync_guard.set(false);
        self.document.delete(pos, remove_len);
        self.document.insert(pos, insert);
        self.file.touch();
        self.rich_editor
            .set_insert_position((pos + insert.len()) as i32);
        self.refresh_rich_view();
    }

    // --- Formatting commands ---

    pub fn apply_format(&mut self, cmd: FormatCommand) {
        if self.active_tab != ActiveTab::Rich {
            return;
        }
        match self.rich_buffer().selection_position() {
            Some((start, end)) if start < end => {
                self.restyle(start.max(0) as usize, end as usize, cmd);
            }
            _ => {
                // Alignment is a paragraph property; the caret's paragraph
                // is enough. Character styles need a selection.
                if matches!(cmd, FormatCommand::Align(_)) {
                    let caret = self.rich_editor.insert_position().max(0) as usize;
                    self.restyle(caret, caret, cmd);
                }
            }
        }
    }

    fn restyle(&mut self, start: usize, end: usize, cmd: FormatCommand) {
        let before = self.document.styles();
        let first_style = self
            .document
            .runs(start, end)
            .first()
            .map(|(_, s)| *s)
            .unwrap_or_default();
        match cmd {
            FormatCommand::Bold => {
                let on = !first_style.bold;
                self.document.apply_char_style(start, end, move |s| s.bold = on);
            }
            FormatCommand::Italic => {
                let on = !first_style.italic;
                self.document
                    .apply_char_style(start, end, move |s| s.italic = on);
            }
            FormatCommand::PlainText => {
                self.document
                    .apply_char_style(start, end, |s| *s = CharStyle::default());
            }
            FormatCommand::Color(color) => {
                self.document
                    .apply_char_style(start, end, move |s| s.color = color);
            }
            FormatCommand::Family(family) => {
                self.document
                    .apply_char_style(start, end, move |s| s.family = family);
            }
            FormatCommand::Size(size) => {
                self.document
                    .apply_char_style(start, end, move |s| s.size = size);
            }
            FormatCommand::Align(align) => {
                self.document.set_alignment(start, end, align);
            }
        }
        let after = self.document.styles();
        if before != after {
            self.file.touch();
            self.undo.record(Edit::Restyle { before, after });
        }
        self.refresh_rich_view();
        self.update_edit_menu();
    }

    // --- Clipboard / selection ---

    fn active_editor(&self) -> TextEditor {
        match self.active_tab {
            ActiveTab::Rich => self.rich_editor.clone(),
            ActiveTab::Source => self.source_editor.clone(),
        }
    }

    pub fn edit_cut(&mut self) {
        let mut editor = self.active_editor();
        editor.cut();
    }

    pub fn edit_copy(&mut self) {
        let mut editor = self.active_editor();
        editor.copy();
    }

    pub fn edit_paste(&mut self) {
        let mut editor = self.active_editor();
        editor.paste();
    }

    pub fn select_all(&mut self) {
        let editor = self.active_editor();
        if let Some(mut buf) = editor.buffer() {
            let len = buf.length();
            buf.select(0, len);
        }
    }

    // --- View toggles & settings ---

    pub fn apply_initial_settings(&mut self) {
        self.set_word_wrap(self.settings.word_wrap_enabled);
        self.update_menu_checkbox("View/Toggle Word Wrap", self.settings.word_wrap_enabled);
        self.apply_theme_now();
        self.update_menu_checkbox("View/Toggle Dark Mode", self.dark_mode);
        self.update_edit_menu();
    }

    fn set_word_wrap(&mut self, on: bool) {
        let mode = if on { WrapMode::AtBounds } else { WrapMode::None };
        self.rich_editor.wrap_mode(mode, 0);
        self.source_editor.wrap_mode(mode, 0);
        self.rich_editor.redraw();
        self.source_editor.redraw();
    }

    pub fn toggle_word_wrap(&mut self) {
        self.settings.word_wrap_enabled = !self.settings.word_wrap_enabled;
        self.set_word_wrap(self.settings.word_wrap_enabled);
        if let Err(e) = self.settings.save() {
            eprintln!("Failed to save settings: {}", e);
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.settings.theme_mode = if self.dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        if let Err(e) = self.settings.save() {
            eprintln!("Failed to save settings: {}", e);
        }
        self.apply_theme_now();
        self.refresh_rich_view();
    }

    fn apply_theme_now(&mut self) {
        apply_theme(
            &mut self.rich_editor,
            &mut self.source_editor,
            &mut self.window,
            &mut self.menu,
            self.dark_mode,
        );
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_has_no_file() {
        let file = FileState::default();
        assert!(file.path.is_none());
        assert!(!file.dirty);
        assert_eq!(file.window_title(), "Untitled - HtmlPad");
    }

    #[test]
    fn test_title_shows_file_name_after_open() {
        let file = FileState::on_disk(PathBuf::from("/tmp/notes.html"));
        assert_eq!(file.path.as_deref(), Some(Path::new("/tmp/notes.html")));
        assert_eq!(file.window_title(), "notes.html - HtmlPad");
    }

    #[test]
    fn test_dirty_marker_set_and_cleared() {
        let mut file = FileState::on_disk(PathBuf::from("a.html"));
        file.touch();
        assert_eq!(file.window_title(), "*a.html - HtmlPad");
        file.mark_saved();
        assert_eq!(file.window_title(), "a.html - HtmlPad");
    }

    #[test]
    fn test_editing_after_new_keeps_untitled() {
        let mut file = FileState::default();
        file.touch();
        assert_eq!(file.window_title(), "*Untitled - HtmlPad");
    }
}
