use std::cell::Cell;
use std::rc::Rc;

use fltk::{app, enums::Event, prelude::*};

use html_pad::app::messages::Message;
use html_pad::app::settings::AppSettings;
use html_pad::app::state::AppState;
use html_pad::ui::dialogs::about::show_about_dialog;
use html_pad::ui::main_window::build_main_window;
use html_pad::ui::menu::build_menu;

fn main() {
    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let settings = AppSettings::load();
    let sync_guard = Rc::new(Cell::new(false));

    let mut widgets = build_main_window(&sender, &sync_guard);
    build_menu(&mut widgets.menu, &sender, &settings);

    let mut state = AppState::new(widgets, settings, sync_guard);
    state.apply_initial_settings();
    state.create_new_document();

    // Route the window-manager close button through the quit confirmation.
    state.window.set_callback({
        let s = sender;
        move |_| {
            if app::event() == Event::Close {
                s.send(Message::FileQuit);
            }
        }
    });
    state.window.show();

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                Message::FileNew => state.create_new_document(),
                Message::FileOpen => state.open_document(),
                Message::FileSave => state.save_document(),
                Message::FileSaveAs => state.save_document_as(),
                Message::FileQuit => {
                    if state.confirm_quit() {
                        app.quit();
                    }
                }
                Message::EditUndo => state.undo(),
                Message::EditRedo => state.redo(),
                Message::EditCut => state.edit_cut(),
                Message::EditCopy => state.edit_copy(),
                Message::EditPaste => state.edit_paste(),
                Message::SelectAll => state.select_all(),
                Message::Format(cmd) => state.apply_format(cmd),
                Message::ToggleWordWrap => state.toggle_word_wrap(),
                Message::ToggleDarkMode => state.toggle_dark_mode(),
                Message::TabChanged => state.selected_tab_changed(),
                Message::ShowAbout => show_about_dialog(),
                Message::RichEdited {
                    pos,
                    inserted,
                    deleted,
                } => state.rich_edited(pos, inserted, deleted),
                Message::SourceEdited => state.source_edited(),
            }
        }
    }
}
