use std::cell::Cell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    enums::Font,
    group::{Flex, Group, Tabs},
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use crate::app::messages::Message;

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub tabs: Tabs,
    pub rich_page: Group,
    pub source_page: Group,
    pub rich_editor: TextEditor,
    pub source_editor: TextEditor,
    pub rich_style_buffer: TextBuffer,
}

pub fn build_main_window(sender: &Sender<Message>, sync_guard: &Rc<Cell<bool>>) -> MainWidgets {
    let mut wind = Window::new(100, 100, 800, 600, "Untitled - HtmlPad");
    wind.set_xclass("HtmlPad");

    let mut flex = Flex::new(0, 0, 800, 600, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let mut tabs = Tabs::new(0, 30, 800, 570, None);
    let client = tabs.client_area();

    // First tab: the rich (WYSIWYG) pane.
    let mut rich_page = Group::new(client.0, client.1, client.2, client.3, "Editor");
    let mut rich_editor = TextEditor::new(client.0, client.1, client.2, client.3, "");
    let mut rich_buffer = TextBuffer::default();
    {
        let guard = sync_guard.clone();
        let s = *sender;
        let buf = rich_buffer.clone();
        rich_buffer.add_modify_callback(
            move |pos, n_inserted, n_deleted, _n_restyled, deleted_text| {
                if guard.get() || (n_inserted == 0 && n_deleted == 0) {
                    return;
                }
                // Capture the inserted text now; the buffer may move on
                // before the message is handled.
                let inserted = if n_inserted > 0 {
                    buf.text_range(pos, pos + n_inserted).unwrap_or_default()
                } else {
                    String::new()
                };
                s.send(Message::RichEdited {
                    pos: pos.max(0) as usize,
                    inserted,
                    deleted: deleted_text.to_string(),
                });
            },
        );
    }
    rich_editor.set_buffer(rich_buffer);
    let rich_style_buffer = TextBuffer::default();
    rich_page.resizable(&rich_editor);
    rich_page.end();

    // Second tab: the raw markup pane.
    let mut source_page = Group::new(client.0, client.1, client.2, client.3, "Source");
    let mut source_editor = TextEditor::new(client.0, client.1, client.2, client.3, "");
    let mut source_buffer = TextBuffer::default();
    {
        let guard = sync_guard.clone();
        let s = *sender;
        source_buffer.add_modify_callback(
            move |_pos, n_inserted, n_deleted, _n_restyled, _deleted_text| {
                if guard.get() || (n_inserted == 0 && n_deleted == 0) {
                    return;
                }
                s.send(Message::SourceEdited);
            },
        );
    }
    source_editor.set_buffer(source_buffer);
    source_editor.set_text_font(Font::Courier);
    source_page.resizable(&source_editor);
    source_page.end();

    tabs.end();
    tabs.auto_layout();
    tabs.set_callback({
        let s = *sender;
        move |_| s.send(Message::TabChanged)
    });

    flex.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        tabs,
        rich_page,
        source_page,
        rich_editor,
        source_editor,
        rich_style_buffer,
    }
}
