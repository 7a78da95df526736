use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::document::{Alignment, FontFamily, FontSize, TextColor};
use crate::app::messages::{FormatCommand, Message};
use crate::app::settings::{AppSettings, ThemeMode};

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, settings: &AppSettings) {
    let s = sender;

    // File
    menu.add("File/New", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNew) });
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSaveAs) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Edit
    menu.add("Edit/Undo", Shortcut::Ctrl | 'z', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditUndo) });
    menu.add("Edit/Redo", Shortcut::Ctrl | Shortcut::Shift | 'z', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditRedo) });
    menu.add("Edit/Cut", Shortcut::Ctrl | 'x', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditCut) });
    menu.add("Edit/Copy", Shortcut::Ctrl | 'c', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditCopy) });
    menu.add("Edit/Paste", Shortcut::Ctrl | 'v', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditPaste) });
    menu.add("Edit/Select All", Shortcut::Ctrl | 'a', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SelectAll) });

    // View
    let ww_flag = if settings.word_wrap_enabled { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add("View/Toggle Word Wrap", Shortcut::None, ww_flag, { let s = *s; move |_| s.send(Message::ToggleWordWrap) });
    let dm_flag = if settings.theme_mode == ThemeMode::Dark { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add("View/Toggle Dark Mode", Shortcut::None, dm_flag, { let s = *s; move |_| s.send(Message::ToggleDarkMode) });

    // Style
    menu.add("Style/Bold", Shortcut::Ctrl | 'b', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Bold)) });
    menu.add("Style/Italic", Shortcut::Ctrl | 'i', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Italic)) });
    menu.add("Style/Plain Text", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::PlainText)) });

    // Align
    menu.add("Align/Left", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Align(Alignment::Left))) });
    menu.add("Align/Center", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Align(Alignment::Center))) });
    menu.add("Align/Right", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Align(Alignment::Right))) });

    // Color
    menu.add("Color/Black", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Color(TextColor::Black))) });
    menu.add("Color/Red", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Color(TextColor::Red))) });
    menu.add("Color/Green", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Color(TextColor::Green))) });
    menu.add("Color/Blue", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Color(TextColor::Blue))) });

    // Font
    menu.add("Font/Family/Helvetica", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Family(FontFamily::Helvetica))) });
    menu.add("Font/Family/Courier", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Family(FontFamily::Courier))) });
    menu.add("Font/Family/Times", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Family(FontFamily::Times))) });
    menu.add("Font/Size/Small", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Size(FontSize::Small))) });
    menu.add("Font/Size/Normal", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Size(FontSize::Normal))) });
    menu.add("Font/Size/Large", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Size(FontSize::Large))) });
    menu.add("Font/Size/Huge", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatCommand::Size(FontSize::Huge))) });

    // Help
    menu.add("Help/About HtmlPad", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ShowAbout) });
}
