use fltk::{enums::Color, menu::MenuBar, prelude::*, text::TextEditor, window::Window};

pub fn apply_theme(
    rich_editor: &mut TextEditor,
    source_editor: &mut TextEditor,
    window: &mut Window,
    menu: &mut MenuBar,
    is_dark: bool,
) {
    for editor in [&mut *rich_editor, &mut *source_editor] {
        if is_dark {
            editor.set_color(Color::from_rgb(30, 30, 30));
            editor.set_text_color(Color::from_rgb(220, 220, 220));
            editor.set_cursor_color(Color::from_rgb(255, 255, 255));
            editor.set_selection_color(Color::from_rgb(70, 70, 100));
        } else {
            editor.set_color(Color::White);
            editor.set_text_color(Color::Black);
            editor.set_cursor_color(Color::Black);
            editor.set_selection_color(Color::from_rgb(173, 216, 230));
        }
        editor.redraw();
    }

    if is_dark {
        window.set_color(Color::from_rgb(25, 25, 25));
        window.set_label_color(Color::from_rgb(220, 220, 220));
        menu.set_color(Color::from_rgb(35, 35, 35));
        menu.set_text_color(Color::from_rgb(220, 220, 220));
        menu.set_selection_color(Color::from_rgb(60, 60, 60)); // Hover color
    } else {
        window.set_color(Color::from_rgb(240, 240, 240));
        window.set_label_color(Color::Black);
        menu.set_color(Color::from_rgb(240, 240, 240));
        menu.set_text_color(Color::Black);
        menu.set_selection_color(Color::from_rgb(200, 200, 200)); // Hover color
    }

    window.redraw();
    menu.redraw();
}
