use fltk::{
    button::Button,
    enums::{Color, Font},
    frame::Frame,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{StyleTableEntry, TextEditor},
    window::Window,
};

pub const EDITOR_FONT: Font = Font::Courier;

/// Colors for one named theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub window: Color,
    pub editor_bg: Color,
    pub editor_fg: Color,
    pub selection: Color,
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub menu_selected: Color,
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
}

impl Palette {
    /// The red theme is the default; "dark" and "light" are also known.
    /// Anything else falls back to red.
    pub fn named(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::red(),
        }
    }

    pub fn red() -> Self {
        Self {
            window: Color::from_hex(0x330000),
            editor_bg: Color::from_hex(0x1a0000),
            editor_fg: Color::White,
            selection: Color::from_hex(0x990000),
            menu_bg: Color::from_hex(0x660000),
            menu_fg: Color::White,
            menu_selected: Color::from_hex(0x990000),
            keyword: Color::from_rgb(255, 100, 100),
            string: Color::from_rgb(100, 255, 100),
            comment: Color::from_rgb(150, 150, 150),
        }
    }

    pub fn dark() -> Self {
        Self {
            window: Color::from_rgb(25, 25, 25),
            editor_bg: Color::from_rgb(30, 30, 30),
            editor_fg: Color::from_rgb(220, 220, 220),
            selection: Color::from_rgb(70, 70, 100),
            menu_bg: Color::from_rgb(35, 35, 35),
            menu_fg: Color::from_rgb(220, 220, 220),
            menu_selected: Color::from_rgb(60, 60, 60),
            keyword: Color::from_rgb(86, 156, 214),
            string: Color::from_rgb(206, 145, 120),
            comment: Color::from_rgb(106, 153, 85),
        }
    }

    pub fn light() -> Self {
        Self {
            window: Color::from_rgb(240, 240, 240),
            editor_bg: Color::White,
            editor_fg: Color::Black,
            selection: Color::from_rgb(173, 216, 230),
            menu_bg: Color::from_rgb(240, 240, 240),
            menu_fg: Color::Black,
            menu_selected: Color::from_rgb(200, 200, 200),
            keyword: Color::from_rgb(0, 0, 200),
            string: Color::from_rgb(0, 128, 0),
            comment: Color::from_rgb(128, 128, 128),
        }
    }

    /// Entries for style characters 'A' (plain), 'B' (keyword), 'C' (string)
    /// and 'D' (comment), in that order.
    pub fn style_table(&self, font_size: u32) -> Vec<StyleTableEntry> {
        let size = font_size as i32;
        vec![
            StyleTableEntry { color: self.editor_fg, font: EDITOR_FONT, size },
            StyleTableEntry { color: self.keyword, font: Font::CourierBold, size },
            StyleTableEntry { color: self.string, font: EDITOR_FONT, size },
            StyleTableEntry { color: self.comment, font: EDITOR_FONT, size },
        ]
    }
}

pub fn apply_theme(
    editor: &mut TextEditor,
    window: &mut Window,
    menu: &mut MenuBar,
    toolbar: &mut Flex,
    toolbar_buttons: &mut [Button],
    status: &mut Frame,
    palette: &Palette,
) {
    editor.set_color(palette.editor_bg);
    editor.set_text_color(palette.editor_fg);
    editor.set_cursor_color(palette.editor_fg);
    editor.set_selection_color(palette.selection);
    editor.set_text_font(EDITOR_FONT);
    window.set_color(palette.window);
    window.set_label_color(palette.menu_fg);
    menu.set_color(palette.menu_bg);
    menu.set_text_color(palette.menu_fg);
    menu.set_selection_color(palette.menu_selected); // Hover color
    toolbar.set_color(palette.menu_bg);
    for button in toolbar_buttons.iter_mut() {
        style_button(button, palette);
    }
    status.set_color(palette.window);
    status.set_label_color(palette.menu_fg);

    editor.redraw();
    window.redraw();
    menu.redraw();
    toolbar.redraw();
}

/// Colors for toolbar buttons.
fn style_button(button: &mut Button, palette: &Palette) {
    button.set_color(palette.menu_bg);
    button.set_label_color(palette.menu_fg);
    button.set_selection_color(palette.menu_selected);
}
