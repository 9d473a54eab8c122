use fltk::{
    app::Sender,
    button::Button,
    enums::{Align, FrameType},
    frame::Frame,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use crate::app::domain::messages::Message;
use super::tab_bar::{TabBar, TAB_BAR_HEIGHT};
use super::theme::Palette;

pub const APP_NAME: &str = "Accurate Notepad";

const TOOLBAR_HEIGHT: i32 = 30;
const STATUS_HEIGHT: i32 = 22;

/// Toolbar entries: label and the message the button sends.
const TOOLBAR: &[(&str, Message)] = &[
    ("New Tab", Message::FileNew),
    ("Open", Message::FileOpen),
    ("Save", Message::FileSave),
    ("Cut", Message::EditCut),
    ("Copy", Message::EditCopy),
    ("Paste", Message::EditPaste),
    ("LLM Query", Message::LlmQuery),
];

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub toolbar: Flex,
    pub toolbar_buttons: Vec<Button>,
    pub tab_bar: TabBar,
    pub text_editor: TextEditor,
    pub status: Frame,
}

pub fn build_main_window(sender: &Sender<Message>, palette: Palette) -> MainWidgets {
    let mut wind = Window::new(100, 100, 800, 600, APP_NAME);
    wind.set_xclass("AccurateNotepad");

    let mut flex = Flex::new(0, 0, 800, 600, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let mut toolbar = Flex::default();
    toolbar.set_type(fltk::group::FlexType::Row);
    toolbar.set_frame(FrameType::FlatBox);
    toolbar.set_spacing(2);
    let toolbar_buttons: Vec<Button> = TOOLBAR
        .iter()
        .map(|&(label, message)| {
            let mut button = Button::default().with_label(label);
            button.set_frame(FrameType::FlatBox);
            let s = *sender;
            button.set_callback(move |_| s.send(message));
            toolbar.fixed(&button, 80);
            button
        })
        .collect();
    // Filler keeps the buttons left-aligned
    Frame::default();
    toolbar.end();
    flex.fixed(&toolbar, TOOLBAR_HEIGHT);

    let tab_bar = TabBar::new(0, 60, 800, *sender, palette);
    flex.fixed(&tab_bar.widget, TAB_BAR_HEIGHT);

    let mut text_editor = TextEditor::new(0, 0, 0, 0, "");
    text_editor.set_buffer(TextBuffer::default());

    let mut status = Frame::default().with_align(Align::Left | Align::Inside);
    status.set_frame(FrameType::FlatBox);
    status.set_label_size(12);
    flex.fixed(&status, STATUS_HEIGHT);

    flex.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        toolbar,
        toolbar_buttons,
        tab_bar,
        text_editor,
        status,
    }
}
