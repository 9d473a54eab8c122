use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::Message;

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>) {
    let s = sender;

    // File
    menu.add("File/New Tab", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNew) });
    menu.add("File/Open", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Save As", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::FileSaveAs) });
    menu.add("File/Exit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Edit
    menu.add("Edit/Undo", Shortcut::Ctrl | 'z', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditUndo) });
    menu.add("Edit/Redo", Shortcut::Ctrl | 'y', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::EditRedo) });
    menu.add("Edit/Cut", Shortcut::Ctrl | 'x', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditCut) });
    menu.add("Edit/Copy", Shortcut::Ctrl | 'c', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditCopy) });
    menu.add("Edit/Paste", Shortcut::Ctrl | 'v', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditPaste) });
    menu.add("Edit/Select All", Shortcut::Ctrl | 'a', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SelectAll) });

    // View
    menu.add("View/Zoom In", Shortcut::Ctrl | '+', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ZoomIn) });
    menu.add("View/Zoom Out", Shortcut::Ctrl | '-', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ZoomOut) });

    // Tools
    menu.add("Tools/LLM Query", Shortcut::Ctrl | 'l', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::LlmQuery) });
    menu.add("Tools/Generate Invoice", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::GenerateInvoice) });
    menu.add("Tools/Send to Telegram", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SendToTelegram) });

    // Settings
    menu.add("Settings/Configure LLM", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ConfigureLlm) });
    menu.add("Settings/Configure Telegram", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ConfigureTelegram) });

    // Help
    menu.add("Help/About", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ShowAbout) });
}
