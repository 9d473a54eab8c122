use std::path::PathBuf;

use fltk::{app, dialog, frame::Frame, prelude::*};

use crate::app::controllers::commands::{InvoiceForm, Prompter};
use crate::ui::dialogs::about::show_about_dialog;
use crate::ui::dialogs::config::{show_llm_config_dialog, show_telegram_config_dialog};
use crate::ui::dialogs::invoice::show_invoice_dialog;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};

/// How long a status-line message stays visible.
const STATUS_SECS: f64 = 3.0;

/// [`Prompter`] backed by modal FLTK dialogs and the window's status line.
pub struct FltkPrompter {
    status: Frame,
}

impl FltkPrompter {
    pub fn new(status: Frame) -> Self {
        Self { status }
    }
}

impl Prompter for FltkPrompter {
    fn open_path(&mut self) -> Option<PathBuf> {
        native_open_dialog()
    }

    fn save_path(&mut self) -> Option<PathBuf> {
        native_save_dialog()
    }

    fn llm_config(&mut self, current: &str) -> Option<String> {
        show_llm_config_dialog(current)
    }

    fn telegram_config(&mut self, token: &str, chat_id: &str) -> Option<(String, String)> {
        show_telegram_config_dialog(token, chat_id)
    }

    fn invoice_form(&mut self, previous: &InvoiceForm) -> Option<InvoiceForm> {
        show_invoice_dialog(previous)
    }

    fn info(&mut self, message: &str) {
        dialog::message_title("Info");
        dialog::message_default(message);
    }

    fn error(&mut self, message: &str) {
        dialog::message_title("Error");
        dialog::alert_default(message);
    }

    fn status(&mut self, message: &str) {
        // '@' starts a symbol in FLTK labels
        let shown = message.replace('@', "@@");
        self.status.set_label(&shown);
        self.status.redraw();

        let mut frame = self.status.clone();
        app::add_timeout3(STATUS_SECS, move |_| {
            // A newer message replaces this one and owns its own timeout.
            if frame.label() == shown {
                frame.set_label("");
                frame.redraw();
            }
        });
    }

    fn about(&mut self) {
        show_about_dialog();
    }
}
