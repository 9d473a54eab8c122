//! Maps each [`Message`] onto session operations, running the prompt and
//! notice flows through a [`Prompter`].

use std::path::PathBuf;

use crate::app::controllers::session::{SaveOutcome, Session};
use crate::app::domain::document::UNTITLED;
use crate::app::domain::messages::Message;
use crate::app::infrastructure::error::AppError;
use crate::app::services::invoice::SAMPLE_ITEMS;

/// What the invoice form returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    pub client_name: String,
    pub items: String,
}

/// Blocking user prompts. Every method returns once the user has answered;
/// `None` means the dialog was cancelled.
pub trait Prompter {
    fn open_path(&mut self) -> Option<PathBuf>;
    fn save_path(&mut self) -> Option<PathBuf>;
    /// Ask for the LLM API key, prefilled with `current`.
    fn llm_config(&mut self, current: &str) -> Option<String>;
    /// Ask for the bot token and chat id, prefilled with the current values.
    fn telegram_config(&mut self, token: &str, chat_id: &str) -> Option<(String, String)>;
    fn invoice_form(&mut self, previous: &InvoiceForm) -> Option<InvoiceForm>;
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);
    /// Transient status-line text.
    fn status(&mut self, message: &str);
    fn about(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn dispatch(session: &mut Session, prompter: &mut dyn Prompter, message: Message) -> Flow {
    match message {
        Message::FileNew => {
            session.new_document("", UNTITLED);
        }
        Message::FileOpen => file_open(session, prompter),
        Message::FileSave => file_save(session, prompter),
        Message::FileSaveAs => file_save_as(session, prompter),
        Message::FileQuit => return Flow::Quit,

        Message::EditUndo => session.undo(),
        Message::EditRedo => session.redo(),
        Message::EditCut => session.cut(),
        Message::EditCopy => session.copy(),
        Message::EditPaste => session.paste(),
        Message::SelectAll => session.select_all(),

        Message::ZoomIn => session.zoom_in(),
        Message::ZoomOut => session.zoom_out(),

        Message::LlmQuery => llm_query(session, prompter),
        Message::GenerateInvoice => generate_invoice(session, prompter),
        Message::SendToTelegram => send_to_telegram(session, prompter),

        Message::ConfigureLlm => {
            configure_llm(session, prompter);
        }
        Message::ConfigureTelegram => {
            configure_telegram(session, prompter);
        }
        Message::ShowAbout => prompter.about(),

        Message::TabSwitch(id) => session.set_active(id),
        Message::TabClose(id) => session.close_document(id),
        Message::BufferModified => {}
    }
    Flow::Continue
}

// --- File operations ---

fn file_open(session: &mut Session, prompter: &mut dyn Prompter) {
    let Some(path) = prompter.open_path() else {
        return;
    };
    if let Err(e) = session.open_from_path(&path) {
        tracing::warn!(path = %path.display(), "open failed: {e}");
        prompter.error(&format!("Could not open file: {e}"));
    }
}

fn file_save(session: &mut Session, prompter: &mut dyn Prompter) {
    let Some(id) = session.active_id() else {
        return;
    };
    match session.save(id, || prompter.save_path()) {
        Ok(SaveOutcome::Saved(path)) => prompter.status(&format!("File saved: {}", path.display())),
        Ok(SaveOutcome::Cancelled) => {}
        Err(e) => prompter.error(&format!("Could not save file: {e}")),
    }
}

fn file_save_as(session: &mut Session, prompter: &mut dyn Prompter) {
    let Some(id) = session.active_id() else {
        return;
    };
    let Some(path) = prompter.save_path() else {
        return;
    };
    match session.save_as(id, &path) {
        Ok(()) => prompter.status(&format!("File saved: {}", path.display())),
        Err(e) => prompter.error(&format!("Could not save file: {e}")),
    }
}

// --- Tools ---

fn llm_query(session: &mut Session, prompter: &mut dyn Prompter) {
    let selected = match session.active_document() {
        Some(doc) => doc.surface().selected_text(),
        None => return,
    };
    if selected.is_empty() {
        prompter.info("Please select some text to query the LLM");
        return;
    }
    if session.settings().llm_api_key().is_none() && !configure_llm(session, prompter) {
        return;
    }
    if let Err(e) = session.query_assistant(&selected) {
        prompter.error(&e.to_string());
    }
}

fn send_to_telegram(session: &mut Session, prompter: &mut dyn Prompter) {
    let Some(id) = session.active_id() else {
        return;
    };
    let mut result = session.send_selection_or_all(id);
    if matches!(result, Err(AppError::ConfigMissing(_))) {
        if !configure_telegram(session, prompter) {
            return;
        }
        result = session.send_selection_or_all(id);
    }
    match result {
        Ok(()) => prompter.info("Message sent to Telegram"),
        Err(AppError::NothingToSend) => prompter.info("No text to send"),
        Err(AppError::ConfigMissing(_)) => {}
        Err(_) => prompter.error("Failed to send message to Telegram"),
    }
}

/// Show the invoice form until it produces a valid invoice or is cancelled.
fn generate_invoice(session: &mut Session, prompter: &mut dyn Prompter) {
    let mut form = InvoiceForm {
        client_name: String::new(),
        items: SAMPLE_ITEMS.to_string(),
    };
    while let Some(answer) = prompter.invoice_form(&form) {
        match session.generate_invoice(&answer.client_name, &answer.items) {
            Ok(_) => return,
            Err(e @ AppError::Format { .. }) => {
                prompter.error(&e.to_string());
                form = answer;
            }
            Err(e) => {
                prompter.error(&e.to_string());
                return;
            }
        }
    }
}

// --- Settings ---

/// Returns `true` when a usable key was stored.
fn configure_llm(session: &mut Session, prompter: &mut dyn Prompter) -> bool {
    let current = session.settings().llm_api_key().unwrap_or_default().to_string();
    let Some(key) = prompter.llm_config(&current) else {
        return false;
    };
    session.configure_llm(&key);
    prompter.info("LLM configuration saved");
    session.settings().llm_api_key().is_some()
}

/// Returns `true` when both token and chat id were stored.
fn configure_telegram(session: &mut Session, prompter: &mut dyn Prompter) -> bool {
    let (token, chat_id) = {
        let settings = session.settings();
        (
            settings.telegram_token.clone().unwrap_or_default(),
            settings.telegram_chat_id.clone().unwrap_or_default(),
        )
    };
    let Some((token, chat_id)) = prompter.telegram_config(&token, &chat_id) else {
        return false;
    };
    session.configure_messaging(&token, &chat_id);
    prompter.info("Telegram configuration saved");
    session.settings().telegram_credentials().is_some()
}
