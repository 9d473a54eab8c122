//! The document session: open tabs, settings, and the integrations that feed
//! generated text back in as new tabs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::controllers::tabs::TabManager;
use crate::app::domain::document::{Document, DocumentId, UNTITLED};
use crate::app::domain::settings::{AppSettings, Credential, MIN_FONT_SIZE, SettingsStore};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::surface::{SurfaceFactory, TextSurface};
use crate::app::services::invoice::{format_invoice, invoice_title, invoice_total, parse_items};
use crate::app::services::llm::{Assistant, DEFAULT_MAX_TOKENS};
use crate::app::services::messaging::Messenger;
use crate::app::services::text_ops::selection_or_all;

pub const LLM_RESPONSE_TITLE: &str = "LLM Response";
const ZOOM_STEP: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The document had no path and none was chosen.
    Cancelled,
}

pub struct Session {
    tabs: TabManager,
    settings: AppSettings,
    store: SettingsStore,
    surfaces: Box<dyn SurfaceFactory>,
    assistant: Box<dyn Assistant>,
    messenger: Box<dyn Messenger>,
}

impl Session {
    /// Load settings from `store` and open one empty document.
    pub fn new(
        store: SettingsStore,
        surfaces: impl SurfaceFactory + 'static,
        assistant: impl Assistant + 'static,
        messenger: impl Messenger + 'static,
    ) -> Self {
        let settings = store.load();
        Self::with_settings(store, settings, surfaces, assistant, messenger)
    }

    pub fn with_settings(
        store: SettingsStore,
        settings: AppSettings,
        surfaces: impl SurfaceFactory + 'static,
        assistant: impl Assistant + 'static,
        messenger: impl Messenger + 'static,
    ) -> Self {
        let mut session = Self {
            tabs: TabManager::new(),
            settings,
            store,
            surfaces: Box::new(surfaces),
            assistant: Box::new(assistant),
            messenger: Box::new(messenger),
        };
        session.push_credentials();
        session.new_document("", UNTITLED);
        session
    }

    fn push_credentials(&mut self) {
        self.assistant.set_api_key(self.settings.llm_api_key());
        let (token, chat_id) = match self.settings.telegram_credentials() {
            Some((token, chat_id)) => (Some(token), Some(chat_id)),
            None => (None, None),
        };
        self.messenger.set_credentials(token, chat_id);
    }

    fn create_surface(&self, content: &str) -> Box<dyn TextSurface> {
        self.surfaces.create(content, self.settings.font_size())
    }

    // --- Accessors ---

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn documents(&self) -> &[Document] {
        self.tabs.documents()
    }

    pub fn count(&self) -> usize {
        self.tabs.count()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.tabs.active_id()
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.tabs.active_doc()
    }

    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        self.tabs.active_doc_mut()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.tabs.doc_by_id(id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.tabs.doc_by_id_mut(id)
    }

    pub fn set_active(&mut self, id: DocumentId) {
        self.tabs.set_active(id);
    }

    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.tabs.find_by_path(path)
    }

    // --- Documents ---

    pub fn new_document(&mut self, content: &str, title: &str) -> DocumentId {
        let surface = self.create_surface(content);
        self.tabs.add(title, surface)
    }

    /// Close a tab. The last tab is replaced by a fresh empty one.
    pub fn close_document(&mut self, id: DocumentId) {
        if self.tabs.doc_by_id(id).is_none() {
            return;
        }
        if self.tabs.count() == 1 {
            self.new_document("", UNTITLED);
        }
        self.tabs.remove(id);
    }

    pub fn open_from_path(&mut self, path: impl AsRef<Path>) -> Result<DocumentId> {
        let path = path.as_ref();
        if let Some(existing) = self.tabs.find_by_path(path) {
            self.tabs.set_active(existing);
            return Ok(existing);
        }

        let content = fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "opened file");
        let surface = self.create_surface(&content);
        Ok(self.tabs.add_from_file(path.to_path_buf(), surface))
    }

    /// Write to the backing path, or to a path from `choose_path` when the
    /// document has none.
    pub fn save(
        &mut self,
        id: DocumentId,
        choose_path: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<SaveOutcome> {
        let doc = self.tabs.doc_by_id_mut(id).ok_or(AppError::UnknownDocument(id))?;
        match doc.backing_path().map(Path::to_path_buf) {
            Some(path) => {
                fs::write(&path, doc.content())?;
                doc.mark_clean();
                tracing::info!(path = %path.display(), "saved file");
                Ok(SaveOutcome::Saved(path))
            }
            None => match choose_path() {
                Some(path) => {
                    self.save_as(id, &path)?;
                    Ok(SaveOutcome::Saved(path))
                }
                None => Ok(SaveOutcome::Cancelled),
            },
        }
    }

    pub fn save_as(&mut self, id: DocumentId, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.tabs.doc_by_id(id).ok_or(AppError::UnknownDocument(id))?.content();
        fs::write(path, content)?;

        // Another tab bound to this path no longer matches the file on disk.
        if let Some(other) = self.tabs.find_by_path(path).filter(|&other| other != id) {
            if let Some(doc) = self.tabs.doc_by_id_mut(other) {
                doc.unbind();
                tracing::debug!(path = %path.display(), "unbound stale tab");
            }
        }
        if let Some(doc) = self.tabs.doc_by_id_mut(id) {
            doc.bind(path.to_path_buf());
        }
        tracing::info!(path = %path.display(), "saved file");
        Ok(())
    }

    // --- Editing passthroughs (active document only) ---

    fn with_active_surface(&mut self, f: impl FnOnce(&mut dyn TextSurface)) {
        if let Some(doc) = self.tabs.active_doc_mut() {
            f(doc.surface_mut());
        }
    }

    pub fn cut(&mut self) {
        self.with_active_surface(|s| s.cut());
    }

    pub fn copy(&mut self) {
        self.with_active_surface(|s| s.copy());
    }

    pub fn paste(&mut self) {
        self.with_active_surface(|s| s.paste());
    }

    pub fn undo(&mut self) {
        self.with_active_surface(|s| s.undo());
    }

    pub fn redo(&mut self) {
        self.with_active_surface(|s| s.redo());
    }

    pub fn select_all(&mut self) {
        self.with_active_surface(|s| s.select_all());
    }

    pub fn zoom_in(&mut self) {
        self.with_active_surface(|s| s.set_font_size(s.font_size() + ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.with_active_surface(|s| {
            let size = s.font_size().saturating_sub(ZOOM_STEP).max(MIN_FONT_SIZE);
            s.set_font_size(size);
        });
    }

    // --- Integrations ---

    /// Ask the LLM about `selected_text` and open the answer in a new tab.
    pub fn query_assistant(&mut self, selected_text: &str) -> Result<DocumentId> {
        if selected_text.is_empty() {
            return Err(AppError::EmptySelection);
        }
        if self.settings.llm_api_key().is_none() {
            return Err(AppError::ConfigMissing(Credential::LlmApiKey));
        }
        let answer = self.assistant.query(selected_text, DEFAULT_MAX_TOKENS);
        Ok(self.new_document(&answer, LLM_RESPONSE_TITLE))
    }

    /// Send the document's selection, or all of it when nothing is selected.
    pub fn send_selection_or_all(&mut self, id: DocumentId) -> Result<()> {
        let doc = self.tabs.doc_by_id(id).ok_or(AppError::UnknownDocument(id))?;
        let selection = doc.surface().selected_text();
        let content = doc.content();
        let text = selection_or_all(&selection, &content);

        if text.is_empty() {
            return Err(AppError::NothingToSend);
        }
        if self.settings.telegram_credentials().is_none() {
            return Err(AppError::ConfigMissing(Credential::Telegram));
        }
        if self.messenger.send_message(text) {
            Ok(())
        } else {
            Err(AppError::Delivery("Failed to send message to Telegram".to_string()))
        }
    }

    pub fn generate_invoice(&mut self, client_name: &str, raw_item_lines: &str) -> Result<DocumentId> {
        let items = parse_items(raw_item_lines)?;
        let total = invoice_total(&items);
        let text = format_invoice(client_name, &items, total);
        Ok(self.new_document(&text, &invoice_title(client_name)))
    }

    // --- Configuration ---

    pub fn configure_llm(&mut self, api_key: &str) {
        self.settings.set_llm_api_key(api_key);
        self.push_credentials();
        self.store.save(&self.settings);
    }

    pub fn configure_messaging(&mut self, token: &str, chat_id: &str) {
        self.settings.set_telegram(token, chat_id);
        self.push_credentials();
        self.store.save(&self.settings);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::app::domain::document::DocumentState;
    use crate::app::infrastructure::surface::MemorySurfaceFactory;

    #[derive(Clone, Default)]
    struct FakeAssistant {
        key: Rc<RefCell<Option<String>>>,
        prompts: Rc<RefCell<Vec<String>>>,
    }

    impl Assistant for FakeAssistant {
        fn set_api_key(&mut self, api_key: Option<&str>) {
            *self.key.borrow_mut() = api_key.map(str::to_string);
        }

        fn query(&self, prompt: &str, _max_tokens: u32) -> String {
            self.prompts.borrow_mut().push(prompt.to_string());
            format!("answer to {prompt}")
        }
    }

    #[derive(Clone, Default)]
    struct FakeMessenger {
        sent: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Messenger for FakeMessenger {
        fn set_credentials(&mut self, _token: Option<&str>, _chat_id: Option<&str>) {}

        fn send_message(&self, text: &str) -> bool {
            self.sent.borrow_mut().push(text.to_string());
            !self.fail
        }
    }

    struct Fixture {
        session: Session,
        assistant: FakeAssistant,
        messenger: FakeMessenger,
        dir: tempfile::TempDir,
    }

    fn fixture_with(settings: AppSettings, messenger: FakeMessenger) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        let assistant = FakeAssistant::default();
        let session = Session::with_settings(
            store,
            settings,
            MemorySurfaceFactory::new(),
            assistant.clone(),
            messenger.clone(),
        );
        Fixture { session, assistant, messenger, dir }
    }

    fn fixture() -> Fixture {
        fixture_with(AppSettings::default(), FakeMessenger::default())
    }

    fn configured() -> AppSettings {
        let mut settings = AppSettings::default();
        settings.set_llm_api_key("sk-test");
        settings.set_telegram("token", "42");
        settings
    }

    #[test]
    fn test_starts_with_one_untitled_document() {
        let f = fixture();
        assert_eq!(f.session.count(), 1);
        let doc = f.session.active_document().unwrap();
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.state(), DocumentState::Unbound);
    }

    #[test]
    fn test_never_empty_after_any_close() {
        let mut f = fixture();
        let mut ids = vec![f.session.active_id().unwrap()];
        for step in 0..20 {
            if step % 3 == 2 {
                ids.push(f.session.new_document("", UNTITLED));
            } else {
                let id = ids.remove(0);
                f.session.close_document(id);
                if ids.is_empty() {
                    ids.push(f.session.active_id().unwrap());
                }
            }
            assert!(f.session.count() >= 1);
            assert!(f.session.active_id().is_some());
        }
    }

    #[test]
    fn test_closing_last_document_replaces_it() {
        let mut f = fixture();
        let only = f.session.active_id().unwrap();
        f.session.close_document(only);
        assert_eq!(f.session.count(), 1);
        let replacement = f.session.active_document().unwrap();
        assert_ne!(replacement.id, only);
        assert_eq!(replacement.content(), "");
    }

    #[test]
    fn test_close_middle_keeps_later_paths() {
        let mut f = fixture();
        let paths: Vec<PathBuf> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|name| {
                let p = f.dir.path().join(name);
                fs::write(&p, *name).unwrap();
                p
            })
            .collect();
        let ids: Vec<DocumentId> = paths.iter().map(|p| f.session.open_from_path(p).unwrap()).collect();

        f.session.close_document(ids[1]);

        assert_eq!(f.session.document(ids[2]).unwrap().backing_path(), Some(paths[2].as_path()));
        assert_eq!(f.session.document(ids[0]).unwrap().backing_path(), Some(paths[0].as_path()));
    }

    #[test]
    fn test_open_sets_title_and_clean_state() {
        let mut f = fixture();
        let path = f.dir.path().join("script.py");
        fs::write(&path, "print('hi')\n").unwrap();

        let id = f.session.open_from_path(&path).unwrap();
        let doc = f.session.document(id).unwrap();
        assert_eq!(doc.title, "script.py");
        assert_eq!(doc.content(), "print('hi')\n");
        assert_eq!(doc.state(), DocumentState::Clean);
        assert_eq!(f.session.active_id(), Some(id));
    }

    #[test]
    fn test_open_missing_file_leaves_session_unchanged() {
        let mut f = fixture();
        let before = f.session.active_id();
        let err = f.session.open_from_path(f.dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(f.session.count(), 1);
        assert_eq!(f.session.active_id(), before);
    }

    #[test]
    fn test_open_non_utf8_is_io_error() {
        let mut f = fixture();
        let path = f.dir.path().join("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(f.session.open_from_path(&path), Err(AppError::Io(_))));
        assert_eq!(f.session.count(), 1);
    }

    #[test]
    fn test_open_same_path_twice_reuses_tab() {
        let mut f = fixture();
        let path = f.dir.path().join("notes.txt");
        fs::write(&path, "x").unwrap();
        let first = f.session.open_from_path(&path).unwrap();
        f.session.new_document("", UNTITLED);
        let second = f.session.open_from_path(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(f.session.active_id(), Some(first));
        assert_eq!(f.session.count(), 3);
    }

    #[test]
    fn test_open_then_save_preserves_bytes() {
        let mut f = fixture();
        let path = f.dir.path().join("round.txt");
        let original = "line one\r\nline two\n\ttabbed\n";
        fs::write(&path, original).unwrap();

        let id = f.session.open_from_path(&path).unwrap();
        let outcome = f.session.save(id, || panic!("bound document must not prompt")).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_save_as_then_save_writes_current_content() {
        let mut f = fixture();
        let id = f.session.new_document("draft", UNTITLED);
        let path = f.dir.path().join("draft.txt");

        f.session.save_as(id, &path).unwrap();
        let doc = f.session.document(id).unwrap();
        assert_eq!(doc.title, "draft.txt");
        assert_eq!(doc.state(), DocumentState::Clean);

        f.session.document_mut(id).unwrap().surface_mut().insert(" v2");
        assert_eq!(f.session.document(id).unwrap().state(), DocumentState::Dirty);

        f.session.save(id, || None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "draft v2");
        assert_eq!(f.session.document(id).unwrap().state(), DocumentState::Clean);
    }

    #[test]
    fn test_save_unbound_prompts_for_path() {
        let mut f = fixture();
        let id = f.session.new_document("hello", UNTITLED);
        let path = f.dir.path().join("hello.txt");

        let outcome = f.session.save(id, || Some(path.clone())).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(f.session.document(id).unwrap().title, "hello.txt");
    }

    #[test]
    fn test_save_unbound_cancelled() {
        let mut f = fixture();
        let id = f.session.new_document("hello", UNTITLED);
        assert_eq!(f.session.save(id, || None).unwrap(), SaveOutcome::Cancelled);
        assert_eq!(f.session.document(id).unwrap().state(), DocumentState::Unbound);
    }

    #[test]
    fn test_failed_save_as_keeps_binding() {
        let mut f = fixture();
        let id = f.session.new_document("text", UNTITLED);
        let bad = f.dir.path().join("no-such-dir").join("x.txt");
        assert!(matches!(f.session.save_as(id, &bad), Err(AppError::Io(_))));
        let doc = f.session.document(id).unwrap();
        assert_eq!(doc.title, "Untitled");
        assert!(doc.backing_path().is_none());
    }

    #[test]
    fn test_editing_targets_active_document_only() {
        let mut f = fixture();
        let first = f.session.new_document("first", UNTITLED);
        let second = f.session.new_document("second", UNTITLED);

        f.session.select_all();
        f.session.cut();
        assert_eq!(f.session.document(second).unwrap().content(), "");
        assert_eq!(f.session.document(first).unwrap().content(), "first");

        f.session.set_active(first);
        f.session.paste();
        assert_eq!(f.session.document(first).unwrap().content(), "firstsecond");

        f.session.undo();
        assert_eq!(f.session.document(first).unwrap().content(), "first");
        f.session.redo();
        assert_eq!(f.session.document(first).unwrap().content(), "firstsecond");
    }

    #[test]
    fn test_copy_then_paste_into_other_tab() {
        let mut f = fixture();
        let source = f.session.new_document("copied", UNTITLED);
        f.session.select_all();
        f.session.copy();
        let target = f.session.new_document("", UNTITLED);
        f.session.paste();
        assert_eq!(f.session.document(target).unwrap().content(), "copied");
        assert_eq!(f.session.document(source).unwrap().content(), "copied");
    }

    #[test]
    fn test_zoom_out_clamps_at_floor() {
        let mut settings = AppSettings::default();
        settings.font_size = Some(9);
        let mut f = fixture_with(settings, FakeMessenger::default());

        let size = |s: &Session| s.active_document().unwrap().surface().font_size();
        assert_eq!(size(&f.session), 9);
        for _ in 0..5 {
            f.session.zoom_out();
        }
        assert_eq!(size(&f.session), MIN_FONT_SIZE);

        for _ in 0..30 {
            f.session.zoom_in();
        }
        assert_eq!(size(&f.session), MIN_FONT_SIZE + 30);
    }

    #[test]
    fn test_stored_font_size_below_floor_opens_at_floor() {
        let mut settings = AppSettings::default();
        settings.font_size = Some(3);
        let mut f = fixture_with(settings, FakeMessenger::default());

        let size = |s: &Session| s.active_document().unwrap().surface().font_size();
        assert_eq!(size(&f.session), MIN_FONT_SIZE);
        f.session.zoom_out();
        assert_eq!(size(&f.session), MIN_FONT_SIZE);
        let id = f.session.new_document("", UNTITLED);
        assert_eq!(f.session.document(id).unwrap().surface().font_size(), MIN_FONT_SIZE);
    }

    #[test]
    fn test_save_as_onto_open_path_unbinds_other_tab() {
        let mut f = fixture();
        let path = f.dir.path().join("shared.txt");
        fs::write(&path, "old").unwrap();
        let opened = f.session.open_from_path(&path).unwrap();
        let draft = f.session.new_document("new", UNTITLED);

        f.session.save_as(draft, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(f.session.find_by_path(&path), Some(draft));
        let stale = f.session.document(opened).unwrap();
        assert_eq!(stale.backing_path(), None);
        assert_eq!(stale.content(), "old");
        assert_eq!(f.session.open_from_path(&path).unwrap(), draft);
    }

    #[test]
    fn test_undo_to_saved_text_clears_dirty() {
        let mut f = fixture();
        let path = f.dir.path().join("undo.txt");
        fs::write(&path, "kept").unwrap();
        let id = f.session.open_from_path(&path).unwrap();

        f.session.document_mut(id).unwrap().surface_mut().insert("!");
        assert_eq!(f.session.document(id).unwrap().state(), DocumentState::Dirty);
        f.session.undo();
        assert_eq!(f.session.document(id).unwrap().state(), DocumentState::Clean);
    }

    #[test]
    fn test_query_with_empty_selection_never_calls_client() {
        let mut f = fixture_with(configured(), FakeMessenger::default());
        assert!(matches!(f.session.query_assistant(""), Err(AppError::EmptySelection)));
        assert!(f.assistant.prompts.borrow().is_empty());
        assert_eq!(f.session.count(), 1);
    }

    #[test]
    fn test_query_without_key_is_config_missing() {
        let mut f = fixture();
        assert!(matches!(
            f.session.query_assistant("what?"),
            Err(AppError::ConfigMissing(Credential::LlmApiKey))
        ));
        assert!(f.assistant.prompts.borrow().is_empty());
    }

    #[test]
    fn test_query_opens_response_tab() {
        let mut f = fixture_with(configured(), FakeMessenger::default());
        assert_eq!(f.assistant.key.borrow().as_deref(), Some("sk-test"));

        let id = f.session.query_assistant("what?").unwrap();
        let doc = f.session.document(id).unwrap();
        assert_eq!(doc.title, "LLM Response");
        assert_eq!(doc.content(), "answer to what?");
        assert_eq!(doc.state(), DocumentState::Unbound);
        assert_eq!(f.session.active_id(), Some(id));
    }

    #[test]
    fn test_send_without_selection_sends_everything() {
        let mut f = fixture_with(configured(), FakeMessenger::default());
        let id = f.session.new_document("full text", UNTITLED);
        f.session.send_selection_or_all(id).unwrap();
        assert_eq!(*f.messenger.sent.borrow(), ["full text"]);
    }

    #[test]
    fn test_send_with_selection_sends_selection_only() {
        let mut f = fixture_with(configured(), FakeMessenger::default());
        let id = f.session.new_document("full text", UNTITLED);
        f.session.document_mut(id).unwrap().surface_mut().select(5, 9);
        f.session.send_selection_or_all(id).unwrap();
        assert_eq!(*f.messenger.sent.borrow(), ["text"]);
    }

    #[test]
    fn test_send_empty_document() {
        let mut f = fixture_with(configured(), FakeMessenger::default());
        let id = f.session.active_id().unwrap();
        assert!(matches!(f.session.send_selection_or_all(id), Err(AppError::NothingToSend)));
        assert!(f.messenger.sent.borrow().is_empty());
    }

    #[test]
    fn test_send_without_credentials() {
        let mut f = fixture();
        let id = f.session.new_document("text", UNTITLED);
        assert!(matches!(
            f.session.send_selection_or_all(id),
            Err(AppError::ConfigMissing(Credential::Telegram))
        ));
        assert!(f.messenger.sent.borrow().is_empty());
    }

    #[test]
    fn test_send_failure_is_delivery_error() {
        let messenger = FakeMessenger { fail: true, ..Default::default() };
        let mut f = fixture_with(configured(), messenger);
        let id = f.session.new_document("text", UNTITLED);
        assert!(matches!(f.session.send_selection_or_all(id), Err(AppError::Delivery(_))));
    }

    #[test]
    fn test_generate_invoice_opens_tab() {
        let mut f = fixture();
        let id = f.session.generate_invoice("Acme", "Widget,2,10.50\nGadget,1,25.00").unwrap();
        let doc = f.session.document(id).unwrap();
        assert_eq!(doc.title, "Invoice_Acme");
        let text = doc.content();
        assert!(text.contains("Client: Acme"));
        assert!(text.contains("Widget - 2 x $10.50 = $21.00"));
        assert!(text.contains("Gadget - 1 x $25.00 = $25.00"));
        assert!(text.ends_with("TOTAL AMOUNT: $46.00"));
    }

    #[test]
    fn test_malformed_invoice_creates_nothing() {
        let mut f = fixture();
        let err = f.session.generate_invoice("Acme", "Widget,two,9.99").unwrap_err();
        assert!(matches!(err, AppError::Format { line: 1, .. }));
        assert_eq!(f.session.count(), 1);
    }

    #[test]
    fn test_configure_persists_and_updates_clients() {
        let mut f = fixture();
        f.session.configure_llm("  sk-new ");
        f.session.configure_messaging(" tok ", " 7 ");

        assert_eq!(f.assistant.key.borrow().as_deref(), Some("sk-new"));
        assert_eq!(f.session.settings().telegram_credentials(), Some(("tok", "7")));

        let reloaded = SettingsStore::new(f.dir.path().join("settings.json")).load();
        assert_eq!(&reloaded, f.session.settings());
    }
}
