use fltk::{app, enums::Event, prelude::*};
use tracing_subscriber::EnvFilter;

use accurate_notepad::app::controllers::commands::{Flow, dispatch};
use accurate_notepad::app::controllers::session::Session;
use accurate_notepad::app::domain::messages::Message;
use accurate_notepad::app::domain::settings::SettingsStore;
use accurate_notepad::app::services::llm::LlmClient;
use accurate_notepad::app::services::messaging::TelegramClient;
use accurate_notepad::ui::fltk_surface::FltkSurfaceFactory;
use accurate_notepad::ui::main_window::{APP_NAME, MainWidgets, build_main_window};
use accurate_notepad::ui::menu::build_menu;
use accurate_notepad::ui::prompter::FltkPrompter;
use accurate_notepad::ui::theme::{Palette, apply_theme};

/// Sync the window title and tab strip with the session.
fn refresh(widgets: &mut MainWidgets, session: &Session) {
    let title = match session.active_document() {
        Some(doc) => {
            let prefix = if doc.is_dirty() { "*" } else { "" };
            format!("{prefix}{} - {APP_NAME}", doc.title)
        }
        None => APP_NAME.to_string(),
    };
    if widgets.wind.label() != title {
        widgets.wind.set_label(&title);
    }
    widgets.tab_bar.rebuild(session.documents(), session.active_id());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let store = SettingsStore::at_default_location();
    let settings = store.load();
    tracing::info!(path = %store.path().display(), theme = settings.theme(), "starting");
    let palette = Palette::named(settings.theme());

    let mut widgets = build_main_window(&sender, palette);
    build_menu(&mut widgets.menu, &sender);
    apply_theme(
        &mut widgets.text_editor,
        &mut widgets.wind,
        &mut widgets.menu,
        &mut widgets.toolbar,
        &mut widgets.toolbar_buttons,
        &mut widgets.status,
        &palette,
    );

    // Only the close button quits; FLTK also fires this callback on Escape.
    widgets.wind.set_callback(move |_| {
        if app::event() == Event::Close {
            sender.send(Message::FileQuit);
        }
    });

    widgets.wind.end();
    widgets.wind.show();

    let surfaces = FltkSurfaceFactory::new(widgets.text_editor.clone(), palette, sender);
    let mut session = Session::with_settings(
        store,
        settings,
        surfaces,
        LlmClient::new(None),
        TelegramClient::new(None, None),
    );
    let mut prompter = FltkPrompter::new(widgets.status.clone());
    refresh(&mut widgets, &session);

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            if msg != Message::BufferModified {
                tracing::debug!(?msg, "dispatch");
            }
            if dispatch(&mut session, &mut prompter, msg) == Flow::Quit {
                app.quit();
                break;
            }
            refresh(&mut widgets, &session);
        }
    }
}
