use fltk::{
    button::Button,
    enums::{Align, Font},
    frame::Frame,
    group::Flex,
    prelude::*,
    window::Window,
};

/// Show About dialog
pub fn show_about_dialog() {
    let version = env!("CARGO_PKG_VERSION");
    let mut dialog = Window::default()
        .with_size(380, 300)
        .with_label("About Accurate Notepad")
        .center_screen();
    dialog.make_modal(true);

    let mut flex = Flex::new(10, 10, 360, 280, None);
    flex.set_type(fltk::group::FlexType::Column);
    flex.set_spacing(10);

    let mut title = Frame::default();
    title.set_label("Accurate Notepad");
    title.set_label_size(22);
    title.set_label_font(Font::HelveticaBold);
    flex.fixed(&title, 40);

    let mut version_frame = Frame::default();
    version_frame.set_label(&format!("Version {version}"));
    version_frame.set_label_size(14);
    flex.fixed(&version_frame, 25);

    let mut features = Frame::default();
    features.set_label(
        "A feature-rich text editor with:\n\
         - Code editing with syntax highlighting\n\
         - LLM integration\n\
         - Telegram integration\n\
         - Invoice generation\n\
         - Customizable interface",
    );
    features.set_label_size(12);
    features.set_align(Align::Left | Align::Inside);

    let mut close_btn = Button::default().with_label("Close");
    flex.fixed(&close_btn, 35);

    flex.end();
    dialog.end();

    let mut dialog_close = dialog.clone();
    close_btn.set_callback(move |_| {
        dialog_close.hide();
    });

    dialog.show();
    super::run_dialog(&dialog);
}
