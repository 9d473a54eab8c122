use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    button::Button,
    enums::Align,
    frame::Frame,
    group::Flex,
    input::Input,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use crate::app::controllers::commands::InvoiceForm;
use crate::ui::fltk_surface::buffer_text_no_leak;

/// Show the invoice form prefilled with `previous`. Returns the entered
/// client name and item lines, or `None` if the dialog was closed.
pub fn show_invoice_dialog(previous: &InvoiceForm) -> Option<InvoiceForm> {
    let mut dialog = Window::default()
        .with_size(420, 360)
        .with_label("Generate Invoice")
        .center_screen();
    dialog.make_modal(true);

    let mut flex = Flex::new(10, 10, 400, 340, None);
    flex.set_type(fltk::group::FlexType::Column);
    flex.set_spacing(5);

    let client_label = Frame::default()
        .with_label("Client Name:")
        .with_align(Align::Left | Align::Inside);
    flex.fixed(&client_label, 22);
    let mut client_input = Input::default();
    client_input.set_value(&previous.client_name);
    flex.fixed(&client_input, 30);

    let items_label = Frame::default()
        .with_label("Items (format: name,quantity,price per item)")
        .with_align(Align::Left | Align::Inside);
    flex.fixed(&items_label, 22);
    let mut items_buffer = TextBuffer::default();
    items_buffer.set_text(&previous.items);
    let mut items_editor = TextEditor::default();
    items_editor.set_buffer(items_buffer.clone());

    let mut generate_btn = Button::default().with_label("Generate Invoice");
    flex.fixed(&generate_btn, 35);

    flex.end();
    dialog.end();

    let result: Rc<RefCell<Option<InvoiceForm>>> = Rc::new(RefCell::new(None));

    let result_generate = result.clone();
    let dialog_generate = dialog.clone();
    generate_btn.set_callback(move |_| {
        *result_generate.borrow_mut() = Some(InvoiceForm {
            client_name: client_input.value(),
            items: buffer_text_no_leak(&items_buffer),
        });
        dialog_generate.clone().hide();
    });

    dialog.set_callback(move |w| w.hide());

    dialog.show();
    super::run_dialog(&dialog);

    result.borrow_mut().take()
}
