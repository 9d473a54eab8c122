use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    button::Button,
    enums::{Align, CallbackTrigger},
    frame::Frame,
    group::Flex,
    input::Input,
    prelude::*,
    window::Window,
};

const FIELD_HEIGHT: i32 = 30;
const LABEL_HEIGHT: i32 = 22;

/// Modal form of labelled single-line inputs with a Save button.
/// Returns the field values in order, or `None` if the dialog was closed.
fn show_field_form(title: &str, fields: &[(&str, &str)]) -> Option<Vec<String>> {
    let height = 20 + fields.len() as i32 * (LABEL_HEIGHT + FIELD_HEIGHT + 10) + 45;
    let mut dialog = Window::default()
        .with_size(380, height)
        .with_label(title)
        .center_screen();
    dialog.make_modal(true);

    let mut flex = Flex::new(10, 10, 360, height - 20, None);
    flex.set_type(fltk::group::FlexType::Column);
    flex.set_spacing(5);

    let mut inputs = Vec::with_capacity(fields.len());
    for (label, value) in fields {
        let label_frame = Frame::default()
            .with_label(label)
            .with_align(Align::Left | Align::Inside);
        flex.fixed(&label_frame, LABEL_HEIGHT);
        let mut input = Input::default();
        input.set_value(value);
        flex.fixed(&input, FIELD_HEIGHT);
        inputs.push(input);
    }

    let mut save_btn = Button::default().with_label("Save");
    flex.fixed(&save_btn, 35);

    flex.end();
    dialog.end();

    let result: Rc<RefCell<Option<Vec<String>>>> = Rc::new(RefCell::new(None));

    let result_save = result.clone();
    let dialog_save = dialog.clone();
    let inputs_save = inputs.clone();
    save_btn.set_callback(move |_| {
        let values: Vec<String> = inputs_save.iter().map(|i| i.value()).collect();
        *result_save.borrow_mut() = Some(values);
        dialog_save.clone().hide();
    });

    // Enter in the last field saves
    if let Some(last) = inputs.last_mut() {
        let mut save_btn2 = save_btn.clone();
        last.set_trigger(CallbackTrigger::EnterKey);
        last.set_callback(move |_| save_btn2.do_callback());
    }

    dialog.set_callback(move |w| w.hide());

    dialog.show();
    super::run_dialog(&dialog);

    result.borrow_mut().take()
}

pub fn show_llm_config_dialog(current_key: &str) -> Option<String> {
    let mut values = show_field_form("Configure LLM", &[("LLM API Key:", current_key)])?;
    values.pop()
}

pub fn show_telegram_config_dialog(token: &str, chat_id: &str) -> Option<(String, String)> {
    let values = show_field_form(
        "Configure Telegram",
        &[("Telegram Bot Token:", token), ("Chat ID:", chat_id)],
    )?;
    let mut values = values.into_iter();
    Some((values.next()?, values.next()?))
}
