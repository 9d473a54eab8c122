use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    draw,
    enums::{Align, Color, Event, Font},
    prelude::*,
    widget::Widget,
};

use crate::app::domain::document::{Document, DocumentId};
use crate::app::domain::messages::Message;
use crate::ui::theme::Palette;

pub const TAB_BAR_HEIGHT: i32 = 30;

const MIN_TAB_WIDTH: i32 = 60;
const MAX_TAB_WIDTH: i32 = 200;
const CLOSE_BTN_SIZE: i32 = 14;
const CLOSE_BTN_MARGIN: i32 = 6;
const TAB_H_PADDING: i32 = 10;
const CORNER_RADIUS: i32 = 6;
const TAB_GAP: i32 = 1;
const PLUS_BTN_WIDTH: i32 = 28;
const PLUS_BTN_MARGIN: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
struct TabInfo {
    id: DocumentId,
    title: String,
    is_dirty: bool,
    is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TabSlot {
    x: i32,
    width: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitResult {
    Tab { index: usize, is_close: bool },
    PlusButton,
    None,
}

struct TabBarState {
    tabs: Vec<TabInfo>,
    slots: Vec<TabSlot>,
    plus_x: i32,
    palette: Palette,
    hover_tab_index: Option<usize>,
    hover_close: bool,
    hover_plus: bool,
    sender: Sender<Message>,
}

/// Custom-drawn strip of document tabs with close buttons and a "+" button.
pub struct TabBar {
    pub widget: Widget,
    state: Rc<RefCell<TabBarState>>,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32, sender: Sender<Message>, palette: Palette) -> Self {
        let state = Rc::new(RefCell::new(TabBarState {
            tabs: Vec::new(),
            slots: Vec::new(),
            plus_x: PLUS_BTN_MARGIN,
            palette,
            hover_tab_index: None,
            hover_close: false,
            hover_plus: false,
            sender,
        }));

        let mut widget = Widget::new(x, y, w, TAB_BAR_HEIGHT, None);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_tab_bar(wid, &st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_tab_bar(wid, event, &handle_state));

        Self { widget, state }
    }

    /// Refresh from the session's documents. Skips the redraw when nothing
    /// visible changed.
    pub fn rebuild(&mut self, documents: &[Document], active_id: Option<DocumentId>) {
        let tabs: Vec<TabInfo> = documents
            .iter()
            .map(|doc| TabInfo {
                id: doc.id,
                title: doc.title.clone(),
                is_dirty: doc.is_dirty(),
                is_active: active_id == Some(doc.id),
            })
            .collect();

        let mut st = self.state.borrow_mut();
        let widget_w = self.widget.w();
        let (slots, plus_x) = compute_layout(tabs.len(), widget_w);
        if st.tabs == tabs && st.slots == slots {
            return;
        }
        st.tabs = tabs;
        st.slots = slots;
        st.plus_x = plus_x;
        st.hover_tab_index = None;
        st.hover_close = false;
        drop(st);
        self.widget.redraw();
    }
}

// --- Layout computation ---

/// Evenly sized tab slots followed by the plus button's x offset.
fn compute_layout(tab_count: usize, widget_w: i32) -> (Vec<TabSlot>, i32) {
    if tab_count == 0 {
        return (Vec::new(), PLUS_BTN_MARGIN);
    }
    let count = tab_count as i32;
    let fixed_width = PLUS_BTN_WIDTH + PLUS_BTN_MARGIN + TAB_GAP * (count - 1);
    let tab_width = ((widget_w - fixed_width) / count).clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);

    let mut cursor_x = 0;
    let slots = (0..tab_count)
        .map(|_| {
            let slot = TabSlot { x: cursor_x, width: tab_width };
            cursor_x += tab_width + TAB_GAP;
            slot
        })
        .collect();
    (slots, cursor_x + PLUS_BTN_MARGIN)
}

// --- Hit-testing ---

fn hit_test(slots: &[TabSlot], plus_x: i32, wy: i32, mx: i32, my: i32) -> HitResult {
    if my < wy || my >= wy + TAB_BAR_HEIGHT {
        return HitResult::None;
    }

    for (index, slot) in slots.iter().enumerate() {
        if mx >= slot.x && mx < slot.x + slot.width {
            let close_x = slot.x + slot.width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
            let close_y = wy + (TAB_BAR_HEIGHT - CLOSE_BTN_SIZE) / 2;
            let is_close = mx >= close_x
                && mx <= close_x + CLOSE_BTN_SIZE
                && my >= close_y
                && my <= close_y + CLOSE_BTN_SIZE;
            return HitResult::Tab { index, is_close };
        }
    }
    if mx >= plus_x && mx < plus_x + PLUS_BTN_WIDTH {
        return HitResult::PlusButton;
    }
    HitResult::None
}

// --- Truncation ---

fn truncate_to_fit(text: &str, max_width: i32) -> String {
    if max_width <= 0 {
        return String::new();
    }
    draw::set_font(Font::Helvetica, 12);
    let (tw, _) = draw::measure(text, true);
    if tw <= max_width {
        return text.to_string();
    }

    let ellipsis = "...";
    let (ew, _) = draw::measure(ellipsis, true);
    if ew >= max_width {
        return ellipsis.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    for len in (1..chars.len()).rev() {
        let candidate: String = chars[..len].iter().collect();
        let full = format!("{candidate}{ellipsis}");
        let (fw, _) = draw::measure(&full, true);
        if fw <= max_width {
            return full;
        }
    }
    ellipsis.to_string()
}

// --- Drawing ---

fn draw_rounded_top_rect(x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
    draw::set_draw_color(color);
    draw::draw_rectf(x, y + r, w, h - r);
    draw::draw_rectf(x + r, y, w - 2 * r, r);
    draw::draw_pie(x, y, 2 * r, 2 * r, 90.0, 180.0);
    draw::draw_pie(x + w - 2 * r, y, 2 * r, 2 * r, 0.0, 90.0);
}

fn draw_tab_bar(wid: &Widget, st: &TabBarState) {
    let wx = wid.x();
    let wy = wid.y();
    let wh = wid.h();
    let palette = &st.palette;

    draw::set_draw_color(palette.window);
    draw::draw_rectf(wx, wy, wid.w(), wh);

    for (index, (tab, slot)) in st.tabs.iter().zip(&st.slots).enumerate() {
        let tx = wx + slot.x;

        if tab.is_active {
            draw_rounded_top_rect(tx, wy, slot.width, wh, CORNER_RADIUS, palette.editor_bg);
        } else {
            draw_rounded_top_rect(tx, wy + 2, slot.width, wh - 2, CORNER_RADIUS, palette.menu_bg);
        }

        let label = if tab.is_dirty {
            format!("\u{25cf} {}", tab.title)
        } else {
            tab.title.clone()
        };
        let text_area_width = slot.width - TAB_H_PADDING - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE - TAB_H_PADDING;
        let display_text = truncate_to_fit(&label, text_area_width);

        draw::set_draw_color(palette.menu_fg);
        draw::set_font(Font::Helvetica, 12);
        draw::draw_text(&display_text, tx + TAB_H_PADDING, wy + (wh + 12) / 2);

        let close_x = tx + slot.width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
        let close_y = wy + (wh - CLOSE_BTN_SIZE) / 2;
        if st.hover_tab_index == Some(index) && st.hover_close {
            draw::set_draw_color(palette.menu_selected);
            draw::draw_rectf(close_x - 2, close_y - 2, CLOSE_BTN_SIZE + 4, CLOSE_BTN_SIZE + 4);
        }
        draw::set_draw_color(palette.menu_fg);
        draw::set_font(Font::HelveticaBold, 20);
        draw::draw_text2("\u{00d7}", close_x, close_y, CLOSE_BTN_SIZE, CLOSE_BTN_SIZE, Align::Center);
    }

    let px = wx + st.plus_x;
    let bg = if st.hover_plus { palette.menu_selected } else { palette.menu_bg };
    draw_rounded_top_rect(px, wy + 2, PLUS_BTN_WIDTH, wh - 4, CORNER_RADIUS, bg);
    draw::set_draw_color(palette.menu_fg);
    draw::set_font(Font::HelveticaBold, 16);
    draw::draw_text2("+", px, wy + 2, PLUS_BTN_WIDTH, wh - 4, Align::Center);
}

// --- Events ---

fn handle_tab_bar(wid: &mut Widget, event: Event, state: &Rc<RefCell<TabBarState>>) -> bool {
    match event {
        Event::Push => {
            let st = state.borrow();
            let mx = fltk::app::event_x() - wid.x();
            let my = fltk::app::event_y();
            let button = fltk::app::event_button();
            let sender = st.sender;

            match hit_test(&st.slots, st.plus_x, wid.y(), mx, my) {
                HitResult::PlusButton if button == 1 => {
                    sender.send(Message::FileNew);
                    true
                }
                HitResult::Tab { index, is_close } => {
                    let tab_id = st.tabs[index].id;
                    // Middle click closes, like a browser.
                    if button == 2 || (button == 1 && is_close) {
                        sender.send(Message::TabClose(tab_id));
                    } else if button == 1 {
                        sender.send(Message::TabSwitch(tab_id));
                    }
                    true
                }
                _ => false,
            }
        }
        Event::Move => {
            let mut st = state.borrow_mut();
            let mx = fltk::app::event_x() - wid.x();
            let my = fltk::app::event_y();

            let (new_hover, new_close, new_plus) = match hit_test(&st.slots, st.plus_x, wid.y(), mx, my) {
                HitResult::Tab { index, is_close } => (Some(index), is_close, false),
                HitResult::PlusButton => (None, false, true),
                HitResult::None => (None, false, false),
            };

            if new_hover != st.hover_tab_index || new_close != st.hover_close || new_plus != st.hover_plus {
                st.hover_tab_index = new_hover;
                st.hover_close = new_close;
                st.hover_plus = new_plus;
                drop(st);
                wid.redraw();
            }
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            if st.hover_tab_index.is_some() || st.hover_close || st.hover_plus {
                st.hover_tab_index = None;
                st.hover_close = false;
                st.hover_plus = false;
                drop(st);
                wid.redraw();
            }
            false
        }
        _ => false,
    }
}
