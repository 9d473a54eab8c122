pub mod dialogs;
pub mod file_dialogs;
pub mod fltk_surface;
pub mod main_window;
pub mod menu;
pub mod prompter;
pub mod tab_bar;
pub mod theme;
