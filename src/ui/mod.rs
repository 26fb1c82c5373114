// UI module - command dispatch and the seams around it
//
// This module contains:
// - CommandId and the static menu table
// - Controller: dispatches commands between state, engine, dialogs and view
// - DialogService: native pickers and message boxes behind a trait
// - ViewHandle: refresh/reload seam to whatever renders the state

pub mod commands;
pub mod controller;
pub mod dialogs;
pub mod view;

pub use commands::{CommandId, MENU, MenuEntry, language_entries};
pub use controller::{Controller, Outcome};
pub use dialogs::{Confirmation, DialogService, FileFilter, NativeDialogs};
pub use view::ViewHandle;
