pub mod command_input;
pub mod confirm_dialog;
pub mod console_view;
pub mod last_game;
pub mod outcome_popup;
pub mod popup;
pub mod status_panel;

#[cfg(test)]
mod tests;
