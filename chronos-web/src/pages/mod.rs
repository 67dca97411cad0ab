pub mod game;
pub mod home;
pub mod login;
