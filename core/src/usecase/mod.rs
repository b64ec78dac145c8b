pub mod elapsed;
pub mod history;
mod history_test;
pub mod views;
