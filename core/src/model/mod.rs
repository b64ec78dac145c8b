pub mod entry;
pub mod event;
pub mod record;
pub mod store;
