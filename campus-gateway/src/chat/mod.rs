pub mod history;

pub use history::build_history_messages;
