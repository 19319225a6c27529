pub mod handlers;
pub mod header;
pub mod history;
pub mod locale_switcher;
pub mod results;
pub mod upload_section;
pub mod utils;
