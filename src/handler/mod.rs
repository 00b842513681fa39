pub mod admin_handler;
pub mod quote_handler;
pub mod system_handler;
