pub mod file_config_adapter;
pub mod http_quote_adapter;
pub mod sqlite_adapter;
pub mod web;
