pub mod commands;
#[path = "handlers.rs"]
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{apply_site_args, default_log_level, expand_path, parse_base_url, profile_for_source};
