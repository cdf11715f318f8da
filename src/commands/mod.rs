mod config_cmd;
mod draft;
mod draft_file;
mod remote;
mod show;
pub mod status;
mod upload;

pub use config_cmd::ConfigCommand;
pub use draft::DraftCommand;
pub use show::ShowCommand;
