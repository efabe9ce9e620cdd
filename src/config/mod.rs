#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli::CliConfig;
pub use self::storage::LocalStorage;
