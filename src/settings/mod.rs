//! Settings come from a TOML file under `settings/`, picked by build profile
//! and overridable with `--settings`.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
