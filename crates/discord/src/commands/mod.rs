//! Built-in commands shipped with the plugin.

mod help;

pub use help::HelpCommand;
