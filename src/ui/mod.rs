//! Terminal implementations of the interaction and reporting capabilities

pub mod console;
pub mod prompts;

pub use console::ConsoleReporter;
pub use prompts::DialoguerInteraction;
