pub mod controller;
pub mod state;

use colored::*;

pub use controller::PageController;
pub use state::PageState;

pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download image. Please try again.";

/// Blocking user-facing notification.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints alerts to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", "✖".red().bold(), message.red());
    }
}
