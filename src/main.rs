//! Kithab
//!
//! Desktop client for the Kithab course notes portal.
//!
//! This is the main entry point for the Dioxus Desktop application.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .pretty()
        .init();

    println!();
    println!("  📚 Kithab v{}", env!("CARGO_PKG_VERSION"));
    println!("  Course notes for students, faculty and administrators");
    println!();

    // Launch the Dioxus desktop application
    kithab_ui::launch();
}
