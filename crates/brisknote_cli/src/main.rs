//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `brisknote_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use brisknote_core::CoreContext;

fn main() {
    println!("brisknote_core version={}", brisknote_core::core_version());

    // In-memory end-to-end probe: save one note through an edit session,
    // then read it back through the grouped feed.
    let settings_path = std::env::temp_dir().join("brisknote_cli_settings.json");
    let context = match CoreContext::open_in_memory(settings_path) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("core open failed: {err}");
            std::process::exit(1);
        }
    };

    let session = context.edit_session();
    session.set_title("probe");
    session.set_content("in-memory smoke note");
    if let Err(err) = session.save() {
        eprintln!("probe save failed: {err}");
        std::process::exit(1);
    }

    let feed = match context.note_feed() {
        Ok(feed) => feed,
        Err(err) => {
            eprintln!("feed init failed: {err}");
            std::process::exit(1);
        }
    };
    let groups = feed.displayed_groups().get();
    let notes: usize = groups.iter().map(|group| group.notes.len()).sum();
    println!("brisknote_core groups={} notes={notes}", groups.len());
}
