use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use invite_core::calendar::{generate_ics, ics_filename};
use invite_core::page::render_page;
use invite_core::Invitation;
use owo_colors::OwoColorize;

/// Write the page (and the `.ics` it links to) or print the page to stdout.
pub fn run(invitation: &Invitation, out: Option<&Path>) -> Result<()> {
    let html = render_page(invitation)?;

    let Some(out) = out else {
        print!("{}", html);
        return Ok(());
    };

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }

    std::fs::write(out, &html).with_context(|| format!("Could not write {}", out.display()))?;

    let ics_path = out
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(ics_filename(invitation));
    let ics = generate_ics(invitation, Utc::now())?;
    std::fs::write(&ics_path, ics)
        .with_context(|| format!("Could not write {}", ics_path.display()))?;

    println!("{} {}", "Wrote".green(), out.display());
    println!("{} {}", "Wrote".green(), ics_path.display());

    Ok(())
}
