use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use invite_core::calendar::{export, export_all};
use invite_core::{CalendarExport, CalendarTarget, Invitation};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(invitation: &Invitation, target: Option<CalendarTarget>, out: Option<&Path>) -> Result<()> {
    let Some(target) = target else {
        if out.is_some() {
            anyhow::bail!(
                "--out needs a file target.\n\
                Use --target apple or --target ical to write the .ics file"
            );
        }

        let exports = export_all(invitation, Utc::now())?;
        for (i, export) in exports.iter().enumerate() {
            println!("{}", export.render());
            if i < exports.len() - 1 {
                println!();
            }
        }
        return Ok(());
    };

    match export(invitation, target, Utc::now())? {
        CalendarExport::Link { url, .. } => {
            if out.is_some() {
                anyhow::bail!("{} is a link, not a file; drop --out", target);
            }
            println!("{}", url);
        }
        CalendarExport::File {
            filename, contents, ..
        } => {
            let path = out.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(&filename));
            write_ics(&path, &contents)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }

    Ok(())
}

fn write_ics(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))
}
