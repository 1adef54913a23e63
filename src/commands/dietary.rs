use anyhow::Result;
use invite_core::Invitation;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(invitation: &Invitation, query: Option<&str>) -> Result<()> {
    let matches = invitation.dietary.search(query.unwrap_or_default());

    if matches.is_empty() {
        println!("{}", "No dietary options found".dimmed());
        return Ok(());
    }

    for option in matches {
        println!("{}", option.render());
    }

    Ok(())
}
