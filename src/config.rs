use std::path::Path;

use anyhow::{Context, Result};
use invite_core::{Invitation, InvitationConfig};

/// Load and resolve the invitation, naming the file in any error.
pub fn load_invitation(path: Option<&Path>) -> Result<Invitation> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(InvitationConfig::default_path);
    tracing::debug!(path = %path.display(), "Loading invitation");

    Invitation::load(Some(&path))
        .with_context(|| format!("Failed to load invitation from {}", path.display()))
}
