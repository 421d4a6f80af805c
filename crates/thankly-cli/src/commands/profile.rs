//! Profile, user search and sharing.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use thankly_application::SearchOutcome;
use thankly_core::profile::Avatar;

use super::Env;

pub async fn profile(
    env: &Env,
    fragment: Option<&str>,
    nickname: Option<&str>,
    avatar: Option<PathBuf>,
    clear_avatar: bool,
) -> Result<()> {
    let mut page = env.open_page(fragment)?;

    if let Some(nickname) = nickname {
        page.set_nickname(nickname)?;
    }
    if let Some(path) = avatar {
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        page.set_avatar(Avatar::from_bytes(&image_mime(&path), &bytes))?;
    }
    if clear_avatar {
        page.clear_avatar()?;
    }

    let profile = page.profile();
    println!("Nickname: {}", profile.nickname);
    println!("Journal:  {}", profile.identifier.to_fragment());
    match profile.avatar.as_ref().and_then(Avatar::decode_bytes) {
        Some(bytes) => println!("Avatar:   {} bytes", bytes.len()),
        None if profile.avatar.is_some() => println!("Avatar:   linked image"),
        None => println!("Avatar:   none"),
    }
    if let Some(updated) = profile.last_updated {
        println!("Updated:  {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }

    page.flush_directory().await;
    Ok(())
}

pub async fn search(env: &Env, fragment: Option<&str>, term: &str) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    let viewer = page.view().viewer.clone();
    let min = env.config.search.min_term_length;

    match env.app.user_search().search(term, &viewer).await {
        SearchOutcome::TooShort => bail!("Type at least {} characters to search", min),
        SearchOutcome::Superseded => {}
        SearchOutcome::Applied(found) if found.is_empty() => println!("No users found."),
        SearchOutcome::Applied(found) => {
            for entry in found {
                println!("{:<24} {}", entry.nickname, entry.identifier.to_fragment());
            }
        }
    }

    page.flush_directory().await;
    Ok(())
}

pub fn share(env: &Env) -> Result<()> {
    println!("{}", env.app.share_link()?);
    Ok(())
}

/// MIME type guessed from the file extension.
fn image_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}
