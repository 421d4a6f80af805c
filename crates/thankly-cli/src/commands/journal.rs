//! Journal page commands.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use thankly_application::JournalPage;
use thankly_core::IdentityState;
use thankly_core::journal::Appreciation;

use super::Env;

pub async fn open(env: &Env, fragment: Option<&str>) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    print_header(&page);
    let journal = page.journal();
    println!(
        "{} appreciations over {} days",
        journal.list().len(),
        journal.count_distinct_dates_with_entries()
    );
    page.flush_directory().await;
    Ok(())
}

pub async fn list(
    env: &Env,
    fragment: Option<&str>,
    date: Option<NaiveDate>,
    grep: Option<&str>,
) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    let journal = page.journal();

    let mut entries: Vec<&Appreciation> = match grep {
        Some(term) => journal.search_entries(term),
        None => journal.list().iter().collect(),
    };
    if let Some(date) = date {
        entries.retain(|a| a.date == date);
    }

    if entries.is_empty() {
        println!("No appreciations yet.");
    }
    for entry in entries {
        print_entry(entry);
    }
    page.flush_directory().await;
    Ok(())
}

pub async fn add(
    env: &Env,
    fragment: Option<&str>,
    date: Option<NaiveDate>,
    title: Option<&str>,
    text: &str,
) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    let date = date.unwrap_or_else(|| page.journal().today());
    let entry = page.journal_mut().add(Some(date), title, text)?;
    println!("Saved:");
    print_entry(&entry);
    page.flush_directory().await;
    Ok(())
}

pub async fn edit(
    env: &Env,
    fragment: Option<&str>,
    id: i64,
    title: Option<&str>,
    text: Option<&str>,
) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    let entry = page.journal_mut().update(id, title, text)?;
    println!("Updated:");
    print_entry(&entry);
    page.flush_directory().await;
    Ok(())
}

pub async fn remove(env: &Env, fragment: Option<&str>, id: i64) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    page.journal_mut().remove(id)?;
    println!("Removed {}", id);
    page.flush_directory().await;
    Ok(())
}

pub async fn stats(env: &Env, fragment: Option<&str>) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    print_header(&page);

    let journal = page.journal();
    let limits = page.tier().limits();
    let today = journal.today();
    let written_today = journal.count_for_date(today);

    match limits.max_appreciations_per_day {
        Some(max) => println!("Today:        {}/{}", written_today, max),
        None => println!("Today:        {}", written_today),
    }
    println!("Days written: {}", journal.count_distinct_dates_with_entries());
    println!("Total:        {}", journal.list().len());
    if let Some(days) = limits.data_retention_days {
        println!("Retention:    {} days", days);
    }
    println!(
        "Export: {}  Share: {}  Customize: {}",
        yes_no(limits.can_export),
        yes_no(limits.can_share),
        yes_no(limits.can_customize)
    );
    page.flush_directory().await;
    Ok(())
}

pub async fn export(env: &Env, fragment: Option<&str>, out: Option<PathBuf>) -> Result<()> {
    let mut page = env.open_page(fragment)?;
    let document = page.journal().export()?;

    match out {
        Some(path) => {
            std::fs::write(&path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} appreciations to {}", page.journal().list().len(), path.display());
        }
        None => println!("{}", document),
    }
    page.flush_directory().await;
    Ok(())
}

fn print_header(page: &JournalPage) {
    let profile = page.profile();
    match page.state() {
        IdentityState::ReadOnly { target, return_to } => {
            println!("{} ({}) - read only", profile.nickname, target.to_fragment());
            println!("Your own journal: {}", return_to.to_fragment());
        }
        _ => println!(
            "{} ({}) - {} account",
            profile.nickname,
            profile.identifier.to_fragment(),
            page.tier()
        ),
    }
}

fn print_entry(entry: &Appreciation) {
    match &entry.title {
        Some(title) if entry.text.is_empty() => println!("[{}] {}  {}", entry.id, entry.date, title),
        Some(title) => println!("[{}] {}  {}: {}", entry.id, entry.date, title, entry.text),
        None => println!("[{}] {}  {}", entry.id, entry.date, entry.text),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
