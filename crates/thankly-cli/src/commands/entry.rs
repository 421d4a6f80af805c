//! Entry flow: signup, login, logout.

use anyhow::Result;
use thankly_core::AccountTier;

use super::Env;
use super::journal;

pub async fn signup(env: &Env, fragment: Option<&str>, name: &str, registered: bool) -> Result<()> {
    if env.app.should_skip_entry_flow(fragment) {
        println!("A journal link was given; opening it instead of signing up.");
        return journal::open(env, fragment).await;
    }

    let tier = if registered {
        AccountTier::Registered
    } else {
        AccountTier::Guest
    };
    let identifier = env.app.sign_up(name, tier)?;

    println!("Welcome, {}! Your journal is {}", name.trim(), identifier.to_fragment());
    println!("Keep this identifier: it is the only way back to your journal.");
    journal::open(env, Some(&identifier.to_fragment())).await
}

pub async fn login(env: &Env, fragment: Option<&str>, identifier: &str) -> Result<()> {
    if env.app.should_skip_entry_flow(fragment) {
        println!("A journal link was given; opening it instead of logging in.");
        return journal::open(env, fragment).await;
    }

    let identifier = env.app.log_in(identifier)?;
    journal::open(env, Some(&identifier.to_fragment())).await
}

pub fn logout(env: &Env) -> Result<()> {
    env.app.log_out()?;
    println!("Logged out. Your journals are still stored on this machine.");
    Ok(())
}

pub fn journals(env: &Env) -> Result<()> {
    let identifiers = env.store.identifiers()?;
    if identifiers.is_empty() {
        println!("No journals stored in {}", env.paths.data_dir().display());
        return Ok(());
    }
    for identifier in identifiers {
        println!("{}", identifier.to_fragment());
    }
    Ok(())
}
