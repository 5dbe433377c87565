//! Task command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use taskdeck_core::api::ApiClient;
use taskdeck_core::api::tasks::Task;
use taskdeck_core::screens::HomeScreen;
use taskdeck_core::session::Session;

use super::finish;

/// Opens the home screen: guard, then the initial load.
async fn open(client: ApiClient, session: Session) -> Result<HomeScreen> {
    let mut home = HomeScreen::new(client, session);
    let outcome = home.enter().await?;
    if let Some(route) = &outcome.navigate {
        bail!("Not logged in. Run: {}", route.command_hint());
    }
    if outcome.is_error() {
        finish(&outcome)?;
    }
    Ok(home)
}

fn print_task(task: &Task) {
    println!("{}  {}", task.id, task.title);
    for line in task.description.lines() {
        println!("    {line}");
    }
}

pub async fn list(client: ApiClient, session: Session) -> Result<()> {
    let home = open(client, session).await?;
    if home.tasks().is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for task in home.tasks() {
        print_task(task);
    }
    Ok(())
}

pub async fn add(client: ApiClient, session: Session, title: &str, description: &str) -> Result<()> {
    let mut home = open(client, session).await?;
    let outcome = home.save_task(None, title, description).await;
    finish(&outcome)
}

pub async fn edit(
    client: ApiClient,
    session: Session,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    if title.is_none() && description.is_none() {
        bail!("Nothing to change: pass --title and/or --description");
    }

    let mut home = open(client, session).await?;
    let Some(current) = home.find(id) else {
        bail!("No task with id {id}");
    };

    // Omitted fields keep the values from the form's prefill.
    let title = title.map_or_else(|| current.title.clone(), str::to_string);
    let description = description.map_or_else(|| current.description.clone(), str::to_string);

    let outcome = home.save_task(Some(id), &title, &description).await;
    finish(&outcome)
}

pub async fn delete(client: ApiClient, session: Session, id: &str, yes: bool) -> Result<()> {
    let mut home = open(client, session).await?;
    let Some(task) = home.find(id) else {
        bail!("No task with id {id}");
    };

    if !yes && !confirm(&format!("Delete \"{}\"? [y/N] ", task.title))? {
        println!("Delete cancelled.");
        return Ok(());
    }

    let outcome = home.delete_task(id).await;
    finish(&outcome)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
