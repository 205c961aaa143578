//! Interactive terminal front end for the conversation controller.

use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::{ConversationController, Incoming, Menu, Reply};
use crate::errors::Error;

const QUIT_COMMANDS: [&str; 3] = ["/quit", "/exit", "/q"];

fn display_welcome_message(user_id: i64, degraded: bool) {
    println!("{}", "\n🤖 AlfaPilot business assistant".bold().cyan());
    println!(
        "{}",
        format!("Chatting as user {}. Type /quit to leave.", user_id).yellow()
    );
    if degraded {
        println!(
            "{}",
            "⚠️  Demo mode: answers are canned examples, not real AI output.".yellow()
        );
    }
}

fn display_reply(reply: &Reply) {
    println!("\n{}", reply.text.green());
    if reply.menu != Menu::None {
        for row in reply.menu.rows() {
            let buttons: Vec<String> = row.iter().map(|b| format!("[{}]", b)).collect();
            println!("  {}", buttons.join(" ").dimmed());
        }
    }
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Working on it...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

async fn read_line() -> Result<String, Error> {
    tokio::task::spawn_blocking(|| {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("💬 You")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Terminal(e.to_string()))
    })
    .await
    .map_err(|e| Error::Terminal(format!("input task failed: {}", e)))?
}

/// Runs the chat loop until the user quits.
pub async fn run_chat(controller: Arc<ConversationController>, user_id: i64) -> Result<(), Error> {
    display_welcome_message(user_id, controller.tasks().client().is_degraded());
    for reply in controller.handle(Incoming::new(user_id, "/start")).await {
        display_reply(&reply);
    }

    loop {
        let text = read_line().await?;
        let text = text.trim();
        if QUIT_COMMANDS.contains(&text) {
            info!("chat session for user {} closed", user_id);
            println!("{}", "👋 Bye!".cyan());
            return Ok(());
        }

        let spinner = new_spinner();
        let replies = controller.handle(Incoming::new(user_id, text)).await;
        spinner.finish_and_clear();

        debug!("{} replies", replies.len());
        for reply in &replies {
            display_reply(reply);
        }
    }
}
