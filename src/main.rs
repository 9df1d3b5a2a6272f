use colored::*;
use rgenart::logger::{self, LoggerConfig};
use rgenart::{
    ConsoleNotifier, GeneratedImage, ImageClient, Studio, StudioConfig, StudioError,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const BUSY_MESSAGE: &str = "⏳ Still generating, please wait.";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Key(String),
    Show,
    Hide,
    Requirement(String),
    Prompt,
    Generate,
    Gallery,
    Download(usize),
    DownloadAll,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line.trim(), ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "key" => Command::Key(rest.to_string()),
        "show" => Command::Show,
        "hide" => Command::Hide,
        "req" | "requirements" => Command::Requirement(rest.to_string()),
        "prompt" => Command::Prompt,
        "generate" | "gen" | "g" => Command::Generate,
        "gallery" | "ls" => Command::Gallery,
        "download" | "dl" => match rest.trim() {
            "all" => Command::DownloadAll,
            n => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Download(n),
                _ => Command::Unknown(line.to_string()),
            },
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  key <api key>       set the API key (kept in memory only)");
    println!("  show | hide         toggle showing the API key");
    println!("  req [text]          set extra requirements (empty clears them)");
    println!("  prompt              show the prompt that will be sent");
    println!("  generate            generate one image");
    println!("  gallery             list generated images, newest first");
    println!("  download <n> | all  save image n (or every image) to disk");
    println!("  status              show the form and request state");
    println!("  quit");
}

fn print_status(studio: &Studio) {
    let form = studio.form_snapshot();
    let key = if form.credential.is_empty() {
        "<not set>".to_string()
    } else {
        studio.credential_display()
    };
    let requirement = if form.requirement.trim().is_empty() {
        "<none>".to_string()
    } else {
        form.requirement.clone()
    };

    println!("API key:      {}", key);
    println!("Requirements: {}", requirement);
    println!("State:        {:?}", studio.phase());
    println!("Images:       {}", studio.len());
    println!("Saving to:    {}", studio.downloader().output_dir().display());
}

/// What the form prints once a generate command has run. Failures other
/// than a busy trigger were already shown by the notifier.
fn generation_status(
    studio: &Studio,
    outcome: &rgenart::Result<GeneratedImage>,
    show_colors: bool,
) -> Option<String> {
    match outcome {
        Ok(_) => studio.cards().first().map(|card| card.render(show_colors)),
        Err(StudioError::Busy) => Some(BUSY_MESSAGE.to_string()),
        Err(_) => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    let config = StudioConfig::from_env();
    logger::log_config_info(&config);

    let studio = Arc::new(Studio::new(
        &config,
        Arc::new(ImageClient::new(&config)),
        Arc::new(ConsoleNotifier::default()),
    ));

    println!("{}", "🎨 rgenart image studio".bold());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Empty => {}
            Command::Key(key) => {
                studio.set_credential(key);
                println!("API key: {}", studio.credential_display());
            }
            Command::Show => {
                studio.set_credential_visible(true);
                println!("API key: {}", studio.credential_display());
            }
            Command::Hide => {
                studio.set_credential_visible(false);
                println!("API key: {}", studio.credential_display());
            }
            Command::Requirement(text) => {
                studio.set_requirement(text);
                println!("Requirements updated.");
            }
            Command::Prompt => println!("{}", studio.prompt()),
            Command::Generate => {
                let studio = studio.clone();
                tokio::spawn(async move {
                    let outcome = studio.generate().await;
                    if let Some(line) = generation_status(&studio, &outcome, true) {
                        println!("{}", line);
                    }
                });
            }
            Command::Gallery => println!("{}", studio.render_gallery(true)),
            Command::Download(position) => {
                let studio = studio.clone();
                tokio::spawn(async move {
                    let _ = studio.download(position - 1).await;
                });
            }
            Command::DownloadAll => {
                let studio = studio.clone();
                tokio::spawn(async move {
                    let results = studio.download_all().await;
                    let saved = results.iter().filter(|r| r.is_ok()).count();
                    println!("Saved {} of {} images.", saved, results.len());
                });
            }
            Command::Status => print_status(&studio),
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Unknown(input) => {
                println!("Unknown command: {} (type `help`)", input.trim());
            }
        }
    }

    if studio.is_generating() {
        log::warn!("Leaving with a generation request still in flight");
    }

    Ok(())
}
