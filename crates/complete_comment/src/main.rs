use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;

use complete_comment::config::AppConfig;
use complete_comment::{run, Outcome};
use completion_client::OpenAiCompleter;

fn main() -> Result<()> {
    // A local .env never overrides variables that are already set.
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("complete_comment")
        .version("0.1.0")
        .about("Replaces the first `// AI: ...` comment in a JavaScript file with a completion")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JavaScript file to rewrite in place"),
        )
        .get_matches();

    // Checked before any file is opened.
    let config = AppConfig::from_env()?;

    let Some(path) = matches.get_one::<PathBuf>("file") else {
        println!("No file given. Usage: complete_comment <FILE>");
        return Ok(());
    };
    println!("Running on {}", path.display());

    let completer = OpenAiCompleter::new(config.token, config.completion)
        .context("Failed to build the completion client")?;
    let settings = completer.settings();
    log::debug!(
        "completion endpoint {} (model {}, max_tokens {}, timeout {:?})",
        settings.completions_url(),
        settings.model,
        settings.max_tokens,
        settings.timeout
    );

    match run(path, &completer)? {
        Outcome::NothingToDo => println!("No comments found"),
        Outcome::Updated { prompt, completion } => {
            log::info!("{:?} -> {} byte(s) of completion", prompt, completion.len());
            println!("Updated file");
        }
    }

    Ok(())
}
