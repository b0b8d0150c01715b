use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidecraft::config::Config;
use slidecraft::deck::{DeckBuilder, DirectoryWriter};
use slidecraft::llm::{Provider, StructuringClient};
use slidecraft::models::{FileSource, UploadedFile};
use slidecraft::workflow::{
    FileSelection, JsonFilePreferences, StatusKind, SubmitOutcome, Workflow, WorkflowView,
};

#[derive(Parser)]
#[command(name = "slidecraft")]
#[command(about = "Turn free-form text into a PowerPoint deck with a language model")]
struct Args {
    /// Text to structure into slides
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the text from a file instead
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Template file (.pptx or .potx) to attach
    #[arg(long)]
    file: Option<PathBuf>,

    /// Provider to use: openai, anthropic or google. Remembered for next time.
    #[arg(long)]
    provider: Option<Provider>,

    /// API key for the provider. Remembered for next time.
    #[arg(long)]
    api_key: Option<String>,

    /// Directory the deck is saved into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the API key in plain text
    #[arg(long)]
    show_key: bool,

    /// Walk through the form step by step
    #[arg(long, short)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slidecraft=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    tracing::debug!(
        "Preferences at {}, decks saved to {}",
        config.preferences.path.display(),
        config.output.dir.display()
    );

    let preferences = JsonFilePreferences::open(&config.preferences.path)?;
    let client = StructuringClient::new(&config.llm)?;
    let deck = DeckBuilder::new(Arc::new(DirectoryWriter::new(&config.output.dir)));
    let workflow = Workflow::new(client, deck, Arc::new(preferences));

    if let Some(provider) = args.provider {
        workflow.set_provider(provider)?;
    }
    if let Some(key) = &args.api_key {
        workflow.set_credential(key.as_str())?;
    }
    if args.show_key {
        workflow.toggle_credential_visibility();
    }

    if args.interactive {
        return run_wizard(&workflow).await;
    }

    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };
    workflow.set_text(text.trim());

    if let Some(path) = &args.file {
        if let FileSelection::Rejected { alert } =
            workflow.file_selected(UploadedFile::from_path(path), FileSource::Picker)
        {
            anyhow::bail!(alert);
        }
    }

    if !workflow.can_submit() {
        anyhow::bail!(missing_inputs(&workflow.view()));
    }

    let outcome = workflow.submit().await;
    render(&workflow.view());

    match outcome {
        SubmitOutcome::Succeeded(report) => {
            println!("Saved to {}", report.path.display());
            Ok(())
        }
        SubmitOutcome::Failed(message) => Err(anyhow::anyhow!(message)),
        SubmitOutcome::Ignored | SubmitOutcome::Invalid => {
            anyhow::bail!("Presentation was not generated")
        }
    }
}

fn missing_inputs(view: &WorkflowView) -> String {
    let mut missing = Vec::new();
    if view.text.is_empty() {
        missing.push("text (--text or --text-file)");
    }
    if view.credential.is_empty() {
        missing.push("API key (--api-key)");
    }
    if view.file_name.is_none() {
        missing.push("template file (--file)");
    }
    format!("Missing {}", missing.join(", "))
}

fn render(view: &WorkflowView) {
    if !view.result_area_visible {
        return;
    }

    println!();
    for line in &view.status {
        let icon = match line.kind {
            StatusKind::Pending => "…",
            StatusKind::Success => "✔",
            StatusKind::Error => "✖",
        };
        println!("{icon} {}", line.message);
    }
    if let Some(result) = &view.result {
        println!("{}", result.summary());
    }
}

fn render_form(view: &WorkflowView) {
    println!();
    println!("Provider:  {}", view.provider);
    println!("API key:   {}", view.credential);
    match &view.file_name {
        Some(name) => println!("Template:  {name}"),
        None => println!("Template:  (drop or type a .pptx/.potx path)"),
    }
    println!("Text:      {} characters", view.text.chars().count());
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    println!("{label}");
    Ok(lines
        .next_line()
        .await?
        .map(|line| line.trim().to_string())
        .unwrap_or_default())
}

/// Terminals paste a dragged file as a quoted path.
fn dropped_or_typed(input: &str) -> (String, FileSource) {
    for quote in ['\'', '"'] {
        if let Some(inner) = input
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return (inner.to_string(), FileSource::Drop);
        }
    }
    (input.to_string(), FileSource::Picker)
}

async fn run_wizard(workflow: &Workflow) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("Paste your text. Finish with a line containing only '.'");
        let mut text = Vec::new();
        while let Some(line) = lines.next_line().await? {
            if line.trim() == "." {
                break;
            }
            text.push(line);
        }
        workflow.set_text(text.join("\n").trim());

        let view = workflow.view();
        let answer = prompt(
            &mut lines,
            &format!("Provider [openai/anthropic/google] ({}):", view.provider),
        )
        .await?;
        if !answer.is_empty() {
            match answer.parse::<Provider>() {
                Ok(provider) => workflow.set_provider(provider)?,
                Err(e) => println!("{e}"),
            }
        }

        let answer = prompt(&mut lines, "API key (enter keeps the saved key):").await?;
        if !answer.is_empty() {
            workflow.set_credential(answer)?;
        }

        loop {
            if workflow.view().file_name.is_none() {
                let answer = prompt(&mut lines, "Template file (.pptx or .potx):").await?;
                if answer.is_empty() {
                    break;
                }
                let (path, source) = dropped_or_typed(&answer);
                if let FileSelection::Rejected { alert } =
                    workflow.file_selected(UploadedFile::from_path(path), source)
                {
                    println!("{alert}");
                }
                continue;
            }

            let view = workflow.view();
            render_form(&view);
            if !view.submit_enabled {
                println!("{}", missing_inputs(&view));
                break;
            }

            let answer = prompt(
                &mut lines,
                &format!(
                    "{}? [Y]es / [k] toggle key / [r]emove template",
                    view.submit_label
                ),
            )
            .await?;
            match answer.to_lowercase().as_str() {
                "k" => {
                    workflow.toggle_credential_visibility();
                }
                "r" => {
                    workflow.file_cleared();
                }
                _ => {
                    let outcome = workflow.submit().await;
                    render(&workflow.view());
                    if let SubmitOutcome::Succeeded(report) = outcome {
                        println!("Saved to {}", report.path.display());
                    }
                    break;
                }
            }
        }

        let answer = prompt(&mut lines, "Start over? [y/N]").await?;
        if !answer.eq_ignore_ascii_case("y") {
            return Ok(());
        }
        workflow.reset();
    }
}
