// One-shot demo: ask the AI to explain a topic, print the paragraph,
// and optionally save it to a text file named after the topic.

use anyhow::Result;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use medtrack_cli::api::{AiClient, AiReply};

fn main() -> Result<()> {
    let ai = AiClient::from_env()?;

    let topic: String = Input::new()
        .with_prompt("Enter a topic for the AI to explain (e.g., 'deep sea')")
        .interact_text()?;
    let prompt = format!(
        "Write a single, simple, fun paragraph explaining why {} is interesting.",
        topic
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(format!("Generating an explanation for '{}'...", topic));
    let reply = ai.generate(&prompt, None);
    spinner.finish_and_clear();

    let text = match reply {
        AiReply::Text(text) => text,
        AiReply::Exhausted => {
            eprintln!("Failed to connect to the AI service after multiple retries.");
            return Ok(());
        }
        AiReply::Malformed => {
            eprintln!("An error occurred while parsing the AI's response.");
            return Ok(());
        }
    };

    println!("\n--- AI Explanation ---");
    println!("{}", text);
    println!("----------------------");

    let save = Confirm::new()
        .with_prompt("Save the explanation to a text file?")
        .default(true)
        .interact()?;
    if save {
        let filename = format!("{}_explanation.txt", topic.replace(' ', "_").to_lowercase());
        match std::fs::write(&filename, &text) {
            Ok(()) => println!("Explanation saved to {}", filename),
            Err(e) => eprintln!("Error: could not save {}: {}", filename, e),
        }
    }
    Ok(())
}
