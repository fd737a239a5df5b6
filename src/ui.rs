// UI layer: the interactive menu for the medication tracker, built with
// `dialoguer`. The flows are small and synchronous; each one mutates the
// in-memory collection or calls the API client, never both at once.

use crate::api::{AiClient, AiReply};
use crate::store::{self, MedicationRecord};
use anyhow::Result;
use chrono::Local;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// System prompt used for the clinical summary feature.
const CLINICAL_SYSTEM_PROMPT: &str = "You are a specialized clinical pharmacist. \
     Provide one common side effect and one serious drug interaction \
     for the requested medication. Use two bullet points for clarity.";

/// How many of the most recent doses to show per medication. Storage is
/// unbounded; only the display is truncated.
const DOSE_HISTORY_SHOWN: usize = 3;

/// Main interactive menu. Loads the collection from disk, runs a select
/// loop until the user exits, and saves on the way out.
///
/// The record collection lives here and is passed by reference into the
/// store and the individual flows; there is no global state.
pub fn main_menu(ai: &AiClient) -> Result<()> {
    let data_path = store::data_file_path();
    let mut medications = match store::load(&data_path) {
        store::StoreLoad::Missing => {
            println!("Starting new session. No previous data found.");
            Vec::new()
        }
        store::StoreLoad::Corrupt => {
            eprintln!(
                "Warning: data file {} is corrupted or empty. Starting fresh.",
                data_path.display()
            );
            Vec::new()
        }
        store::StoreLoad::Records(records) => {
            println!("Loaded {} medication records.", records.len());
            records
        }
    };

    loop {
        let items = vec![
            "Add Medication",
            "View Medications",
            "Record Dose Taken",
            "Exit and Save Data",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_add(&mut medications, ai)?,
            1 => handle_view(&medications),
            2 => handle_record_dose(&mut medications)?,
            3 => {
                // Save failure keeps the in-memory state; only the
                // persistence step is lost.
                match store::save(&data_path, &medications) {
                    Ok(()) => println!("Data saved to {}.", data_path.display()),
                    Err(e) => eprintln!("Error: could not save data: {}", e),
                }
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Collect details for a new medication, append it to the collection,
/// and optionally fetch an AI clinical summary for it.
fn handle_add(medications: &mut Vec<MedicationRecord>, ai: &AiClient) -> Result<()> {
    let name: String = Input::new()
        .with_prompt("Medication name")
        .interact_text()?;
    if name.trim().is_empty() {
        println!("Medication name cannot be empty. Canceled.");
        return Ok(());
    }
    let dosage: String = Input::new()
        .with_prompt("Dosage (e.g., 200mg)")
        .allow_empty(true)
        .interact_text()?;
    let frequency: String = Input::new()
        .with_prompt("Frequency (e.g., once daily)")
        .allow_empty(true)
        .interact_text()?;

    let added_date = Local::now().format("%Y-%m-%d").to_string();
    let record = MedicationRecord::new(
        name.trim().to_string(),
        dosage.trim().to_string(),
        frequency.trim().to_string(),
        added_date,
    );
    let med_name = record.name.clone();
    medications.push(record);
    println!("'{}' added successfully!", med_name);

    let want_summary = Confirm::new()
        .with_prompt("Would you like an AI clinical summary for this medication?")
        .default(false)
        .interact()?;
    if want_summary {
        let query = format!("Provide clinical details for the medication: {}.", med_name);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        spinner.set_message("Connecting to AI for clinical data...");
        let reply = ai.generate(&query, Some(CLINICAL_SYSTEM_PROMPT));
        spinner.finish_and_clear();

        println!("\n--- AI Clinical Summary ---");
        match reply {
            AiReply::Text(text) => println!("{}", text),
            AiReply::Exhausted => {
                println!("Failed to connect to the AI service after multiple retries.")
            }
            AiReply::Malformed => {
                println!("An error occurred while parsing the AI's response.")
            }
        }
        println!("---------------------------");
    }
    Ok(())
}

/// Print every medication with its most recent doses, newest first.
fn handle_view(medications: &[MedicationRecord]) {
    println!("\n--- Current Medications & History ---");
    if medications.is_empty() {
        println!("Your medication list is currently empty.");
        return;
    }
    for (i, med) in medications.iter().enumerate() {
        println!("--- Record {} ({}) ---", i + 1, med.name);
        println!("Dosage: {}", med.dosage);
        println!("Frequency: {}", med.frequency);
        println!("Added: {}", med.added_date);
        println!("Doses taken ({} total):", med.doses_taken.len());
        if med.doses_taken.is_empty() {
            println!("  - No doses recorded yet.");
        } else {
            for dose_time in med.doses_taken.iter().rev().take(DOSE_HISTORY_SHOWN) {
                println!("  - {}", dose_time);
            }
        }
    }
    println!("-------------------------------------");
}

/// Pick a medication and append a dose timestamp for right now.
fn handle_record_dose(medications: &mut [MedicationRecord]) -> Result<()> {
    if medications.is_empty() {
        println!("Cannot record a dose. Please add a medication first.");
        return Ok(());
    }

    let labels: Vec<String> = medications
        .iter()
        .map(|m| format!("{} ({}, {})", m.name, m.dosage, m.frequency))
        .collect();
    let choice = Select::new()
        .with_prompt("Which medication was taken?")
        .items(&labels)
        .default(0)
        .interact()?;

    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    medications[choice].record_dose(now.clone());
    println!(
        "Dose of '{}' recorded successfully at {}.",
        medications[choice].name, now
    );
    Ok(())
}
