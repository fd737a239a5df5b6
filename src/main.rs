// Entrypoint for the medication tracker CLI.
// - Keeps `main` small: create an API client and hand it to the UI loop.
// - Returns `anyhow::Result` so setup failures print cleanly.

use medtrack_cli::{api::AiClient, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // Create the AI client configured from `GEMINI_API_KEY` (and the
    // optional `GEMINI_MODEL` / `GEMINI_API_BASE` overrides).
    let ai = AiClient::from_env()?;

    // Start the interactive menu. This call blocks until the user exits,
    // saving the medication list on the way out.
    main_menu(&ai)?;
    Ok(())
}
