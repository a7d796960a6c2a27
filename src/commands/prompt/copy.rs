use console::style;
use copypasta::{ClipboardContext, ClipboardProvider};

use super::locate;
use crate::api::{HubError, HubResult, PromptHub};

/// Copy prompt content to clipboard.
pub fn run(hub: &PromptHub, reference: &str, file: &str) -> HubResult<()> {
    let prompt = locate(hub, reference, file)?;

    let mut clipboard = ClipboardContext::new().map_err(|e| HubError::Clipboard(e.to_string()))?;
    clipboard
        .set_contents(prompt.content)
        .map_err(|e| HubError::Clipboard(e.to_string()))?;

    println!("{} copied to clipboard", style("•").green().bold());
    Ok(())
}
