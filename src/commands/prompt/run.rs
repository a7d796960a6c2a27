use super::locate;
use crate::api::{ChatRequest, HubResult, PromptHub};
use crate::commands::generate::with_spinner;
use crate::core::template;
use crate::core::utils::parse_vars;

/// Execute a prompt with the configured model and print the response.
pub async fn run(
    hub: &PromptHub,
    reference: &str,
    file: &str,
    vars: &[String],
    model: Option<String>,
) -> HubResult<()> {
    let prompt = locate(hub, reference, file)?;
    let rendered = template::render(&prompt.content, &parse_vars(vars));
    let generator = hub.generator()?;

    let request = ChatRequest {
        model,
        ..ChatRequest::user(rendered)
    };
    with_spinner(generator.complete(request)).await
}
