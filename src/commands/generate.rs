use std::future::Future;

use spinners::{Spinner, Spinners};

use crate::api::{ChatRequest, HubResult, PromptHub};

/// Send free text to the configured model and print the reply.
pub async fn run(hub: &PromptHub, text: &str, model: Option<String>) -> HubResult<()> {
    let generator = hub.generator()?;
    match model {
        Some(model) => {
            let request = ChatRequest {
                model: Some(model),
                ..ChatRequest::user(text)
            };
            with_spinner(generator.complete(request)).await
        }
        None => with_spinner(generator.generate(text)).await,
    }
}

pub(crate) async fn with_spinner<F>(completion: F) -> HubResult<()>
where
    F: Future<Output = HubResult<String>>,
{
    let mut sp = Spinner::new(Spinners::Dots9, "Waiting for LLM response...".into());
    match completion.await {
        Ok(result) => {
            sp.stop_with_message("✔ Response received.".into());
            println!("\n{}", result);
            Ok(())
        }
        Err(e) => {
            sp.stop_with_message("✖ Request failed.".into());
            Err(e)
        }
    }
}
