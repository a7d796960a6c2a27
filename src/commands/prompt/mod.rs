pub mod copy;
pub mod delete;
pub mod edit;
pub mod get;
pub mod list;
pub mod new;
pub mod render;
pub mod run;

use super::resolve;
use crate::api::{HubResult, PromptHub};
use crate::backend::Prompt;

/// Resolves `owner/name` and a prompt name or path inside it.
pub(crate) fn locate(hub: &PromptHub, reference: &str, file: &str) -> HubResult<Prompt> {
    let repo = resolve(hub, reference)?;
    hub.prompts().find_prompt(&repo.id, file)
}
