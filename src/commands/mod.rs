use console::style;

use crate::api::{HubResult, PromptHub, Repository};
use crate::cli::{Cmd, PromptCmd, RepoCmd};
use crate::core::utils::parse_repo_ref;

pub mod auth;
pub mod fork;
pub mod generate;
pub mod list;
pub mod prompt;
pub mod repo;
pub mod search;
pub mod show;
pub mod star;
pub mod stats;

/// Dispatches the parsed command to the appropriate handler.
pub async fn dispatch(command: Cmd, hub: &PromptHub) -> HubResult<()> {
    match command {
        Cmd::Signup { email, username } => auth::signup(hub, email, username),
        Cmd::Login { email } => auth::login(hub, email),
        Cmd::Logout => auth::logout(hub),
        Cmd::Whoami => auth::whoami(hub),
        Cmd::List => list::run(hub),
        Cmd::Search {
            query,
            category,
            sort,
        } => search::run(hub, &query, category.as_deref(), &sort),
        Cmd::Show { repo } => show::run(hub, &repo),
        Cmd::Star { repo } => star::star(hub, &repo),
        Cmd::Unstar { repo } => star::unstar(hub, &repo),
        Cmd::Fork { repo } => fork::run(hub, &repo),
        Cmd::Stats => stats::run(hub),
        Cmd::Generate { text, model } => generate::run(hub, &text, model).await,
        Cmd::Repo(repo_cmd) => match repo_cmd {
            RepoCmd::New => repo::new::run(hub),
            RepoCmd::Export { repo, out, format } => repo::export::run(hub, &repo, &out, format),
            RepoCmd::Recount { repo } => repo::recount::run(hub, &repo),
        },
        Cmd::Prompt(prompt_cmd) => match prompt_cmd {
            PromptCmd::New { repo } => prompt::new::run(hub, &repo),
            PromptCmd::List { repo } => prompt::list::run(hub, &repo),
            PromptCmd::Get { repo, file } => prompt::get::run(hub, &repo, &file),
            PromptCmd::Edit { repo, file } => prompt::edit::run(hub, &repo, &file),
            PromptCmd::Delete { repo, file } => prompt::delete::run(hub, &repo, &file),
            PromptCmd::Copy { repo, file } => prompt::copy::run(hub, &repo, &file),
            PromptCmd::Render { repo, file, vars } => prompt::render::run(hub, &repo, &file, &vars),
            PromptCmd::Run {
                repo,
                file,
                vars,
                model,
            } => prompt::run::run(hub, &repo, &file, &vars, model).await,
        },
    }
}

/// Resolves an `owner/name` argument.
pub(crate) fn resolve(hub: &PromptHub, reference: &str) -> HubResult<Repository> {
    let (owner, name) = parse_repo_ref(reference)?;
    hub.resolve(owner, name)
}

/// One-line summary used by `list` and `search`.
pub(crate) fn print_repository_line(repo: &Repository) {
    let visibility = if repo.is_private {
        style(" private").red().to_string()
    } else {
        String::new()
    };
    let star_marker = match repo.is_starred {
        Some(true) => style("★").yellow().to_string(),
        _ => "☆".to_string(),
    };
    println!(
        "  {} {}{} {} {}  ⑂ {}",
        style("•").green(),
        style(repo.full_name()).yellow(),
        visibility,
        star_marker,
        repo.stars_count,
        repo.forks_count
    );
    if !repo.description.is_empty() {
        println!("      {}", repo.description);
    }
    if !repo.tags.is_empty() {
        println!("      {}", style(format!("#{}", repo.tags.join(" #"))).dim());
    }
}
