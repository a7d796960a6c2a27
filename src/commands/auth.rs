use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::api::{HubResult, PromptHub};

fn ask_email(theme: &ColorfulTheme, email: Option<String>) -> HubResult<String> {
    match email {
        Some(email) => Ok(email),
        None => Ok(Input::with_theme(theme)
            .with_prompt("Email")
            .interact_text()?),
    }
}

/// Create an account and sign in.
pub fn signup(hub: &PromptHub, email: Option<String>, username: Option<String>) -> HubResult<()> {
    let theme = ColorfulTheme::default();
    let email = ask_email(&theme, email)?;
    let username = match username {
        Some(name) => name,
        None => Input::with_theme(&theme)
            .with_prompt("Username (optional)")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let username = Some(username.as_str()).filter(|u| !u.trim().is_empty());
    let user = hub.sign_up(&email, &password, username)?;
    println!(
        "{} Signed up as {}",
        style("•").green().bold(),
        style(user.preferred_username().unwrap_or(user.email)).yellow()
    );
    Ok(())
}

/// Sign in with email and password.
pub fn login(hub: &PromptHub, email: Option<String>) -> HubResult<()> {
    let theme = ColorfulTheme::default();
    let email = ask_email(&theme, email)?;
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;

    let user = hub.sign_in(&email, &password)?;
    println!(
        "{} Signed in as {}",
        style("•").green().bold(),
        style(&user.email).yellow()
    );
    Ok(())
}

pub fn logout(hub: &PromptHub) -> HubResult<()> {
    hub.sign_out()?;
    println!("{} Signed out", style("•").green().bold());
    Ok(())
}

pub fn whoami(hub: &PromptHub) -> HubResult<()> {
    match hub.current_user()? {
        Some(user) => {
            let profile = hub.repositories().profile(&user.id)?;
            let username = profile
                .map(|p| p.username)
                .unwrap_or_else(|| "(no profile)".to_string());
            println!(
                "{} {} <{}>",
                style("•").green().bold(),
                style(username).yellow(),
                user.email
            );
        }
        None => println!("{}", style("Not signed in").yellow()),
    }
    Ok(())
}
