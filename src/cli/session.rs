//! Terminal drivers for login, logout and the current user.

use secrecy::SecretString;
use tokio::io::AsyncBufRead;

use super::prompt::{Prompter, Reply};
use crate::auth::{AuthActions, User};
use crate::error::CliError;

/// Prompt for credentials until a login succeeds or the user quits.
pub async fn run_login<R, W>(
    prompter: &mut Prompter<R, W>,
    actions: &AuthActions,
) -> Result<Option<User>, CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    loop {
        let email = match prompter.ask("Email").await? {
            Reply::Value(v) => v,
            Reply::Quit => return Ok(None),
            _ => String::new(),
        };
        let password = match prompter.ask("Password").await? {
            Reply::Value(v) => SecretString::from(v),
            Reply::Quit => return Ok(None),
            _ => SecretString::from(String::new()),
        };

        let result = actions.login(&email, &password).await;
        if result.success {
            let user = actions.store().read().await.state().auth.user.clone();
            if let Some(user) = &user {
                prompter.say(format!("Logged in as {} ({})", user.name, user.email))?;
            }
            return Ok(user);
        }
        prompter.say(format!(
            "  {}",
            result.error.as_deref().unwrap_or("Login failed")
        ))?;
    }
}

/// Log out and report the outcome.
pub async fn run_logout<R, W>(prompter: &mut Prompter<R, W>, actions: &AuthActions) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    let was_logged_in = actions.store().read().await.state().auth.is_authenticated();
    let result = actions.logout().await;
    match (was_logged_in, result.error) {
        (false, _) => prompter.say("Not logged in."),
        (true, None) => prompter.say("Logged out."),
        (true, Some(e)) => prompter.say(format!("Logged out locally ({e}).")),
    }
}

/// Print the signed-in user, refreshed from the API when possible.
pub async fn run_whoami<R, W>(prompter: &mut Prompter<R, W>, actions: &AuthActions) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    if !actions.store().read().await.state().auth.is_authenticated() {
        return prompter.say("Not logged in.");
    }
    match actions.refresh_current_user().await {
        Ok(user) => prompter.say(format!("{} <{}> ({})", user.name, user.email, user.role)),
        Err(e) => {
            let cached = actions.store().read().await.state().auth.user.clone();
            match cached {
                Some(user) => prompter.say(format!(
                    "{} <{}> ({}, cached: {})",
                    user.name,
                    user.email,
                    user.role,
                    e.user_message(crate::auth::actions::CURRENT_USER_FAILED)
                )),
                None => prompter.say("Not logged in."),
            }
        }
    }
}
