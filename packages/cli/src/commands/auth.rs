use crate::context::Context;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lander_editor::{AuthError, AuthSession, Credentials};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long, env = "LANDER_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "LANDER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut auth = AuthSession::initialize(ctx.session_storage())?;
    let credentials = Credentials {
        email: args.email,
        password: args.password,
    };

    match auth.login(ctx.store.as_ref(), &credentials).await {
        Ok(()) => {
            println!(
                "  {} Logged in as {}",
                "✓".green(),
                auth.user_email().unwrap_or_default().bright_white()
            );
            Ok(())
        }
        Err(AuthError::InvalidCredentials) => {
            println!("  {} {}", "✗".red(), AuthError::InvalidCredentials);
            Err(AuthError::InvalidCredentials.into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn logout(ctx: &Context) -> Result<()> {
    let mut auth = AuthSession::initialize(ctx.session_storage())?;
    auth.logout()?;
    println!("  {} Logged out", "✓".green());
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let auth = AuthSession::initialize(ctx.session_storage())?;
    match auth.user_email() {
        Some(email) if auth.is_logged_in() => println!("{}", email),
        _ => println!("{}", "Not logged in".dimmed()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::memory_context_in;
    use lander_editor::SessionStorage;

    fn args(password: &str) -> LoginArgs {
        LoginArgs {
            email: "owner@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ctx) = memory_context_in(dir.path());

        login(args("secret"), &ctx).await.unwrap();
        let stored = ctx.session_storage().load().unwrap().unwrap();
        assert!(stored.is_logged_in);
        assert_eq!(stored.user_email.as_deref(), Some("owner@example.com"));
        whoami(&ctx).unwrap();

        logout(&ctx).unwrap();
        assert_eq!(ctx.session_storage().load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let (_, ctx) = memory_context_in(dir.path());

        let error = login(args("guess"), &ctx).await.unwrap_err();
        assert_eq!(error.downcast_ref::<AuthError>(), Some(&AuthError::InvalidCredentials));
        assert_eq!(ctx.session_storage().load().unwrap(), None);
    }
}
