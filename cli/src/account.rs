//! signup, login, logout and status: the commands that manage the local
//! session file.

use anyhow::{Context, Result};
use chrono::Utc;
use hearth_core::{ClientSession, SessionContext, SessionStatus};

use crate::client::{ApiClient, SessionResponse};

fn remember(ctx: &SessionContext, server: &str, issued: SessionResponse) -> Result<()> {
    let session = ClientSession {
        token: issued.token,
        username: issued.username,
        server: server.to_string(),
        expires_at: issued.expires_at,
    };
    ctx.establish(&session)
        .with_context(|| format!("Failed to write {}", ctx.path().display()))?;
    println!(
        "Logged in as {} (session valid until {})",
        session.username,
        session.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

pub async fn signup(ctx: &SessionContext, server: &str, username: &str, password: &str) -> Result<()> {
    let issued = ApiClient::new(server).signup(username, password).await?;
    tracing::debug!(user_id = %issued.user_id, "signed up");
    remember(ctx, server, issued)
}

pub async fn login(ctx: &SessionContext, server: &str, username: &str, password: &str) -> Result<()> {
    let issued = ApiClient::new(server).login(username, password).await?;
    remember(ctx, server, issued)
}

pub async fn logout(ctx: &SessionContext) -> Result<()> {
    let session = match ctx.init(Utc::now())? {
        SessionStatus::Active(session) => session,
        SessionStatus::Expired | SessionStatus::Absent => {
            println!("Not logged in.");
            return Ok(());
        }
    };

    // Forget the token locally even if the server can't be reached
    let revoked = ApiClient::with_token(&session.server, &session.token)
        .logout()
        .await;
    ctx.teardown()?;

    if let Err(e) = revoked {
        tracing::warn!("Server did not revoke the session: {:#}", e);
    }
    println!("Logged out {}.", session.username);
    Ok(())
}

pub fn status(ctx: &SessionContext) -> Result<()> {
    match ctx.init(Utc::now())? {
        SessionStatus::Active(session) => println!(
            "Logged in as {} on {} until {}",
            session.username,
            session.server,
            session.expires_at.format("%Y-%m-%d %H:%M UTC")
        ),
        SessionStatus::Expired => println!("Session expired; run `hearth login` again."),
        SessionStatus::Absent => println!("Not logged in."),
    }
    Ok(())
}
