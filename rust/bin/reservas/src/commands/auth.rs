//! Login / logout / registration commands.

use std::path::Path;

use anyhow::Result;
use reservas_client::{Credentials, Notice, Registration};

use super::{fail, open, show};

/// Login and store the token pair in the context.
pub async fn login(
    username: &str,
    password: &str,
    config_path: &Path,
    context: Option<&str>,
) -> Result<()> {
    let client = open(config_path, context)?;
    client
        .login(&Credentials::new(username, password))
        .await
        .map_err(fail)?;
    show(&Notice::success(format!("Logged in as {}.", username)));
    Ok(())
}

/// Clear both tokens from the context.
pub fn logout(config_path: &Path, context: Option<&str>) -> Result<()> {
    let client = open(config_path, context)?;
    client.logout().map_err(fail)?;
    show(&Notice::success("Logged out."));
    Ok(())
}

pub async fn register(
    registration: Registration,
    config_path: &Path,
    context: Option<&str>,
) -> Result<()> {
    let client = open(config_path, context)?;
    client.register(&registration).await.map_err(fail)?;
    show(&Notice::success(format!(
        "User {} registered. You can now log in.",
        registration.username
    )));
    Ok(())
}

pub async fn refresh(config_path: &Path, context: Option<&str>) -> Result<()> {
    let client = open(config_path, context)?;
    client.refresh().await.map_err(fail)?;
    show(&Notice::success("Access token refreshed."));
    Ok(())
}

/// Print the groups of the logged-in account.
pub async fn whoami(config_path: &Path, context: Option<&str>, json: bool) -> Result<()> {
    let client = open(config_path, context)?;
    let user_type = client.user_type().await.map_err(fail)?;
    if json {
        println!("{}", serde_json::json!({ "groups": user_type.groups }));
    } else if user_type.groups.is_empty() {
        println!("Groups: -");
    } else {
        println!("Groups: {}", user_type.groups.join(", "));
    }
    Ok(())
}
