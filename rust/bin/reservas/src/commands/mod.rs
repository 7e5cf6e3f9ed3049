pub mod auth;
pub mod context;
pub mod dashboard;
pub mod location;
pub mod reservation;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use reservas_client::{ApiClient, ApiError, Navigator, Notice, Routes, Tone};

use crate::config::{ClientConfig, ContextStore};

/// Turns navigation targets into next-step hints on stderr.
pub struct CliNavigator {
    routes: Routes,
}

impl CliNavigator {
    pub fn new(routes: Routes) -> Self {
        Self { routes }
    }

    fn hint(&self, path: &str) -> String {
        if path == self.routes.login {
            "Run `reservas login` to sign in.".to_string()
        } else if path == self.routes.owner_dashboard {
            "Next: `reservas dashboard`.".to_string()
        } else if path == self.routes.create_reservation {
            "Next: `reservas locations list`, then `reservas reservations create`.".to_string()
        } else {
            format!("Next: {}", path)
        }
    }
}

impl Navigator for CliNavigator {
    fn navigate(&self, path: &str) {
        eprintln!("{}", self.hint(path));
    }
}

/// Build a client bound to the selected (or current) context.
pub fn open(config_path: &Path, context: Option<&str>) -> Result<ApiClient> {
    let config = ClientConfig::load(config_path)?;
    let name = context.unwrap_or(&config.current_context);
    if name.is_empty() {
        anyhow::bail!("No current context. Run `reservas use context <name>`.");
    }
    let ctx = config
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))?;

    if ctx.server.is_empty() {
        anyhow::bail!(
            "No server URL set for context \"{}\". Run `reservas context set {} --server <url>`.",
            ctx.name,
            ctx.name
        );
    }

    let routes = Routes::default();
    let store = Arc::new(ContextStore::new(config_path, ctx.name.clone()));
    let navigator = Arc::new(CliNavigator::new(routes.clone()));
    Ok(ApiClient::new(ctx.server.clone(), store, navigator).with_routes(routes))
}

/// Convert a client error into the message shown to the user.
pub fn fail(err: ApiError) -> anyhow::Error {
    tracing::debug!("request failed: {:?}", err);
    anyhow::anyhow!(err.user_message())
}

/// Failure notice for an error that ended a command.
pub fn report(err: &anyhow::Error) -> Notice {
    Notice::failure(format!("{:#}", err))
}

pub fn show(notice: &Notice) {
    match notice.tone {
        Tone::Success => println!("{}", notice.text),
        Tone::Failure => eprintln!("error: {}", notice.text),
    }
}

/// Ask before a destructive action. `yes` skips the prompt.
pub fn confirm(question: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("{} [y/N]: ", question);
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_routes() {
        let nav = CliNavigator::new(Routes::default());
        assert!(nav.hint("/login/").contains("reservas login"));
        assert!(nav.hint("/owner/dashboard/").contains("reservas dashboard"));
        assert!(nav.hint("/reservations/new/").contains("reservations create"));
        assert_eq!(nav.hint("/elsewhere/"), "Next: /elsewhere/");
    }

    #[test]
    fn errors_become_failure_notices() {
        let notice = report(&fail(ApiError::LoginRequired));
        assert_eq!(notice.tone, Tone::Failure);
        assert_eq!(notice.text, "You need to be logged in.");

        let err = anyhow::anyhow!("Context \"dev\" not found.");
        assert!(report(&err).is_failure());
    }

    #[test]
    fn open_requires_a_server() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = ClientConfig::default();
        config.current_context = "dev".into();
        config.upsert_context(crate::config::Context {
            name: "dev".into(),
            ..Default::default()
        });
        config.save(&path).unwrap();

        let err = open(&path, None).err().unwrap();
        assert!(err.to_string().contains("No server URL"));
        assert!(open(&path, Some("other")).is_err());
    }
}
