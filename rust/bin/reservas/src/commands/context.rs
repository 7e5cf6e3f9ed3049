//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// Create a new context pointing at a booking server.
pub fn create(name: &str, server: &str, client_config_path: &Path) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Context name cannot be empty.");
    }
    let mut config = ClientConfig::load(client_config_path)?;
    if config.get(name).is_some() {
        anyhow::bail!("Context \"{}\" already exists. Use `reservas context set`.", name);
    }
    config.upsert_context(Context {
        name: name.to_string(),
        server: server.trim_end_matches('/').to_string(),
        ..Default::default()
    });
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(client_config_path)?;

    println!("Context \"{}\" created.", name);
    println!("  Server: {}", server);
    Ok(())
}

/// List all contexts.
pub fn list(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: reservas context create <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:20} {:40} {:10}", "", "NAME", "SERVER", "SESSION");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        let session = if ctx.session().is_authenticated() { "logged in" } else { "-" };
        println!("{:2} {:20} {:40} {:10}", marker, ctx.name, server, session);
    }

    Ok(())
}

/// Switch current context.
pub fn use_context(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    if config.get(name).is_none() {
        anyhow::bail!(
            "Context \"{}\" not found. Run `reservas context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(client_config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

/// Set properties on a context. Changing the server drops the old session.
pub fn set(name: &str, server: Option<&str>, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    let ctx = config
        .get_mut(name)
        .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))?;

    if let Some(s) = server {
        let s = s.trim_end_matches('/');
        if ctx.server != s {
            ctx.server = s.to_string();
            ctx.access_token = None;
            ctx.refresh_token = None;
        }
    }

    config.save(client_config_path)?;
    println!("Context \"{}\" updated.", name);
    Ok(())
}

/// Delete a context and its session.
pub fn delete(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }

    config.save(client_config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_use_set_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        create("prod", "https://reservas.example.com/", &path).unwrap();
        create("dev", "http://localhost:8000", &path).unwrap();
        assert!(create("dev", "http://localhost:8001", &path).is_err());

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.current_context, "prod");
        assert_eq!(config.get("prod").unwrap().server, "https://reservas.example.com");

        use_context("dev", &path).unwrap();
        assert!(use_context("missing", &path).is_err());

        let mut config = ClientConfig::load(&path).unwrap();
        config.get_mut("dev").unwrap().access_token = Some("A".into());
        config.save(&path).unwrap();

        set("dev", Some("http://localhost:9000"), &path).unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.current_context, "dev");
        let dev = config.get("dev").unwrap();
        assert_eq!(dev.server, "http://localhost:9000");
        assert_eq!(dev.access_token, None);

        delete("dev", &path).unwrap();
        assert!(delete("dev", &path).is_err());
        assert!(ClientConfig::load(&path).unwrap().current_context.is_empty());
    }
}
