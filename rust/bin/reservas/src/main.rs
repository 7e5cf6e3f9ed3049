//! `reservas`: command-line client for the location booking service.
//!
//! Manages server contexts and the login session, and drives locations,
//! reservations and the owner dashboard over the REST API.

mod commands;
mod config;

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use reservas_client::{PaymentMethod, Registration, UserKind};

/// Reservas CLI tool.
#[derive(Parser, Debug)]
#[command(name = "reservas", about = "Location booking client")]
struct Cli {
    /// Path to client config file (default: ~/.reservas/config.toml).
    #[arg(long = "config", global = true, env = "RESERVAS_CONFIG")]
    config: Option<PathBuf>,

    /// Context to use instead of the current one.
    #[arg(long = "context", global = true, env = "RESERVAS_CONTEXT")]
    context: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage server contexts.
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Create an account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Account type: customer or owner.
        #[arg(long, value_parser = parse_user_kind, default_value = "customer")]
        kind: UserKind,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        cpf: String,
        /// Password (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Login to the current context's server.
    Login {
        /// Username.
        #[arg(long)]
        user: Option<String>,
        /// Password (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the tokens from the current context.
    Logout,

    /// Exchange the refresh token for a new access token.
    Refresh,

    /// Show the groups of the logged-in account.
    Whoami,

    /// Browse and manage locations.
    Locations {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// List, create and cancel reservations.
    Reservations {
        #[command(subcommand)]
        action: ReservationAction,
    },

    /// Owner statistics.
    Dashboard,

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context.
    Create {
        name: String,
        /// Server URL (e.g. http://localhost:8000).
        #[arg(long)]
        server: String,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[derive(Subcommand, Debug)]
enum LocationAction {
    /// List locations.
    List {
        /// Hide inactive locations.
        #[arg(long)]
        active: bool,
    },
    /// Show one location with its free slots.
    Show {
        id: i64,
        /// Day to look up slots for (YYYY-MM-DD, default today).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Step through the images interactively.
        #[arg(long)]
        browse: bool,
    },
    /// Create a location.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long = "price")]
        price_per_hour: String,
        /// Opening time (HH:MM).
        #[arg(long)]
        opens: Option<String>,
        /// Closing time (HH:MM).
        #[arg(long)]
        closes: Option<String>,
        /// Hours before start after which cancelling is refused.
        #[arg(long)]
        cancellation_hours: Option<u32>,
        /// Longest reservation in hours.
        #[arg(long)]
        max_duration: Option<u32>,
        /// Image file (jpg/png). Repeatable.
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Cancel (deactivate) a location.
    Cancel {
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ReservationAction {
    /// List your reservations.
    List,
    /// Book a location.
    Create {
        #[arg(long)]
        location: i64,
        /// Day (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Start time (HH:MM).
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// End time (HH:MM).
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// pix, boleto or cartao.
        #[arg(long, value_parser = parse_payment)]
        payment: PaymentMethod,
    },
    /// Cancel a confirmed reservation.
    Cancel {
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("invalid time {:?}, expected HH:MM", s))
}

fn parse_payment(s: &str) -> Result<PaymentMethod, String> {
    match s.to_lowercase().as_str() {
        "pix" => Ok(PaymentMethod::Pix),
        "boleto" => Ok(PaymentMethod::Boleto),
        "cartao" | "cartão" | "card" => Ok(PaymentMethod::Cartao),
        _ => Err(format!("unknown payment method {:?}: use pix, boleto or cartao", s)),
    }
}

fn parse_user_kind(s: &str) -> Result<UserKind, String> {
    match s.to_lowercase().as_str() {
        "customer" => Ok(UserKind::Customer),
        "owner" => Ok(UserKind::Owner),
        _ => Err(format!("unknown account type {:?}: use customer or owner", s)),
    }
}

fn prompt_line(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

#[tokio::main]
async fn main() {
    // Initialize logging. Quiet by default so command output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        commands::show(&commands::report(&err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .unwrap_or_else(config::ClientConfig::default_path);
    let context = cli.context.as_deref();
    let json_output = cli.output == "json";

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create { name, server } => {
                commands::context::create(&name, &server, &config_path)?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Set { name, server } => {
                commands::context::set(&name, server.as_deref(), &config_path)?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Register {
            username,
            email,
            first_name,
            last_name,
            kind,
            phone,
            cpf,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let pw = rpassword::prompt_password("Password: ")?;
                    let confirm = rpassword::prompt_password("Confirm password: ")?;
                    if pw != confirm {
                        anyhow::bail!("Passwords do not match.");
                    }
                    pw
                }
            };
            if password.is_empty() {
                anyhow::bail!("Password cannot be empty.");
            }
            let registration = Registration {
                username,
                email,
                password,
                first_name,
                last_name,
                user_type: kind,
                phone,
                cpf,
            };
            commands::auth::register(registration, &config_path, context).await?;
        }

        Commands::Login { user, password } => {
            let username = match user {
                Some(u) => u,
                None => prompt_line("Username: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::auth::login(&username, &password, &config_path, context).await?;
        }

        Commands::Logout => {
            commands::auth::logout(&config_path, context)?;
        }

        Commands::Refresh => {
            commands::auth::refresh(&config_path, context).await?;
        }

        Commands::Whoami => {
            commands::auth::whoami(&config_path, context, json_output).await?;
        }

        Commands::Locations { action } => match action {
            LocationAction::List { active } => {
                commands::location::list(&config_path, context, json_output, active).await?;
            }
            LocationAction::Show { id, date, browse } => {
                commands::location::show_location(id, date, browse, &config_path, context).await?;
            }
            LocationAction::Create {
                name,
                description,
                address,
                price_per_hour,
                opens,
                closes,
                cancellation_hours,
                max_duration,
                images,
            } => {
                let args = commands::location::CreateArgs {
                    name,
                    description,
                    address,
                    price_per_hour,
                    opens,
                    closes,
                    cancellation_hours,
                    max_duration,
                    images,
                };
                commands::location::create(args, &config_path, context).await?;
            }
            LocationAction::Cancel { id, yes } => {
                commands::location::cancel(id, yes, &config_path, context).await?;
            }
        },

        Commands::Reservations { action } => match action {
            ReservationAction::List => {
                commands::reservation::list(&config_path, context).await?;
            }
            ReservationAction::Create {
                location,
                date,
                start,
                end,
                payment,
            } => {
                commands::reservation::create(
                    location,
                    date,
                    start,
                    end,
                    payment,
                    &config_path,
                    context,
                )
                .await?;
            }
            ReservationAction::Cancel { id, yes } => {
                commands::reservation::cancel(id, yes, &config_path, context).await?;
            }
        },

        Commands::Dashboard => {
            commands::dashboard::show(&config_path, context, json_output).await?;
        }

        Commands::Version => {
            println!("reservas cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_accept_minutes_and_seconds() {
        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_time("09:30:15").unwrap(), NaiveTime::from_hms_opt(9, 30, 15).unwrap());
        assert!(parse_time("9h30").is_err());
    }

    #[test]
    fn payment_and_kind_values() {
        assert_eq!(parse_payment("PIX").unwrap(), PaymentMethod::Pix);
        assert_eq!(parse_payment("cartão").unwrap(), PaymentMethod::Cartao);
        assert!(parse_payment("cash").is_err());
        assert_eq!(parse_user_kind("owner").unwrap(), UserKind::Owner);
        assert!(parse_user_kind("admin").is_err());
    }

    #[test]
    fn cli_parses_reservation_create() {
        let cli = Cli::try_parse_from([
            "reservas", "--context", "prod", "reservations", "create", "--location", "3",
            "--date", "2026-11-02", "--start", "10:00", "--end", "11:30", "--payment", "boleto",
        ])
        .unwrap();
        assert_eq!(cli.context.as_deref(), Some("prod"));
        match cli.command {
            Commands::Reservations {
                action: ReservationAction::Create { location, end, payment, .. },
            } => {
                assert_eq!(location, 3);
                assert_eq!(end, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
                assert_eq!(payment, PaymentMethod::Boleto);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
