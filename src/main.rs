//! clinicport CLI - log in to the clinic backend and inspect the stored
//! session from the command line.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clinicport::auth::{self, AuthClient, FileStorage, SessionStore};
use clinicport::config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() -> ! {
    eprintln!("Usage: clinicport <login <username> | logout | status>");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let mut config = Config::load()?;
    let mut store = SessionStore::new(FileStorage::new(Config::session_dir()?));

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("login") => {
            let username = match args.get(2) {
                Some(u) => u.clone(),
                None => usage(),
            };
            let password = rpassword::prompt_password("Password: ")?;

            let client = AuthClient::new(config.api_url())?;
            let session = auth::sign_in(&client, &mut store, &username, &password).await?;
            info!(username = %username, "Login succeeded");

            config.last_username = Some(username);
            config.save()?;

            match session.user {
                Some(user) => println!("Logged in as {}", user.display()),
                None => println!("Logged in"),
            }
        }
        Some("logout") => {
            auth::sign_out(&mut store)?;
            println!("Logged out");
        }
        Some("status") => match store.load() {
            Some(session) => match session.user {
                Some(user) => println!("Authenticated as {}", user.display()),
                None => println!("Authenticated"),
            },
            None => println!("Not authenticated"),
        },
        _ => usage(),
    }

    Ok(())
}
