//! Operator tooling: mint identity tokens and generate API keys.

use clap::{Parser, Subcommand};

use rest_mailer::auth::{AuthService, CAP_SEND_EMAIL};
use rest_mailer::security::{generate_api_key, DEFAULT_API_KEY_LENGTH};

#[derive(Parser)]
#[command(name = "mailer-admin", about = "Rest Mailer operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a signed identity token
    Token {
        /// Subject (caller id) recorded in the token
        #[arg(long)]
        subject: String,
        /// Capability to grant; repeat for several
        #[arg(long = "capability", default_values_t = vec![CAP_SEND_EMAIL.to_string()])]
        capabilities: Vec<String>,
        /// Token lifetime in seconds
        #[arg(long, default_value_t = 3600)]
        expiry: u64,
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: String,
    },
    /// Print a random API key for the X-API-Key header
    ApiKey {
        #[arg(long, default_value_t = DEFAULT_API_KEY_LENGTH)]
        length: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Token {
            subject,
            capabilities,
            expiry,
            secret,
        } => {
            let auth = AuthService::from_secret(&secret, expiry);
            println!("{}", auth.generate_token(&subject, &capabilities)?);
        }
        Command::ApiKey { length } => {
            println!("{}", generate_api_key(length));
        }
    }

    Ok(())
}
