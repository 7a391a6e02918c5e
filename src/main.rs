use anyhow::Result;
use clap::{Parser, Subcommand};

use postbox::config::Config;

/// Postbox: contact form backend for a portfolio site.
///
/// Accepts submissions over HTTP, filters spam, rate limits per client,
/// stores messages in SQLite, and emails the operator.
#[derive(Parser)]
#[command(name = "postbox", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8001")]
        port: u16,

        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Print recent contact messages
    Messages {
        /// Max messages to print (default: 50)
        #[arg(long, default_value = "50")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("postbox=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            let db = postbox::db::initialize(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            if !config.smtp_configured() {
                println!("\nSMTP is not configured — notifications will be skipped.");
                println!("Set SENDER_EMAIL, SENDER_PASSWORD and NOTIFY_EMAIL to enable them.");
            }
            println!("\nRun: postbox serve");
        }

        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            // initialize rather than open so a fresh deployment comes up
            // without a separate init step
            let db = postbox::db::initialize(&config.db_path)?;
            postbox::web::run_server(config, db, port, &bind).await?;
        }

        Commands::Messages { limit } => {
            let config = Config::load()?;
            let db = postbox::db::open(&config.db_path)?;

            let messages = db.get_recent_messages(limit).await?;
            if messages.is_empty() {
                println!("No messages yet.");
                return Ok(());
            }

            let total = db.message_count().await?;
            println!("{} of {} message(s), newest first:\n", messages.len(), total);
            for message in &messages {
                println!(
                    "[{}] {} <{}>{}",
                    message.timestamp.format("%Y-%m-%d %H:%M UTC"),
                    message.name,
                    message.email,
                    message
                        .ip_address
                        .as_deref()
                        .map(|ip| format!(" from {ip}"))
                        .unwrap_or_default(),
                );
                println!("  {}\n", message.message.replace('\n', "\n  "));
            }
        }
    }

    Ok(())
}
