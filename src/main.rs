use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_trivia::protocol::DEFAULT_PORT;
use rust_trivia::{QuestionBank, ServerConfig, load_questions_from_json, logging};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Host quiz sessions
    Server {
        /// JSON config file (defaults to ./server_config.json when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON file to load the questions from instead of the built-in bank
        #[arg(short, long)]
        questions: Option<PathBuf>,

        /// Port to listen on, overrides config and PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Join a quiz server
    Client {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Skip the username prompt
        #[arg(short, long)]
        username: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Server {
            config,
            questions,
            port,
        } => {
            logging::init(args.verbose);

            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }

            let bank = match questions {
                Some(path) => QuestionBank::new(load_questions_from_json(path)?)?,
                None => QuestionBank::builtin(),
            };

            rust_trivia::server::run(config, bank).await?;
        }
        Command::Client {
            host,
            port,
            username,
        } => {
            rust_trivia::client::run(host, port, username).await?;
        }
    }

    Ok(())
}
