use anyhow::{bail, Result};
use clap::Parser;
use futures::StreamExt;
use respc::{cmd, Client, ConnectionConfig, PubSubMessage, Value};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod output;

const DEFAULT_URL: &str = "redis://127.0.0.1:6379";

#[derive(Parser, Debug)]
#[clap(name = "respc", about = "Send commands to a Redis server")]
struct Opt {
    /// Server url, defaults to $REDIS_URL
    #[clap(long)]
    url: Option<String>,

    /// Database to select, overrides the one in the url
    #[clap(short = 'n', long)]
    db: Option<i64>,

    /// Password used for AUTH
    #[clap(short = 'a', long)]
    password: Option<String>,

    /// Connect and response timeout in milliseconds
    #[clap(long)]
    timeout_ms: Option<u64>,

    /// Print the client metrics before exiting
    #[clap(long)]
    metrics: bool,

    /// Command to run; without one commands are read from stdin
    command: Vec<String>,
}

impl Opt {
    fn connection_config(&self) -> Result<ConnectionConfig> {
        let url = match &self.url {
            Some(url) => url.clone(),
            None => std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
        };
        let mut config = ConnectionConfig::from_url(&url)?;
        if let Some(db) = self.db {
            config = config.with_db(db);
        }
        if let Some(password) = &self.password {
            config = config.with_password(password.clone());
        }
        if let Some(ms) = self.timeout_ms {
            let timeout = Some(Duration::from_millis(ms));
            config = config.with_timeouts(timeout, timeout);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("respc=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = Opt::parse();
    let config = opt.connection_config()?;
    info!("Connecting to {} (db {})", config.addr(), config.db);
    let client = Client::connect(config).await?;

    if opt.command.is_empty() {
        repl(&client).await?;
    } else {
        run_once(&client, &opt.command).await?;
    }

    if opt.metrics {
        print!("{}", client.metrics().encode_text()?);
    }
    Ok(())
}

async fn run_once(client: &Client, args: &[String]) -> Result<()> {
    let name = args[0].to_uppercase();
    if name == "SUBSCRIBE" || name == "PSUBSCRIBE" {
        return subscribe(client, &name, &args[1..]).await;
    }

    match execute(client, args).await {
        Ok(value) => println!("{}", output::format_value(&value)),
        Err(e) if !e.is_connection_error() => println!("{}", output::format_error(&e)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn execute(client: &Client, args: &[String]) -> respc::Result<Value> {
    let command = cmd(&args[0]).args(&args[1..]);
    client.query(command).await
}

/// Print subscriber messages until Ctrl-C or until the server hangs up
async fn subscribe(client: &Client, name: &str, targets: &[String]) -> Result<()> {
    if targets.is_empty() {
        bail!("{} needs at least one channel", name.to_lowercase());
    }

    let mut pubsub = client.pubsub().await?;
    if name == "PSUBSCRIBE" {
        pubsub.psubscribe(targets).await?;
    } else {
        pubsub.subscribe(targets).await?;
    }

    let mut messages = Box::pin(pubsub.into_stream());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
            message = messages.next() => match message {
                Some(message) => print_message(&message?),
                None => {
                    info!("Server closed the subscriber connection");
                    break;
                }
            },
        }
    }
    Ok(())
}

fn print_message(message: &PubSubMessage) {
    println!("{}", output::format_message(message));
}

async fn repl(client: &Client) -> Result<()> {
    let prompt = format!("{}> ", client.config().addr());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let args = match output::split_line(&line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(e) => {
                println!("Invalid argument(s): {}", e);
                continue;
            }
        };

        match args[0].to_lowercase().as_str() {
            "quit" | "exit" => {
                client.quit().await?;
                break;
            }
            "subscribe" | "psubscribe" => run_once(client, &args).await?,
            _ => match execute(client, &args).await {
                Ok(value) => println!("{}", output::format_value(&value)),
                Err(e) => {
                    if e.is_connection_error() {
                        debug!("Connection error, the next command reconnects");
                    }
                    println!("{}", output::format_error(&e));
                }
            },
        }
    }
    Ok(())
}
