use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Management CLI for the edge gate", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Bearer token for the /internal endpoints
    #[arg(short, long, default_value = "change-me")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Block an address for a while
    Block {
        ip: String,
        /// Block lifetime in seconds
        #[arg(short, long, default_value_t = 300.0)]
        ttl: f64,
        #[arg(short, long, default_value = "manual block")]
        reason: String,
    },
    /// Remove an address from the denylist
    Unblock { ip: String },
    /// List live denylist entries
    List,
    /// Trip the crash latch (irreversible until restart)
    Crash,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Block { ip, ttl, reason } => {
            let res = client
                .post(format!("{}/internal/block-ip", cli.url))
                .headers(headers)
                .json(&json!({ "ip": ip, "ttlSeconds": ttl, "reason": reason }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Unblock { ip } => {
            let res = client
                .post(format!("{}/internal/unblock-ip", cli.url))
                .headers(headers)
                .json(&json!({ "ip": ip }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::List => {
            let res = client
                .get(format!("{}/internal/denylist", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Crash => {
            let res = client
                .post(format!("{}/internal/crash", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: internal API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
