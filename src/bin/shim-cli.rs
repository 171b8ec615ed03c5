use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use http_forward_shim::proxy::{OutboundRequest, RequestTranslator};
use http_forward_shim::{ErrorResponse, InvocationEvent};

#[derive(Parser)]
#[command(name = "shim-cli")]
#[command(about = "Operator CLI for the HTTP forwarding shim", long_about = None)]
struct Cli {
    /// Base URL of a running invocation host.
    #[arg(short, long, default_value = "http://127.0.0.1:9000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an envelope through a running host and print the result
    Invoke {
        /// Envelope file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        file: PathBuf,
    },
    /// Translate an envelope locally without contacting any origin
    Translate {
        /// Envelope file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Invoke { file } => {
            let event = InvocationEvent::new(read_envelope(&file)?);
            let res = reqwest::Client::new()
                .post(format!("{}/invoke", cli.url.trim_end_matches('/')))
                .json(&event)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Translate { file } => {
            let envelope = read_envelope(&file)?;
            let output = match RequestTranslator::default().translate(&envelope) {
                Ok(request) => describe(&request),
                Err(e) => match ErrorResponse::for_error(&e) {
                    Some(error) => error.to_json(),
                    None => return Err(e.into()),
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn read_envelope(file: &Path) -> std::io::Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file)
    }
}

fn describe(request: &OutboundRequest) -> Value {
    let mut headers = Map::new();
    for name in request.headers.keys() {
        let values: Vec<Value> = request
            .header_values(name.as_str())
            .into_iter()
            .map(Value::from)
            .collect();
        headers.insert(name.to_string(), Value::Array(values));
    }

    json!({
        "method": request.method.as_str(),
        "target": request.target.to_string(),
        "contentType": request.body.as_ref().and_then(|b| b.content_type.to_str().ok()),
        "bodyBytes": request.body.as_ref().map(|b| b.text.len()).unwrap_or(0),
        "headers": headers,
    })
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: host returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
