//! filekv CLI Client
//!
//! Command-line interface for a running filekv server.

use clap::{Parser, Subcommand};
use serde_json::Value;

/// filekv CLI
#[derive(Parser, Debug)]
#[command(name = "filekv-cli")]
#[command(about = "CLI for the filekv key-value store")]
struct Args {
    /// Server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create records from a JSON object mapping keys to record objects
    Create {
        /// The batch, e.g. '{"b":{"b1":"1","Time-To-Live":50}}'
        json: String,
    },

    /// Read a record by key
    Read {
        /// The key to read
        key: String,
    },

    /// Delete a record by key
    Delete {
        /// The key to delete
        key: String,
    },
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Commands::Create { json } => create(&args.server, &json),
        Commands::Read { key } => request("GET", &format!("{}/datastore/read?key={key}", args.server)),
        Commands::Delete { key } => {
            request("DELETE", &format!("{}/datastore/delete?key={key}", args.server))
        }
    };

    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
            if body.get("status").and_then(Value::as_str) == Some("error") {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("request failed: {e}");
            std::process::exit(1);
        }
    }
}

fn create(server: &str, json: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let batch: Value = serde_json::from_str(json)?;

    let mut response = ureq::post(&format!("{server}/datastore/create"))
        .config()
        .http_status_as_error(false)
        .build()
        .send_json(&batch)?;

    Ok(response.body_mut().read_json()?)
}

fn request(method: &str, url: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let builder = match method {
        "DELETE" => ureq::delete(url),
        _ => ureq::get(url),
    };

    let mut response = builder
        .config()
        .http_status_as_error(false)
        .build()
        .call()?;

    Ok(response.body_mut().read_json()?)
}
