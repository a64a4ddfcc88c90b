//! Worker loop: line-delimited JSON events on stdin, one JSON result per
//! line on stdout.

use csm_serverless::ServerlessHandler;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let handler = ServerlessHandler::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<Value>(&line) {
            Ok(event) => handler.handle(&event).await,
            Err(e) => json!({
                "error": format!("Invalid event: {e}"),
                "statusCode": 400
            }),
        };
        println!("{result}");
    }

    Ok(())
}
