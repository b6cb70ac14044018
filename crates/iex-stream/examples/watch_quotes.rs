//! Watch realtime updates for a couple of symbols.
//!
//! ```bash
//! cargo run -p iex-stream --example watch_quotes
//! ```

use anyhow::Result;
use iex_stream::StreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    iex_stream::init_tracing();

    let client = StreamClient::connect();
    let feed = client.observe(["MSFT", "TWLO"]);
    let mut listener = feed.attach();

    while let Some(update) = listener.recv().await {
        println!("{} @ {}: {}", update.symbol, update.received_at, update.payload);
    }

    Ok(())
}
