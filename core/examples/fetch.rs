//! Fetch a URL and dump the transfer metrics.
//!
//! Usage: `cargo run --example fetch -- [url]`
//! Set `RUST_LOG=debug` to see per-transaction logging.

use easyhttp_core::{Client, Metric};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let mut client = Client::new(&url, Vec::new());
    client.set_verbose(true)?;
    client.get("", &[])?;

    println!("{}", String::from_utf8_lossy(client.body().unwrap_or_default()));
    println!("{}", "=".repeat(74));
    for (name, value) in client.info()? {
        println!("{name}: {value}");
    }
    println!("{}", "=".repeat(74));
    println!("status: {}", client.get_info(Metric::HttpCode)?);
    println!("total time: {}s", client.get_info(Metric::TotalTime)?);

    client.close();
    Ok(())
}
