//! Push a batch of values to a trapper endpoint.
//!
//! Usage: `cargo run --example send_values -- <server> <target-host>`

use zbx_client::Sender;

fn main() -> zbx_client::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let host = args.next().unwrap_or_else(|| "demo-host".to_string());

    let mut sender = Sender::new(server, None);
    sender.collect(host.as_str(), "app.requests", 512, None);
    sender.collect(host.as_str(), "app.errors", 3, None);

    let result = sender.send()?;
    println!(
        "processed={:?} failed={:?} total={:?} seconds_spent={:?}",
        result.processed, result.failed, result.total, result.seconds_spent
    );
    Ok(())
}
