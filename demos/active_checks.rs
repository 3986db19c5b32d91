//! Poll the active checks configured for a host.
//!
//! Usage: `cargo run --example active_checks -- <server> <host>`

use zbx_client::Session;

fn main() -> zbx_client::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let host = args.next().unwrap_or_else(|| "demo-host".to_string());

    let mut session = Session::connect(&server, None)?;
    let checks = session.get_active_checks(&host)?;

    println!("response: {:?}", checks.response);
    for item in &checks.items {
        println!(
            "  {:<32} delay={:?}",
            item.key.as_deref().unwrap_or("-"),
            item.delay
        );
    }
    Ok(())
}
