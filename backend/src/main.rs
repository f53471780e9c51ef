//! Backend entry-point: loads settings, wires adapters, and runs the server.

mod server;

use mockable::DefaultEnv;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let settings = server::load(&env, server::BuildMode::from_debug_assertions())
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    server::run(settings).await
}
