use curio_core::Config;

// Use mimalloc as the global allocator for lower fragmentation when running
// on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (telemetry, database, media backend, routes)
    let (_state, router) = curio_api::setup::initialize_app(config.clone()).await?;

    curio_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
