use std::sync::Arc;

// This main function is the entry point when running `cargo run -p web-server`.
// It serves with configuration from `trendline.toml` and the environment only;
// the `trendline` binary offers the same with CLI overrides.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config(None)?;
    let _guard = configuration::init_tracing(&config.logging)?;

    let repo = web_server::seeded_repository(&config)?;
    web_server::run_server(config, Arc::new(repo)).await
}
