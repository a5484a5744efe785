use coop_decide::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coop_decide::init_tracing();

    let config = Config::load()?;
    coop_decide::start_server(config).await
}
