mod cli;
mod client;
mod models;
mod render;
mod repl;

use client::GeoTaskClient;
use repl::REPL;

#[tokio::main]
async fn main() {
    geo_task_rs::helpers::init_logging("warn");
    let config = match cli::parse_config() {
        Ok(config) => config,
        Err(err) => {
            render::error(&err);
            return;
        }
    };
    let client = match GeoTaskClient::new(&config.geo) {
        Ok(client) => client,
        Err(err) => {
            render::error(&err);
            return;
        }
    };
    let mut repl = REPL::new(config, client);
    repl.run().await;
}
