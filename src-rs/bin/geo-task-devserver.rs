use std::env;
use std::fs;

use geo_task_rs::api::{GeoTaskServer, ServerConfig};
use geo_task_rs::helpers::init_logging;
use geo_task_rs::task::Category;
use tracing::{error, info};

fn load_categories(path: &str) -> Result<Vec<Category>, String> {
    let data = fs::read_to_string(path).map_err(|err| format!("{}: {}", path, err))?;
    serde_json::from_str(&data).map_err(|err| format!("{}: {}", path, err))
}

#[tokio::main]
async fn main() {
    init_logging("info");
    let port = env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(8000);
    let required_session = env::var("GEO_TASK_REQUIRED_SESSION")
        .ok()
        .filter(|value| !value.trim().is_empty());

    let categories = match env::var("GEO_TASK_CATEGORIES_FILE") {
        Ok(path) => match load_categories(&path) {
            Ok(categories) => {
                info!(count = categories.len(), "categories loaded");
                categories
            }
            Err(err) => {
                error!("failed to load categories: {}", err);
                return;
            }
        },
        Err(_) => Vec::new(),
    };

    let server = GeoTaskServer::new(ServerConfig {
        port,
        categories,
        required_session,
    });
    if let Err(err) = server.start().await {
        error!("server error: {}", err);
    }
}
