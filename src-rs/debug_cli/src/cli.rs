use std::env;

use geo_task_rs::helpers::{host_of, load_config_from_env};
use geo_task_rs::task::ListGeoTasksRequest;
use geo_task_rs::SessionToken;

use crate::models::CLIConfig;

pub fn parse_config() -> Result<CLIConfig, String> {
    let mut cfg = CLIConfig {
        geo: load_config_from_env().map_err(|err| err.to_string())?,
        category: None,
        list: ListGeoTasksRequest::default(),
    };

    let args: Vec<String> = env::args().collect();
    let mut explicit_host = false;
    let mut idx = 1;
    while idx < args.len() {
        match args[idx].as_str() {
            "--primary" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.geo.primary_base_url = value.clone();
                    idx += 1;
                }
            }
            "--api" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.geo.secondary_origin_override = Some(value.clone());
                    idx += 1;
                }
            }
            "--host" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.geo.runtime_host = value.clone();
                    explicit_host = true;
                    idx += 1;
                }
            }
            "--token" => {
                if let Some(value) = args.get(idx + 1) {
                    let token = SessionToken::new(value.clone()).map_err(|err| format!("--token: {}", err))?;
                    cfg.geo.session = Some(token);
                    idx += 1;
                }
            }
            "--page-size" => {
                if let Some(value) = args.get(idx + 1) {
                    if let Ok(parsed) = value.parse::<u32>() {
                        cfg.list.page_size = parsed;
                    }
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }

    if !explicit_host && args.iter().any(|arg| arg == "--primary") {
        if let Some(host) = host_of(&cfg.geo.primary_base_url) {
            cfg.geo.runtime_host = host;
        }
    }

    Ok(cfg)
}
