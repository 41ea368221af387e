use geo_task_rs::task::CreateGeoTaskRequest;
use geo_task_rs::{ListSubscription, SessionToken};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::client::GeoTaskClient;
use crate::models::CLIConfig;
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: GeoTaskClient,
    /// Set by `/list`; refetched after every successful `/add`.
    active_list: Option<ListSubscription>,
}

impl REPL {
    pub fn new(config: CLIConfig, client: GeoTaskClient) -> Self {
        Self {
            config,
            client,
            active_list: None,
        }
    }

    pub async fn run(&mut self) {
        render::banner(&self.config, self.client.secondary_origin());
        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            render::prompt();
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                _ => break,
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if !line.starts_with('/') {
                render::info("unknown input, type /help");
                continue;
            }
            if self.handle_command(&line).await {
                break;
            }
        }
    }

    async fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        debug!(command = cmd, "running command");
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "list" => self.list(rest).await,
            "add" => self.add(rest).await,
            "category" => {
                if rest.is_empty() {
                    render::info(&format!("category: {:?}", self.config.category));
                } else if rest == "none" {
                    self.config.category = None;
                    render::info("category cleared");
                } else {
                    self.config.category = Some(rest.to_string());
                    render::info("category updated");
                }
            }
            "exec" => {
                if rest.is_empty() {
                    render::error("usage: /exec <id>");
                } else {
                    match self.client.execute(rest).await {
                        Ok(resp) => render::executed(&resp),
                        Err(err) => render::error(&err),
                    }
                }
            }
            "categories" => match self.client.categories().await {
                Ok(resp) => render::categories(&resp),
                Err(err) => render::error(&err),
            },
            "config" => render::config(&self.config, self.client.secondary_origin()),
            "token" => {
                if rest.is_empty() {
                    render::error("usage: /token <token>");
                } else {
                    match SessionToken::new(rest) {
                        Ok(token) => {
                            self.config.geo.session = Some(token);
                            self.rebuild_client("token updated");
                        }
                        Err(err) => render::error(&err.to_string()),
                    }
                }
            }
            "api" => {
                if rest.is_empty() {
                    render::error("usage: /api <url|default>");
                } else {
                    self.config.geo.secondary_origin_override = match rest {
                        "default" => None,
                        url => Some(url.to_string()),
                    };
                    self.rebuild_client("geo task api updated");
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    /// Subscriptions belong to the old client's tag store, so they are dropped.
    fn rebuild_client(&mut self, done: &str) {
        match GeoTaskClient::new(&self.config.geo) {
            Ok(client) => {
                self.client = client;
                self.active_list = None;
                render::info(done);
                render::info(&format!("geo task api: {}", self.client.secondary_origin()));
            }
            Err(err) => render::error(&err),
        }
    }

    async fn list(&mut self, rest: &str) {
        let mut args = rest.split_whitespace();
        if let Some(page) = args.next().and_then(|raw| raw.parse::<u32>().ok()) {
            self.config.list.page = page;
        }
        if let Some(size) = args.next().and_then(|raw| raw.parse::<u32>().ok()) {
            self.config.list.page_size = size;
        }
        let subscription = self.client.subscribe_list(self.config.list.clone());
        match self.client.list(subscription.params()).await {
            Ok(page) => {
                render::page(&page);
                self.active_list = Some(subscription);
            }
            Err(err) => render::error(&err),
        }
    }

    async fn add(&mut self, rest: &str) {
        let mut request = CreateGeoTaskRequest::new(rest);
        request.enabled = Some(true);
        request.category = self.config.category.clone();
        match self.client.create(&request).await {
            Ok(task) => render::created(&task),
            Err(err) => {
                render::error(&err);
                return;
            }
        }
        if let Some(subscription) = self.active_list.as_mut() {
            match self.client.refetch(subscription).await {
                Ok(page) => render::page(&page),
                Err(err) => render::error(&err),
            }
        }
    }
}
