use std::io::{self, Write};

use geo_task_rs::task::{ExecuteGeoTaskResponse, GeoTask, GetCategoriesResponse, ListGeoTasksResponse};

use crate::models::CLIConfig;

pub fn banner(cfg: &CLIConfig, secondary_origin: &str) {
    println!("Geo Task Debug CLI");
    println!("Host API: {}", cfg.geo.primary_base_url);
    println!("Geo Task API: {}", secondary_origin);
    println!("Type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                       Show commands");
    println!("  /exit | /quit               Exit (or Ctrl-D)");
    println!("  /list [page] [page_size]    List geo tasks and keep the list active");
    println!("  /add <query text>           Create a geo task");
    println!("  /category <name|none>       Category for new tasks");
    println!("  /exec <id>                  Execute a geo task now");
    println!("  /categories                 List categories");
    println!("  /config                     Show current config");
    println!("  /token <token>              Update session token");
    println!("  /api <url|default>          Override the Geo Task API origin");
    println!("Ctrl-C cancels the request in flight.");
}

pub fn page(page: &ListGeoTasksResponse) {
    if page.items.is_empty() {
        println!("no geo tasks found");
        return;
    }
    for task in &page.items {
        row(task);
    }
    println!(
        "page {}/{} ({} total)",
        page.page, page.total_pages, page.total
    );
}

fn row(task: &GeoTask) {
    let enabled = if task.enabled.unwrap_or(false) { "yes" } else { "no" };
    println!(
        "[{}] {} | enabled: {} | cron: {} | last run: {}",
        task.id,
        task.query_text,
        enabled,
        task.schedule_cron.as_deref().unwrap_or("-"),
        task.last_run_at.as_deref().unwrap_or("-"),
    );
}

pub fn created(task: &GeoTask) {
    println!("created {}", task.id);
}

pub fn executed(resp: &ExecuteGeoTaskResponse) {
    println!(
        "{} (inserted: {}, tasks: {}) {}",
        if resp.success { "ok" } else { "failed" },
        resp.inserted,
        resp.task_count,
        resp.message
    );
    for id in &resp.task_ids {
        println!("  task {}", id);
    }
}

pub fn categories(resp: &GetCategoriesResponse) {
    if resp.categories.is_empty() {
        println!("no categories");
        return;
    }
    for category in &resp.categories {
        println!("{} - {}", category.name, category.description);
        if !category.competitors.is_empty() {
            println!("  competitors: {}", category.competitors.join(", "));
        }
    }
}

pub fn config(cfg: &CLIConfig, secondary_origin: &str) {
    println!("config:");
    println!("  host api: {}", cfg.geo.primary_base_url);
    println!("  runtime host: {}", cfg.geo.runtime_host);
    println!("  geo task api: {}", secondary_origin);
    println!("  session: {}", if cfg.geo.session.is_some() { "set" } else { "none" });
    println!("  page size: {}", cfg.list.page_size);
    if let Some(category) = &cfg.category {
        println!("  category: {}", category);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
