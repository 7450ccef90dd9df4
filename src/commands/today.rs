use crate::db::things::ThingsStore;
use crate::libs::config::Config;
use crate::libs::today;
use crate::libs::view::View;
use anyhow::bail;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct TodayArgs {}

pub fn cmd(_args: TodayArgs) -> anyhow::Result<()> {
    let config = Config::read()?;
    let Some(things_config) = config.things else {
        bail!("Local task store is not configured; run `dayboard init` first");
    };

    let store = ThingsStore::open(&things_config)?;
    let todos = store.fetch_todos()?;
    let groups = today::today_view(&todos, Local::now().date_naive());

    if groups.is_empty() {
        println!("No tasks in the Today view");
        return Ok(());
    }

    let now = Local::now();
    println!("\nToday, {}", now.format("%B %-d, %Y"));
    View::today(&groups)?;

    Ok(())
}
