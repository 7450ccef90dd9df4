use crate::api::calendar::Calendar;
use crate::libs::config::Config;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long, help = "Run the one-time calendar authorization exchange after saving")]
    authorize_calendar: bool,
}

#[tokio::main]
pub async fn cmd(args: InitArgs) -> anyhow::Result<()> {
    let config = Config::init()?;
    config.save()?;
    println!("Configuration saved");

    if args.authorize_calendar {
        match &config.calendar {
            Some(calendar_config) => Calendar::new(calendar_config).authorize_interactive().await?,
            None => println!("Calendar module is not configured; skipping authorization"),
        }
    }

    Ok(())
}
