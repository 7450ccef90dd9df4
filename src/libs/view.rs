use super::today::AreaGroup;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn today(groups: &[AreaGroup]) -> anyhow::Result<()> {
        let mut table = Table::new();

        table.add_row(row!["AREA", "TASK", "PROJECT", "DEADLINE", "RANK"]);
        for group in groups {
            for task in &group.tasks {
                table.add_row(row![
                    group.name,
                    task.title,
                    task.project_title.clone().unwrap_or_default(),
                    task.deadline.map(|d| d.to_string()).unwrap_or_default(),
                    task.today_index
                ]);
            }
        }
        table.printstd();

        Ok(())
    }
}
