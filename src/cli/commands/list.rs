use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::occurrence::OccurrenceLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::status::OccurrenceStatus;
use crate::ui::messages::info;
use crate::utils::table::{Column, Table};
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { from, to, status } = cmd {
        let start =
            time::parse_datetime(from).ok_or_else(|| AppError::InvalidDateTime(from.clone()))?;
        let end =
            time::parse_datetime(to).ok_or_else(|| AppError::InvalidDateTime(to.clone()))?;

        let status = match status {
            Some(s) => Some(
                OccurrenceStatus::from_db_str(s)
                    .ok_or_else(|| AppError::InvalidStatus(s.clone()))?,
            ),
            None => None,
        };

        let pool = DbPool::new(&cfg.database)?;
        let rows = OccurrenceLogic::list_in_range(&pool.conn, start, end, status)?;

        if rows.is_empty() {
            info(format!("No occurrences between {} and {}.", from, to));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 4),
            Column::new("START", 16),
            Column::new("DUR", 5),
            Column::new("STATUS", 9),
            Column::new("PATTERN", 7),
            Column::new("EXC", 3),
            Column::new("TITLE", 24),
        ]);
        for o in &rows {
            table.add_row(vec![
                o.id.to_string(),
                o.start_str(),
                o.duration_minutes.to_string(),
                o.status.to_db_str().to_string(),
                o.pattern_id
                    .map(|p| format!("#{}", p))
                    .unwrap_or_else(|| "-".to_string()),
                if o.is_exception { "*" } else { "" }.to_string(),
                o.title.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
