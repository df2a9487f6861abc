use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::resolver::{Resolver, ResolverMode};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::utils::table::{Column, Table};
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Resolve { from, to, mode } = cmd {
        let start =
            time::parse_datetime(from).ok_or_else(|| AppError::InvalidDateTime(from.clone()))?;
        let end =
            time::parse_datetime(to).ok_or_else(|| AppError::InvalidDateTime(to.clone()))?;

        let mode_str = mode.as_deref().unwrap_or(cfg.resolver_mode.as_str());
        let mode = ResolverMode::rm_from_str(mode_str)
            .ok_or_else(|| AppError::Config(format!("Unknown resolver mode: {}", mode_str)))?;

        let pool = DbPool::new(&cfg.database)?;
        let feed = Resolver::resolve(&pool.conn, start, end, mode)?;

        if feed.is_empty() {
            info(format!("No occurrences between {} and {}.", from, to));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("DATE", 10),
            Column::new("START", 16),
            Column::new("DUR", 5),
            Column::new("SOURCE", 10),
            Column::new("MOD", 3),
            Column::new("TITLE", 24),
        ]);
        for r in &feed {
            table.add_row(vec![
                r.occurrence_date.format("%Y-%m-%d").to_string(),
                r.start_datetime.format("%Y-%m-%d %H:%M").to_string(),
                r.duration_minutes.to_string(),
                r.pattern_id
                    .map(|p| format!("pattern #{}", p))
                    .unwrap_or_else(|| "one-time".to_string()),
                if r.is_modified { "*" } else { "" }.to_string(),
                r.title.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
