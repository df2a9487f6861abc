use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::occurrence::OccurrenceLogic;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        title,
        start,
        duration,
        description,
    } = cmd
    {
        let start_datetime =
            time::parse_datetime(start).ok_or_else(|| AppError::InvalidDateTime(start.clone()))?;

        let pool = DbPool::new(&cfg.database)?;
        let occurrence = OccurrenceLogic::create_standalone(
            &pool.conn,
            title,
            start_datetime,
            duration.unwrap_or(cfg.default_duration_minutes),
            description.as_deref().unwrap_or(""),
        )?;

        log::audit_quiet(
            &pool.conn,
            "add",
            &format!("occurrence {}", occurrence.id),
            &format!("Created one-time session '{}' at {}", title, start),
        );

        success(format!(
            "Created one-time session #{}: '{}' at {}",
            occurrence.id,
            occurrence.title,
            occurrence.start_str()
        ));
    }

    Ok(())
}
