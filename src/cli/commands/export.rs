use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, ExportLogic};
use crate::ui::messages::success;
use crate::utils::time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        out,
        format,
        from,
        to,
    } = cmd
    {
        let format = match format {
            Some(s) => ExportFormat::ef_from_str(s)
                .ok_or_else(|| AppError::InvalidExportFormat(s.clone()))?,
            None => ExportFormat::Json,
        };

        let start =
            time::parse_datetime(from).ok_or_else(|| AppError::InvalidDateTime(from.clone()))?;
        let end =
            time::parse_datetime(to).ok_or_else(|| AppError::InvalidDateTime(to.clone()))?;

        let pool = DbPool::new(&cfg.database)?;
        let count = ExportLogic::export(&pool.conn, out, format, start, end)?;

        success(format!("Exported {} occurrence(s) to {}.", count, out));
    }

    Ok(())
}
