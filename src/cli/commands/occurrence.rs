use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::occurrence::{OccurrenceLogic, OccurrenceUpdate};
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time;

/// Handles the instance-id mutations: `edit`, `cancel`, `complete`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;

    match cmd {
        Commands::Edit {
            id,
            title,
            description,
            start,
            duration,
        } => {
            let upd = OccurrenceUpdate {
                title: title.clone(),
                description: description.clone(),
                start_datetime: time::parse_optional_datetime(start.as_ref())?,
                duration_minutes: *duration,
            };

            let occurrence = OccurrenceLogic::update(&pool.conn, *id, &upd)?;

            log::audit_quiet(
                &pool.conn,
                "edit",
                &format!("occurrence {}", occurrence.id),
                &format!("Updated occurrence at {}", occurrence.start_str()),
            );

            success(format!(
                "Updated occurrence #{} ({}).",
                occurrence.id,
                occurrence.start_str()
            ));
        }

        Commands::Cancel { id } => {
            let occurrence = OccurrenceLogic::cancel(&pool.conn, *id)?;

            log::audit_quiet(
                &pool.conn,
                "cancel",
                &format!("occurrence {}", occurrence.id),
                &format!("Cancelled occurrence at {}", occurrence.start_str()),
            );

            success(format!(
                "Cancelled occurrence #{} ({}).",
                occurrence.id,
                occurrence.start_str()
            ));
        }

        Commands::Complete { id } => {
            let occurrence = OccurrenceLogic::complete(&pool.conn, *id)?;

            log::audit_quiet(
                &pool.conn,
                "complete",
                &format!("occurrence {}", occurrence.id),
                &format!("Completed occurrence at {}", occurrence.start_str()),
            );

            success(format!(
                "Completed occurrence #{} ({}).",
                occurrence.id,
                occurrence.start_str()
            ));
        }

        _ => {}
    }

    Ok(())
}
