use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::generate::{GenerateLogic, Horizon};
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Generate { days, months } = cmd {
        let horizon = if let Some(m) = months {
            Horizon::Months(*m)
        } else if let Some(d) = days {
            Horizon::Days(*d)
        } else {
            Horizon::Days(cfg.default_horizon_days)
        };

        info(format!(
            "Generating occurrences for the next {} day(s)...",
            horizon.days()
        ));

        let mut pool = DbPool::new(&cfg.database)?;
        let total = GenerateLogic::generate_for_all(&mut pool.conn, horizon)?;

        log::audit_quiet(
            &pool.conn,
            "generate",
            "occurrences",
            &format!("Generated {} occurrence(s)", total),
        );

        success(format!(
            "Successfully generated {} new occurrence(s).",
            total
        ));
    }

    Ok(())
}
