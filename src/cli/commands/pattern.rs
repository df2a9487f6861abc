use crate::cli::parser::{Commands, PatternCommands};
use crate::config::Config;
use crate::core::exception::ExceptionLogic;
use crate::core::generate::Horizon;
use crate::core::pattern::{PatternLogic, PatternUpdate};
use crate::db::log;
use crate::db::patterns;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::weekday::Weekday;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::{Column, Table};
use crate::utils::{date, time};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

/// Numeric weekday input is passed through raw so out-of-range values are
/// rejected by the pattern validation; names are translated here.
fn parse_weekday_arg(s: &str) -> AppResult<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    Weekday::wd_from_str(s)
        .map(|w| i64::from(w.index()))
        .ok_or_else(|| AppError::InvalidWeekday(s.to_string()))
}

fn parse_horizon(days: Option<u64>, months: Option<u64>, cfg: &Config) -> Horizon {
    if let Some(m) = months {
        Horizon::Months(m)
    } else if let Some(d) = days {
        Horizon::Days(d)
    } else {
        Horizon::Days(cfg.default_horizon_days)
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Pattern { command } = cmd {
        match command {
            PatternCommands::Add {
                title,
                weekday,
                time: time_str,
                start,
                duration,
                description,
                end,
                generate,
                days,
                months,
            } => {
                let weekday = parse_weekday_arg(weekday)?;
                let time_of_day = time::parse_time(time_str)
                    .ok_or_else(|| AppError::InvalidTime(time_str.clone()))?;
                let start_date =
                    date::parse_date(start).ok_or_else(|| AppError::InvalidDate(start.clone()))?;
                let end_date = match end {
                    Some(s) => Some(
                        date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
                    ),
                    None => None,
                };

                let horizon = generate.then(|| parse_horizon(*days, *months, cfg));

                let mut pool = DbPool::new(&cfg.database)?;
                let (pattern, created) = PatternLogic::create(
                    &mut pool.conn,
                    title,
                    weekday,
                    time_of_day,
                    start_date,
                    duration.unwrap_or(cfg.default_duration_minutes),
                    description.as_deref().unwrap_or(""),
                    end_date,
                    horizon,
                )?;

                log::audit_quiet(
                    &pool.conn,
                    "pattern-add",
                    &format!("pattern {}", pattern.id),
                    &format!(
                        "Created pattern '{}' ({} at {})",
                        pattern.title,
                        pattern.weekday.name(),
                        pattern.time_str()
                    ),
                );

                success(format!(
                    "Created pattern #{}: '{}' every {} at {}",
                    pattern.id,
                    pattern.title,
                    pattern.weekday.name(),
                    pattern.time_str()
                ));
                if *generate {
                    info(format!("Materialized {} occurrence(s).", created));
                }
            }

            PatternCommands::List { all } => {
                let pool = DbPool::new(&cfg.database)?;
                let rows = patterns::load_patterns(&pool.conn, !*all)?;

                if rows.is_empty() {
                    info("No patterns found.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("ID", 4),
                    Column::new("TITLE", 24),
                    Column::new("WEEKDAY", 9),
                    Column::new("TIME", 5),
                    Column::new("DUR", 5),
                    Column::new("START", 10),
                    Column::new("END", 10),
                    Column::new("ACTIVE", 6),
                ]);
                for p in &rows {
                    table.add_row(vec![
                        p.id.to_string(),
                        p.title.clone(),
                        p.weekday.name().to_string(),
                        p.time_str(),
                        p.duration_minutes.to_string(),
                        p.start_str(),
                        p.end_date
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        if p.is_active { "yes" } else { "no" }.to_string(),
                    ]);
                }
                print!("{}", table.render());
            }

            PatternCommands::Show { id } => {
                let pool = DbPool::new(&cfg.database)?;
                let p = patterns::get_pattern(&pool.conn, *id)?;

                println!("Pattern #{}", p.id);
                println!("  Title:       {}", p.title);
                if !p.description.is_empty() {
                    println!("  Description: {}", p.description);
                }
                println!("  Every:       {} at {}", p.weekday.name(), p.time_str());
                println!("  Duration:    {} min", p.duration_minutes);
                println!("  From:        {}", p.start_str());
                if let Some(end) = p.end_date {
                    println!("  Until:       {}", end.format("%Y-%m-%d"));
                }
                println!("  Active:      {}", if p.is_active { "yes" } else { "no" });
            }

            PatternCommands::Update {
                id,
                title,
                description,
                time: time_str,
                duration,
                end,
                no_propagate,
            } => {
                let upd = PatternUpdate {
                    title: title.clone(),
                    description: description.clone(),
                    time_of_day: time::parse_optional_time(time_str.as_ref())?,
                    duration_minutes: *duration,
                    end_date: match end {
                        Some(s) => Some(
                            date::parse_date(s)
                                .ok_or_else(|| AppError::InvalidDate(s.clone()))?,
                        ),
                        None => None,
                    },
                    is_active: None,
                };

                let mut pool = DbPool::new(&cfg.database)?;
                let (pattern, rewritten) =
                    PatternLogic::update(&mut pool.conn, *id, &upd, !*no_propagate)?;

                log::audit_quiet(
                    &pool.conn,
                    "pattern-update",
                    &format!("pattern {}", pattern.id),
                    &format!("Updated pattern '{}'", pattern.title),
                );

                success(format!("Updated pattern #{}.", pattern.id));
                if !*no_propagate {
                    info(format!("Rewrote {} future occurrence(s).", rewritten));
                }
            }

            PatternCommands::Del {
                id,
                keep_occurrences,
            } => {
                let prompt = if *keep_occurrences {
                    format!("Deactivate pattern #{}?", id)
                } else {
                    format!(
                        "Delete pattern #{} and all its occurrences? This action is irreversible.",
                        id
                    )
                };

                if !ask_confirmation(&prompt) {
                    info("Operation cancelled.");
                    return Ok(());
                }

                let mut pool = DbPool::new(&cfg.database)?;
                let removed = PatternLogic::delete(&mut pool.conn, *id, !*keep_occurrences)?;

                log::audit_quiet(
                    &pool.conn,
                    "pattern-del",
                    &format!("pattern {}", id),
                    if *keep_occurrences {
                        "Pattern deactivated"
                    } else {
                        "Pattern deleted with occurrences"
                    },
                );

                if *keep_occurrences {
                    success(format!("Pattern #{} has been deactivated.", id));
                } else {
                    success(format!(
                        "Pattern #{} has been deleted ({} future occurrence(s) removed).",
                        id, removed
                    ));
                }
            }

            PatternCommands::CancelDate { id, date: date_str } => {
                let d = date::parse_date(date_str)
                    .ok_or_else(|| AppError::InvalidDate(date_str.clone()))?;

                let mut pool = DbPool::new(&cfg.database)?;
                let ex = ExceptionLogic::cancel_date(&mut pool.conn, *id, d)?;

                log::audit_quiet(
                    &pool.conn,
                    "cancel-date",
                    &format!("pattern {}", id),
                    &format!("Cancelled occurrence on {}", ex.date_str()),
                );

                success(format!(
                    "Cancelled occurrence of pattern #{} on {}.",
                    id,
                    ex.date_str()
                ));
            }

            PatternCommands::MoveDate {
                id,
                date: date_str,
                datetime,
            } => {
                let d = date::parse_date(date_str)
                    .ok_or_else(|| AppError::InvalidDate(date_str.clone()))?;
                let new_dt = time::parse_datetime(datetime)
                    .ok_or_else(|| AppError::InvalidDateTime(datetime.clone()))?;

                let mut pool = DbPool::new(&cfg.database)?;
                let ex = ExceptionLogic::reschedule_date(&mut pool.conn, *id, d, new_dt)?;

                log::audit_quiet(
                    &pool.conn,
                    "move-date",
                    &format!("pattern {}", id),
                    &format!("Moved occurrence on {} to {}", ex.date_str(), datetime),
                );

                success(format!(
                    "Moved occurrence of pattern #{} on {} to {}.",
                    id,
                    ex.date_str(),
                    datetime
                ));
            }
        }
    }

    Ok(())
}
