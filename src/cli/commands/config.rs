use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: do_migrate,
    } = cmd
    {
        if *print_config {
            let path = Config::config_file();
            let content = fs::read_to_string(&path)?;
            println!("# {}", path.display());
            println!("{}", content);
        }

        if *check {
            let missing = migrate::missing_fields()?;
            if missing.is_empty() {
                success("Configuration file is complete.");
            } else {
                warning(format!(
                    "Missing fields: {}. Run `config --migrate` to repair.",
                    missing.join(", ")
                ));
            }
        }

        if *do_migrate {
            if migrate::run_config_migration()? {
                success("Configuration file migrated.");
            } else {
                info("Configuration file already up to date.");
            }
        }
    }

    Ok(())
}
