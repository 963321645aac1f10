//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command against the file at `path`.
pub fn execute_config(args: ConfigArgs, config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", formatter.info(&format!("Config file: {}", path.display())));
            let contents = toml::to_string_pretty(config)
                .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", contents);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists; use --force to overwrite",
                    path.display()
                )));
            }
            Config::default().save_to(path)?;
            println!("{}", formatter.success(&format!("Wrote {}", path.display())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let init = |force| ConfigArgs {
            action: ConfigAction::Init { force },
        };

        execute_config(init(false), &Config::default(), &path, &formatter).unwrap();
        assert!(path.exists());

        let err = execute_config(init(false), &Config::default(), &path, &formatter).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        execute_config(init(true), &Config::default(), &path, &formatter).unwrap();
    }
}
