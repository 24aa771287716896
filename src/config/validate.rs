// src/config/validate.rs

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::{DashError, Result};

impl TryFrom<RawJobFile> for JobFile {
    type Error = crate::errors::DashError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_file(&raw)?;
        Ok(JobFile::new_unchecked(raw.commands))
    }
}

fn validate_raw_file(raw: &RawJobFile) -> Result<()> {
    ensure_has_commands(raw)?;
    validate_entries(raw)?;
    Ok(())
}

fn ensure_has_commands(raw: &RawJobFile) -> Result<()> {
    if raw.commands.is_empty() {
        return Err(DashError::ConfigError(
            "job file must contain at least one entry in `commands`".to_string(),
        ));
    }
    Ok(())
}

fn validate_entries(raw: &RawJobFile) -> Result<()> {
    for (idx, entry) in raw.commands.iter().enumerate() {
        if entry.name.trim().is_empty() {
            return Err(DashError::ConfigError(format!(
                "commands[{idx}] has an empty `name`"
            )));
        }
        if entry.command.trim().is_empty() {
            return Err(DashError::ConfigError(format!(
                "commands[{idx}] ('{}') has an empty `command`",
                entry.name
            )));
        }
    }
    Ok(())
}
