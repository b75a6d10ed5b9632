//! Shared helpers for command handlers.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// Build the not-found error for an appliance id.
pub fn appliance_not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "appliance".into(),
        identifier: id.into(),
        list_command: "appliances list".into(),
    }
}

/// Map a 404 to [`appliance_not_found`], anything else through `From`.
pub fn for_appliance(id: &str) -> impl FnOnce(sae_api::Error) -> CliError + '_ {
    move |err| {
        if err.is_not_found() {
            appliance_not_found(id)
        } else {
            err.into()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn read_json_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = read_json_file::<serde_json::Value>(file.path()).unwrap_err();
        match err {
            CliError::Validation { field, reason } => {
                assert_eq!(field, "file");
                assert!(reason.contains(&file.path().display().to_string()));
            }
            other => panic!("expected Validation error, got: {other:?}"),
        }
    }

    #[test]
    fn confirm_skips_prompt_with_yes() {
        assert!(confirm("Delete?", true).unwrap());
    }

    #[test]
    fn not_found_maps_to_appliance() {
        let err = for_appliance("F-9")(sae_api::Error::Server {
            status: 404,
            body: String::new(),
        });
        assert!(matches!(err, CliError::NotFound { ref identifier, .. } if identifier == "F-9"));
    }
}
