//! CSV-based settings loader
//!
//! Reads `setting,value` rows such as a user-settings export

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

/// Default path to the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "data/defaults.csv";

#[derive(Debug, serde::Deserialize)]
struct SettingRow {
    setting: String,
    value: f64,
}

/// Load named settings from a CSV file
pub fn load_settings(path: &Path) -> Result<Vec<(String, f64)>, LoadError> {
    let file = File::open(path)?;
    load_settings_from_reader(file)
}

/// Load named settings from any reader
pub fn load_settings_from_reader<R: Read>(reader: R) -> Result<Vec<(String, f64)>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut settings = Vec::new();

    for result in csv_reader.deserialize() {
        let row: SettingRow = result?;
        settings.push((row.setting, row.value));
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::Defaults;

    #[test]
    fn test_load_settings() {
        let data = "setting,value\nvacancy_rate,0\nmanagement_rate, 10\n";
        let settings = load_settings_from_reader(data.as_bytes()).unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[1], ("management_rate".to_string(), 10.0));

        let mut d = Defaults::standard();
        for (name, value) in settings {
            d.set(&name, value).unwrap();
        }
        assert_eq!(d.vacancy_rate, 0.0);
        assert_eq!(d.management_rate, 10.0);
    }

    #[test]
    fn test_bad_value_is_error() {
        let data = "setting,value\nvacancy_rate,abc\n";
        assert!(matches!(
            load_settings_from_reader(data.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }
}
