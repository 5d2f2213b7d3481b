//! Configuration access port trait.

use crate::domain::error::QuantbtError;

/// Typed lookups return `Ok(None)` for a missing key and `ConfigInvalid` for
/// a value that does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, QuantbtError>;
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, QuantbtError>;

    /// Comma-separated list of numbers.
    fn get_double_list(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<Vec<f64>>, QuantbtError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(None);
        };

        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>().map_err(|_| QuantbtError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("'{s}' is not a number"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}
