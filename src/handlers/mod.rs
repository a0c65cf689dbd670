pub mod addresses;
pub mod calendar;
pub mod clients;
pub mod dogs;
pub mod google_oauth;
pub mod users;

use crate::error::HubError;

/// Reject a string field outside `min..=max` characters.
pub(crate) fn require_len(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), HubError> {
    let len = value.chars().count();
    if len < min {
        return Err(HubError::Validation(format!(
            "{field} must be at least {min} characters long."
        )));
    }
    if len > max {
        return Err(HubError::Validation(format!(
            "{field} cannot exceed {max} characters."
        )));
    }
    Ok(())
}
