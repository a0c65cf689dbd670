use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::google_oauth::credentials::CredentialSet;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One OAuth credential set per user, as persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredCredential {
    pub id: i64,
    pub owner_id: i64,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub token_uri: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// Space-delimited capability strings, as granted.
    pub scopes: String,
}

impl StoredCredential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

impl From<StoredCredential> for CredentialSet {
    fn from(s: StoredCredential) -> Self {
        CredentialSet {
            access_token: s.access_token,
            refresh_token: (!s.refresh_token.is_empty()).then_some(s.refresh_token),
            expires_at: s.expires_at,
            token_uri: s.token_uri,
            client_id: s.client_id,
            client_secret: s.client_secret,
            scopes: s.scopes.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// A locally stored calendar event, keyed by the external event id once
/// synced. The sync engine creates and updates these; it never deletes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarEventRecord {
    pub id: i64,
    pub google_event_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub synced_with_google: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
            Sex::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MALE" => Some(Sex::Male),
            "FEMALE" => Some(Sex::Female),
            "UNKNOWN" => Some(Sex::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DogStatus {
    Active,
    Inactive,
    Waitlist,
    Prospective,
}

impl DogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DogStatus::Active => "ACTIVE",
            DogStatus::Inactive => "INACTIVE",
            DogStatus::Waitlist => "WAITLIST",
            DogStatus::Prospective => "PROSPECTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(DogStatus::Active),
            "INACTIVE" => Some(DogStatus::Inactive),
            "WAITLIST" => Some(DogStatus::Waitlist),
            "PROSPECTIVE" => Some(DogStatus::Prospective),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    pub client_id: Option<i64>,
    pub breed: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Sex,
    pub is_altered: Option<bool>,
    pub status: DogStatus,
    pub weight_kg: Option<f64>,
    pub behavioral_notes: String,
    pub training_goals: String,
    pub medical_notes: String,
    pub vaccination_rabies: Option<NaiveDate>,
    pub vaccination_dhpp: Option<NaiveDate>,
    pub vaccination_bordetella: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dog {
    /// Approximate age in whole months, None when the birth date is unknown
    /// or lies in the future.
    pub fn age_months(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        if dob > today {
            return None;
        }
        let mut months =
            (today.year() - dob.year()) * 12 + (today.month() as i32 - dob.month() as i32);
        if today.day() < dob.day() {
            months -= 1;
        }
        Some(months.max(0) as u32)
    }

    pub fn is_rabies_vaccine_current(&self, today: NaiveDate, expiry_years: u32) -> bool {
        vaccination_current(self.vaccination_rabies, today, expiry_years)
    }

    pub fn is_dhpp_vaccine_current(&self, today: NaiveDate, expiry_years: u32) -> bool {
        vaccination_current(self.vaccination_dhpp, today, expiry_years)
    }

    pub fn is_bordetella_vaccine_current(&self, today: NaiveDate, expiry_years: u32) -> bool {
        vaccination_current(self.vaccination_bordetella, today, expiry_years)
    }

    pub fn is_vaccination_cleared(&self, today: NaiveDate, expiry_years: u32) -> bool {
        self.is_rabies_vaccine_current(today, expiry_years)
            && self.is_dhpp_vaccine_current(today, expiry_years)
            && self.is_bordetella_vaccine_current(today, expiry_years)
    }
}

/// A vaccination is current while `date + expiry_years * 365 days >= today`.
/// Unknown dates count as not current.
fn vaccination_current(date: Option<NaiveDate>, today: NaiveDate, expiry_years: u32) -> bool {
    match date {
        Some(d) => d + chrono::Days::new(u64::from(expiry_years) * 365) >= today,
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    Physical,
    Mailing,
    Billing,
    Other,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Physical => "PHYSICAL",
            AddressType::Mailing => "MAILING",
            AddressType::Billing => "BILLING",
            AddressType::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PHYSICAL" => Some(AddressType::Physical),
            "MAILING" => Some(AddressType::Mailing),
            "BILLING" => Some(AddressType::Billing),
            "OTHER" => Some(AddressType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Address {
    pub id: i64,
    pub client_id: i64,
    pub street_address_1: String,
    pub street_address_2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub address_type: AddressType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog_with(dob: Option<NaiveDate>, rabies: Option<NaiveDate>) -> Dog {
        Dog {
            id: 1,
            name: "Rex".to_string(),
            client_id: None,
            breed: None,
            date_of_birth: dob,
            sex: Sex::Male,
            is_altered: None,
            status: DogStatus::Prospective,
            weight_kg: None,
            behavioral_notes: String::new(),
            training_goals: String::new(),
            medical_notes: String::new(),
            vaccination_rabies: rabies,
            vaccination_dhpp: None,
            vaccination_bordetella: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn age_months_counts_partial_months_down() {
        let dob = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(dog_with(Some(dob), None).age_months(today), Some(23));
    }

    #[test]
    fn age_unknown_without_birth_date() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(dog_with(None, None).age_months(today), None);
    }

    #[test]
    fn rabies_vaccine_expires_after_a_year() {
        let shot = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let dog = dog_with(None, Some(shot));
        assert!(dog.is_rabies_vaccine_current(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), 1));
        assert!(!dog.is_rabies_vaccine_current(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), 1));
    }

    #[test]
    fn vaccination_clearance_requires_all_shots() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let shot = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut dog = dog_with(None, Some(shot));
        assert!(!dog.is_vaccination_cleared(today, 1));
        dog.vaccination_dhpp = Some(shot);
        dog.vaccination_bordetella = Some(shot);
        assert!(dog.is_vaccination_cleared(today, 1));
    }
}
