//! SQL DDL for initializing the record store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema. Timestamps are stored as RFC3339 TEXT and written by the
/// application so they parse back losslessly. Uniqueness constraints carry
/// the upsert keys: `google_credentials.owner_id` (one credential set per
/// user) and `calendar_events.google_event_id` (one record per external
/// event).
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone_number TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS session_values (
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (owner_id, name)
);

CREATE TABLE IF NOT EXISTS google_credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    access_token TEXT NOT NULL,
    refresh_token TEXT NOT NULL DEFAULT '',
    expires_at TEXT NOT NULL,
    token_uri TEXT NOT NULL,
    client_id TEXT NOT NULL,
    client_secret TEXT NOT NULL,
    scopes TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS calendar_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    google_event_id TEXT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    synced_with_google INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone_number TEXT NULL,
    address TEXT NULL,
    emergency_contact_name TEXT NULL,
    emergency_contact_phone TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dogs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    client_id INTEGER NULL REFERENCES clients(id) ON DELETE SET NULL,
    breed TEXT NULL,
    date_of_birth TEXT NULL,
    sex TEXT NOT NULL DEFAULT 'UNKNOWN',
    is_altered INTEGER NULL,
    status TEXT NOT NULL DEFAULT 'PROSPECTIVE',
    weight_kg REAL NULL,
    behavioral_notes TEXT NOT NULL DEFAULT '',
    training_goals TEXT NOT NULL DEFAULT '',
    medical_notes TEXT NOT NULL DEFAULT '',
    vaccination_rabies TEXT NULL,
    vaccination_dhpp TEXT NULL,
    vaccination_bordetella TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS addresses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    street_address_1 TEXT NOT NULL,
    street_address_2 TEXT NULL,
    city TEXT NOT NULL,
    state TEXT NULL,
    postal_code TEXT NULL,
    country TEXT NOT NULL,
    address_type TEXT NOT NULL DEFAULT 'PHYSICAL',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_dogs_client_id ON dogs(client_id);

CREATE INDEX IF NOT EXISTS idx_addresses_client_id ON addresses(client_id);
"#;
