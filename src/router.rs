use crate::calendar::{CalendarApi, CalendarSyncEngine};
use crate::config::Config;
use crate::db::{
    AddressesStorage, ClientsStorage, CredentialsStorage, DogsStorage, EventsStorage,
    SessionStorage, SqlitePool, UsersStorage,
};
use crate::error::HubError;
use crate::google_oauth::{CredentialReconciler, GoogleOauthFlow};
use crate::handlers::{addresses, calendar, clients, dogs, google_oauth, users};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct HubState {
    pub config: Arc<Config>,
    pub users: UsersStorage,
    pub sessions: SessionStorage,
    pub clients: ClientsStorage,
    pub dogs: DogsStorage,
    pub addresses: AddressesStorage,
    pub flow: GoogleOauthFlow,
    pub reconciler: CredentialReconciler,
    pub sync: CalendarSyncEngine,
}

impl HubState {
    pub fn new(pool: SqlitePool, config: Arc<Config>) -> Result<Self, HubError> {
        let http = reqwest::Client::builder()
            .user_agent("k9-hub/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(HubError::Http)?;

        let credentials = CredentialsStorage::new(pool.clone());
        let events = EventsStorage::new(pool.clone());
        let api = CalendarApi::new(Url::parse(&config.google.calendar_api_base)?, http.clone());

        Ok(Self {
            users: UsersStorage::new(pool.clone()),
            sessions: SessionStorage::new(pool.clone()),
            clients: ClientsStorage::new(pool.clone()),
            dogs: DogsStorage::new(pool.clone()),
            addresses: AddressesStorage::new(pool),
            flow: GoogleOauthFlow::new(config.google.clone(), http.clone()),
            reconciler: CredentialReconciler::new(credentials.clone()),
            sync: CalendarSyncEngine::new(credentials, events, api, http),
            config,
        })
    }
}

pub fn hub_router(state: HubState) -> Router {
    Router::new()
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login))
        .route("/users/me", get(users::me))
        .route("/auth/google/redirect", get(google_oauth::google_oauth_redirect))
        .route("/auth/google/callback", post(google_oauth::google_oauth_callback))
        .route("/calendar/events", get(calendar::list_events))
        .route("/clients", post(clients::create).get(clients::list))
        .route(
            "/clients/{id}",
            get(clients::get).put(clients::update).delete(clients::remove),
        )
        .route("/dogs", post(dogs::create).get(dogs::list))
        .route("/dogs/{id}", get(dogs::get).put(dogs::update).delete(dogs::remove))
        .route("/addresses", post(addresses::create).get(addresses::list))
        .route(
            "/addresses/{id}",
            get(addresses::get)
                .put(addresses::update)
                .delete(addresses::remove),
        )
        .with_state(state)
}
