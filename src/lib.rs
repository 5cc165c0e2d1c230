//! SportsComp Rust Client Library
//!
//! A Rust client for the SportsComp sports-event marketplace, covering
//! authentication, marketplace browsing, athlete participation, organizer
//! event management, the step-by-step event creation wizard and public
//! site content.

pub mod auth;
pub mod config;
pub mod content;
pub mod draft;
pub mod error;
pub mod fetch;
pub mod marketplace;
pub mod organizer;
pub mod store;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::{Auth, SessionStore};
use crate::config::ClientOptions;
use crate::content::Content;
use crate::draft::DraftWizard;
use crate::marketplace::Marketplace;
use crate::organizer::Organizer;
use crate::store::LocalStore;

/// The main entry point for the SportsComp Rust client
pub struct SportsComp {
    /// The base URL for the SportsComp API
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Auth client for accounts, sessions and profiles
    pub auth: Arc<Auth>,
    /// Client options
    pub options: ClientOptions,
    marketplace: Marketplace,
    organizer: Arc<Organizer>,
    wizard: DraftWizard,
    content: Content,
}

impl SportsComp {
    /// Create a new SportsComp client
    ///
    /// # Arguments
    ///
    /// * `api_url` - The base URL of the SportsComp API
    ///
    /// # Example
    ///
    /// ```
    /// use sportscomp_rust::SportsComp;
    ///
    /// let client = SportsComp::new("https://api.sportscomp.tn");
    /// ```
    pub fn new(api_url: &str) -> Self {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new SportsComp client with custom options
    ///
    /// # Arguments
    ///
    /// * `api_url` - The base URL of the SportsComp API
    /// * `options` - Custom client options
    ///
    /// # Example
    ///
    /// ```
    /// use sportscomp_rust::{SportsComp, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_storage_dir("/tmp/sportscomp");
    /// let client = SportsComp::new_with_options("https://api.sportscomp.tn", options);
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Self {
        let url = api_url.trim_end_matches('/').to_string();
        let http_client = build_http_client(&options);

        let store = Arc::new(match &options.storage_dir {
            Some(dir) => LocalStore::dir(dir.clone()),
            None => LocalStore::memory(),
        });
        let sessions = Arc::new(SessionStore::new(store.clone()));

        let auth = Arc::new(Auth::new(
            &url,
            http_client.clone(),
            sessions,
            options.clone(),
        ));
        let marketplace = Marketplace::new(&url, http_client.clone(), auth.clone(), options.clone());
        let organizer = Arc::new(Organizer::new(
            &url,
            http_client.clone(),
            auth.clone(),
            options.clone(),
        ));
        let wizard = DraftWizard::new(organizer.clone(), store);
        let content = Content::new(&url, http_client.clone(), options.clone());

        Self {
            url,
            http_client,
            auth,
            options,
            marketplace,
            organizer,
            wizard,
            content,
        }
    }

    /// Get a reference to the auth client for accounts, sessions and
    /// profiles
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get a reference to the marketplace client for browsing events,
    /// joining them and managing favorites
    ///
    /// # Example
    ///
    /// ```
    /// use sportscomp_rust::SportsComp;
    ///
    /// let client = SportsComp::new("https://api.sportscomp.tn");
    /// let marketplace = client.marketplace();
    /// ```
    pub fn marketplace(&self) -> &Marketplace {
        &self.marketplace
    }

    /// Get a reference to the organizer client for managing owned events,
    /// their ticket types and their media
    pub fn organizer(&self) -> &Organizer {
        &self.organizer
    }

    /// Get a reference to the event creation wizard
    ///
    /// # Example
    ///
    /// ```
    /// use sportscomp_rust::SportsComp;
    ///
    /// let client = SportsComp::new("https://api.sportscomp.tn");
    /// let draft = client.wizard().draft();
    /// ```
    pub fn wizard(&self) -> &DraftWizard {
        &self.wizard
    }

    /// Get a reference to the content client for CMS pages and the contact
    /// form
    pub fn content(&self) -> &Content {
        &self.content
    }
}

fn build_http_client(options: &ClientOptions) -> Client {
    let mut builder = Client::builder();
    if let Some(timeout) = options.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| Client::new())
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::Role;
    pub use crate::config::ClientOptions;
    pub use crate::draft::WizardState;
    pub use crate::error::Error;
    pub use crate::marketplace::EventFilter;
    pub use crate::SportsComp;
}
