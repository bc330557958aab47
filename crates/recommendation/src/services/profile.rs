//! Profile service trait, HTTP adapter and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use domain::UserProfile;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::http::{self, Call};
use crate::error::{RecommendationError, Result};

const SERVICE: &str = "profile service";
const PROFILE_PATH: &str = "/api/private/user/profile";

/// Looks up user profiles in the identity service.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Returns the profile for `user_id`.
    ///
    /// Fails with `NotFound` when the user does not exist and with
    /// `Unavailable` when the service cannot answer.
    async fn find_user_profile(&self, user_id: UserId) -> Result<UserProfile>;
}

#[async_trait]
impl<T: ProfileService + ?Sized> ProfileService for Arc<T> {
    async fn find_user_profile(&self, user_id: UserId) -> Result<UserProfile> {
        (**self).find_user_profile(user_id).await
    }
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
    user_id: i64,
    first_name: String,
    last_name: String,
    region: String,
}

/// Profile service backed by the identity service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpProfileService {
    client: Client,
    base_url: String,
}

impl HttpProfileService {
    /// Creates an adapter that calls the service at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProfileService for HttpProfileService {
    #[tracing::instrument(skip(self), fields(service = SERVICE))]
    async fn find_user_profile(&self, user_id: UserId) -> Result<UserProfile> {
        let key = user_id.to_string();
        let call = Call {
            service: SERVICE,
            operation: "find_user_profile",
            key: &key,
        };
        let url = http::endpoint(&self.base_url, PROFILE_PATH);

        let payload: ProfilePayload =
            http::get_data(&self.client, &url, &[("user_id", key.as_str())], call).await?;

        if payload.user_id != user_id.as_i64() {
            return Err(call.unavailable(format!(
                "answered with the profile of user {}",
                payload.user_id
            )));
        }

        Ok(UserProfile::from_name_parts(
            user_id,
            &payload.first_name,
            &payload.last_name,
            payload.region,
        ))
    }
}

/// In-memory profile service for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileService {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    unavailable: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl InMemoryProfileService {
    /// Creates a new empty profile service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every lookup, for exercising request deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Stores a profile, replacing any previous one for the same user.
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile);
    }

    /// Configures the service to fail every lookup with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of lookups received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileService for InMemoryProfileService {
    async fn find_user_profile(&self, user_id: UserId) -> Result<UserProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RecommendationError::unavailable(
                SERVICE,
                "find_user_profile",
                user_id.to_string(),
                "in-memory service switched off",
            ));
        }

        self.profiles
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| RecommendationError::NotFound {
                service: SERVICE,
                operation: "find_user_profile",
                key: user_id.to_string(),
            })
    }
}
