use std::sync::Arc;

use anyhow::{Context, bail};
use pulse_auth::Session;
use pulse_client::PulseClient;
use pulse_config::PulseConfig;
use pulse_core::entities::{AuthState, ChatMessage, UserProfile};
use pulse_core::enums::UserRole;
use pulse_core::guard::{self, GuardDecision};
use pulse_sync::{QueryCache, TaskBoard};

use crate::bootstrap;

pub const LOGIN_HINT: &str = "not logged in: run `pulse auth login`";

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: PulseConfig,
    pub session: Arc<Session>,
    pub client: Arc<PulseClient>,
    pub board: TaskBoard,
    pub chat_cache: Arc<QueryCache<Vec<ChatMessage>>>,
    /// Profile fetched at startup, when logged in and reachable.
    pub profile: Option<UserProfile>,
}

impl AppContext {
    /// Restore the session and build the client. A logged-in session is
    /// checked against the backend right away.
    pub async fn init(config: PulseConfig) -> anyhow::Result<Self> {
        let session = Arc::new(bootstrap::open_session(&config)?);
        let client = Arc::new(
            PulseClient::new(&config.api, Arc::clone(&session))
                .context("failed to build HTTP client")?,
        );
        let board = TaskBoard::new(Arc::clone(&client));

        let mut ctx = Self {
            config,
            session,
            client,
            board,
            chat_cache: Arc::new(QueryCache::new()),
            profile: None,
        };
        if ctx.session.is_authenticated() {
            ctx.refresh_profile().await?;
        }
        Ok(ctx)
    }

    /// Re-read the profile. An expired token clears the session without
    /// failing the command; other errors are logged and ignored.
    async fn refresh_profile(&mut self) -> anyhow::Result<()> {
        match self.client.fetch_profile().await {
            Ok(profile) => self.profile = Some(profile),
            Err(error) if error.is_auth_expired() => {
                tracing::info!(%error, "stored session rejected, logging out");
                self.session.logout()?;
            }
            Err(error) => tracing::warn!(%error, "profile refresh failed"),
        }
        Ok(())
    }

    /// Session state, if the logged-in user may run a command restricted to `roles`.
    pub fn require(&self, roles: Option<&[UserRole]>) -> anyhow::Result<AuthState> {
        let state = self.session.state();
        match guard::decide(&state, roles) {
            GuardDecision::Render => Ok(state),
            GuardDecision::RedirectToLogin => bail!(LOGIN_HINT),
            GuardDecision::RedirectToFallback => {
                let allowed = roles
                    .unwrap_or_default()
                    .iter()
                    .copied()
                    .map(UserRole::as_str)
                    .collect::<Vec<_>>()
                    .join(" or ");
                let current = state.role().map_or("unknown", UserRole::as_str);
                bail!("this command needs a {allowed} account; you are logged in as {current}")
            }
        }
    }

    /// Role of a logged-in user.
    pub fn require_role(&self) -> anyhow::Result<UserRole> {
        self.require(None)?
            .role()
            .ok_or_else(|| anyhow::anyhow!(LOGIN_HINT))
    }

    /// Name shown on messages you send before the backend echoes them.
    #[must_use]
    pub fn sender_name(&self) -> String {
        match &self.profile {
            Some(profile) if !profile.full_name.trim().is_empty() => profile.full_name.clone(),
            Some(profile) => profile.email.clone(),
            None => self.session.email().unwrap_or_default(),
        }
    }
}
