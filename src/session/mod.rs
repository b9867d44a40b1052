// Explicit session lifecycle: constructed at login, passed by reference to
// the views that need it, torn down at logout. No ambient global state.

use chrono::{DateTime, Utc};

use crate::client::error::ClientError;
use crate::client::PortalClient;
use crate::types::StaffAccount;

pub struct Session {
    client: PortalClient,
    account: StaffAccount,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Authenticate against the portal and fetch the account bound to the
    /// new cookie session
    pub async fn login(
        client: PortalClient,
        email: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        client.login(email, password).await?;
        let account = client.current_user().await?;
        tracing::info!(email = %account.email, "session established");

        Ok(Self {
            client,
            account,
            started_at: Utc::now(),
        })
    }

    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    pub fn account(&self) -> &StaffAccount {
        &self.account
    }

    pub fn account_id(&self) -> &str {
        &self.account.id
    }

    pub fn is_super(&self) -> bool {
        self.account.is_super
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Tear the session down; consuming self drops the cookie-backed
    /// client along with it
    pub fn logout(self) {
        tracing::info!(email = %self.account.email, "session closed");
    }
}
