use crate::error::{ScoringError, ScoringResult};
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "usuarios";

/// Stored entitlement flags for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_subscribed: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// Identity and entitlements of the acting user, passed explicitly into
/// every operation that writes or deletes on the user's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub is_subscribed: bool,
    pub is_admin: bool,
}

impl UserSession {
    pub fn anonymous(user_id: impl Into<String>) -> Self {
        UserSession {
            user_id: user_id.into(),
            is_subscribed: false,
            is_admin: false,
        }
    }

    pub fn from_document(user_id: impl Into<String>, document: &UserDocument) -> Self {
        let mut session = UserSession::anonymous(user_id);
        session.refresh(document);
        session
    }

    /// Recomputes entitlements from the latest stored flags.
    pub fn refresh(&mut self, document: &UserDocument) {
        self.is_subscribed = document.is_subscribed;
        self.is_admin = document.is_admin;
    }

    pub fn is_entitled(&self) -> bool {
        self.is_subscribed || self.is_admin
    }

    pub fn ensure_entitled(&self) -> ScoringResult<()> {
        if self.is_entitled() {
            Ok(())
        } else {
            Err(ScoringError::NotEntitled)
        }
    }
}
