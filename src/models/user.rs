//! Request user models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Display name reported for unauthenticated requests
pub const ANONYMOUS_USERNAME: &str = "AnonymousUser";

/// A user known to the user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub is_active: bool,
}

/// The user a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestUser {
    Authenticated(AuthenticatedUser),
    #[default]
    Anonymous,
}

impl RequestUser {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, RequestUser::Authenticated(_))
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            RequestUser::Authenticated(user) => Some(&user.id),
            RequestUser::Anonymous => None,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            RequestUser::Authenticated(user) => &user.username,
            RequestUser::Anonymous => ANONYMOUS_USERNAME,
        }
    }
}

impl From<AuthenticatedUser> for RequestUser {
    fn from(user: AuthenticatedUser) -> Self {
        RequestUser::Authenticated(user)
    }
}
