use crate::db::get_db_pool;
use crate::orm::users;
use crate::session::SESSION_USER_KEY;
use actix_session::Session;
use actix_web::dev::Payload;
use actix_web::{error, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::EntityTrait;

/// The authenticated caller's identity and role.
///
/// Every mutating core operation receives one of these (or the id/role it
/// carries); requests without a resolvable principal are rejected at the
/// boundary before the core is invoked.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
    pub role: users::Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == users::Role::Admin
    }

    /// Uniform ownership policy: a principal may mutate a resource when it
    /// owns it or holds the admin role. A resource with no owner (e.g. a
    /// redacted comment) is only mutable by an admin.
    pub fn can_mutate(&self, resource_owner_id: Option<i32>) -> bool {
        match resource_owner_id {
            Some(owner) => owner == self.user_id || self.is_admin(),
            None => self.is_admin(),
        }
    }
}

/// Client context passed to routes, resolved once per request from the
/// session cookie. `None` client is a guest.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    client: Option<Principal>,
}

impl ClientCtx {
    pub fn principal(&self) -> Option<&Principal> {
        self.client.as_ref()
    }

    /// Returns either the user's id or None.
    pub fn get_id(&self) -> Option<i32> {
        self.client.as_ref().map(|p| p.user_id)
    }

    pub fn is_user(&self) -> bool {
        self.client.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.client.as_ref().map(|p| p.is_admin()).unwrap_or(false)
    }

    /// Fails with 401 unless a user is logged in.
    pub fn require_login(&self) -> Result<i32, Error> {
        self.get_id()
            .ok_or_else(|| error::ErrorUnauthorized("Must be logged in"))
    }

    /// Fails with 401 unless logged in; returns the full principal.
    pub fn require_principal(&self) -> Result<&Principal, Error> {
        self.client
            .as_ref()
            .ok_or_else(|| error::ErrorUnauthorized("Must be logged in"))
    }

    /// Fails unless the caller holds the admin role.
    pub fn require_admin(&self) -> Result<i32, Error> {
        let id = self.require_login()?;
        if self.is_admin() {
            Ok(id)
        } else {
            Err(error::ErrorForbidden("Administrator role required"))
        }
    }
}

/// Resolve the session cookie into a principal. Unknown ids and banned
/// accounts resolve to guest.
async fn authenticate_by_session(session: &Session) -> Option<Principal> {
    let user_id = session.get::<i32>(SESSION_USER_KEY).ok().flatten()?;

    let user = users::Entity::find_by_id(user_id)
        .one(get_db_pool())
        .await
        .map_err(|e| log::error!("Session user lookup failed: {}", e))
        .ok()
        .flatten()?;

    if user.status == users::Status::Banned {
        return None;
    }

    Some(Principal {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}

impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session_fut = Session::from_request(req, payload);

        Box::pin(async move {
            let session = session_fut.await?;
            let client = authenticate_by_session(&session).await;
            Ok(ClientCtx { client })
        })
    }
}
