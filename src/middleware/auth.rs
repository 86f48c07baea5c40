// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Role, User},
};

// Bearer-token middleware: decodes the JWT, loads the live user record and
// stashes it in the request extensions for the extractors below.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(bearer.token()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Extractor handing the authenticated user to handlers.
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

/// A fixed per-operation role allow-list.
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [Role];
}

/// Guard extractor: including `RequireRole<T>` in a handler's arguments
/// rejects callers whose role is outside `T::allowed()`.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::allowed().contains(&user.role) {
            return Err(AppError::InsufficientRole);
        }
        Ok(RequireRole(PhantomData))
    }
}

/// Roles that may issue passes and book aarti slots.
pub struct PassIssuers;
impl RoleSet for PassIssuers {
    fn allowed() -> &'static [Role] {
        &[Role::Trustee, Role::Assistant, Role::Admin]
    }
}

/// The attendant-facing surface is attendant-only.
pub struct AttendantOnly;
impl RoleSet for AttendantOnly {
    fn allowed() -> &'static [Role] {
        &[Role::Attendant]
    }
}

/// Gate operations: scanners, plus admins stepping in.
pub struct GateCrew;
impl RoleSet for GateCrew {
    fn allowed() -> &'static [Role] {
        &[Role::Scanner, Role::Admin]
    }
}

/// Slot capacity management.
pub struct SlotManagers;
impl RoleSet for SlotManagers {
    fn allowed() -> &'static [Role] {
        &[Role::Admin, Role::Trustee]
    }
}

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [Role] {
        &[Role::Admin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_issuance_excludes_field_roles() {
        let allowed = PassIssuers::allowed();
        assert!(allowed.contains(&Role::Trustee));
        assert!(allowed.contains(&Role::Assistant));
        assert!(allowed.contains(&Role::Admin));
        assert!(!allowed.contains(&Role::Attendant));
        assert!(!allowed.contains(&Role::Scanner));
    }

    #[test]
    fn attendant_surface_is_attendant_only() {
        assert_eq!(AttendantOnly::allowed(), &[Role::Attendant]);
    }

    #[test]
    fn gate_crew_is_scanner_and_admin() {
        let allowed = GateCrew::allowed();
        assert!(allowed.contains(&Role::Scanner));
        assert!(allowed.contains(&Role::Admin));
        assert_eq!(allowed.len(), 2);
    }

    #[test]
    fn only_admins_manage_users_and_settings() {
        assert_eq!(AdminOnly::allowed(), &[Role::Admin]);
    }
}
