// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::User};

/// Valida o Bearer token e injeta o `User` nas extensions da requisição.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header
        && let Some(token) = auth_header.strip_prefix("Bearer ")
    {
        let user = app_state.auth_service.validate_token(token).await?;
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    Err(AppError::InvalidToken)
}

/// Extrator para obter o usuário autenticado diretamente nos handlers.
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

/// Extrator que exige papel de administrador. Depende do `auth_middleware`
/// já ter populado as extensions.
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !crate::common::policy::eh_admin(user.papel) {
            return Err(AppError::AccessDenied(
                "Esta ação exige papel de administrador.",
            ));
        }

        Ok(RequireAdmin(user))
    }
}
