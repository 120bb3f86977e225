/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result, bail};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Json, Response};
use chrono::{Duration, Utc};
use app_core::input::load_secret;
use app_core::types::*;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub id: Uuid,
}

#[derive(Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

pub async fn authorize(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, (StatusCode, Json<BaseResponse<String>>)> {
    let auth_header = req.headers_mut().get(axum::http::header::AUTHORIZATION);

    let auth_header = match auth_header {
        Some(header) => header.to_str().map_err(|_| {
            (
                StatusCode::FORBIDDEN,
                Json(BaseResponse {
                    error: true,
                    message: "Authorization header empty".to_string(),
                }),
            )
        })?,
        None => {
            return Err((
                StatusCode::FORBIDDEN,
                Json(BaseResponse {
                    error: true,
                    message: "Authorization header not found".to_string(),
                }),
            ));
        }
    };

    let mut header = auth_header.split_whitespace();

    let (bearer, token) = (header.next(), header.next());

    if bearer != Some("Bearer") || token.is_none() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(BaseResponse {
                error: true,
                message: "Invalid Authorization header".to_string(),
            }),
        ));
    }

    let token_data = match decode_jwt(&state, token.unwrap_or_default()) {
        Ok(data) => data,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(BaseResponse {
                    error: true,
                    message: "Unable to decode token".to_string(),
                }),
            ));
        }
    };

    let current_user = match EUser::find_by_id(token_data.claims.id)
        .one(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BaseResponse {
                    error: true,
                    message: "Database error".to_string(),
                }),
            )
        })? {
        Some(user) if user.deleted_at.is_none() => user,
        _ => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(BaseResponse {
                    error: true,
                    message: "User not found".to_string(),
                }),
            ));
        }
    };

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

pub fn encode_jwt(state: &ServerState, id: Uuid) -> Result<String, StatusCode> {
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(24);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;

    let claim = Claims { iat, exp, id };
    let secret = load_secret(&state.cli.jwt_secret_file);

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn decode_jwt(state: &ServerState, jwt: &str) -> Result<TokenData<Claims>, StatusCode> {
    let secret = load_secret(&state.cli.jwt_secret_file);

    decode(
        jwt,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)
}

pub async fn update_last_login(state: &ServerState, user: MUser) -> Result<MUser> {
    let mut auser: AUser = user.into();

    auser.last_login_at = Set(Utc::now().naive_utc());
    Ok(auser
        .update(&state.db)
        .await
        .context("Failed to update user last login")?)
}

/// Builds the provider authorization URL the dashboard redirects to.
pub fn oauth_login_create(state: &ServerState) -> Result<Url> {
    if !state.cli.oauth_enabled {
        bail!("OAuth is not enabled");
    }

    let client_id = state
        .cli
        .oauth_client_id
        .as_ref()
        .context("OAuth client ID not configured")?;

    let redirect_uri = format!("{}/auth/github/callback", state.cli.serve_url);
    let state_param = Uuid::new_v4().to_string();

    let auth_url = Url::parse_with_params(
        &state.cli.oauth_authorize_url,
        &[
            ("client_id", client_id.as_str()),
            ("redirect_uri", &redirect_uri),
            ("scope", "repo read:org user:email"),
            ("state", &state_param),
        ],
    )
    .context("Failed to build authorization URL")?;

    Ok(auth_url)
}

/// Exchanges the authorization code, upserts the user and persists the
/// token material as a new session row.
pub async fn oauth_login_verify(
    state: &ServerState,
    authorization_code: String,
) -> Result<(MUser, MSession)> {
    if !state.cli.oauth_enabled {
        bail!("OAuth is not enabled");
    }

    let client_id = state
        .cli
        .oauth_client_id
        .as_ref()
        .context("OAuth client ID not configured")?;
    let client_secret_file = state
        .cli
        .oauth_client_secret_file
        .as_ref()
        .context("OAuth client secret file not configured")?;

    let http_client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("Failed to create HTTP client")?;

    let token_response = http_client
        .post(&state.cli.oauth_token_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", &authorization_code),
            ("client_id", client_id),
            ("client_secret", &load_secret(client_secret_file)),
        ])
        .send()
        .await
        .context("Token exchange request failed")?;

    if !token_response.status().is_success() {
        let status = token_response.status();
        let body = token_response.text().await.unwrap_or_default();
        bail!("Token exchange failed {}: {}", status, body);
    }

    let token_data: OAuthTokenResponse = token_response
        .json()
        .await
        .context("Failed to parse token response")?;

    let remote_user = state
        .host
        .get_authenticated_user(&token_data.access_token)
        .await
        .context("Failed to fetch user info")?;

    let user = create_or_update_user(state, &remote_user).await?;

    let session = ASession {
        id: Set(Uuid::new_v4()),
        user: Set(user.id),
        access_token: Set(token_data.access_token),
        refresh_token: Set(token_data.refresh_token),
        expires_at: Set(token_data
            .expires_in
            .map(|secs| (Utc::now() + Duration::seconds(secs)).naive_utc())),
        created_at: Set(Utc::now().naive_utc()),
    };

    let session = session
        .insert(&state.db)
        .await
        .context("Failed to create session")?;

    Ok((user, session))
}

async fn create_or_update_user(
    state: &ServerState,
    remote: &app_core::github::RemoteUser,
) -> Result<MUser> {
    let email = remote
        .email
        .clone()
        .unwrap_or_else(|| format!("{}@users.noreply.github.com", remote.login));
    let name = remote.name.clone().unwrap_or_else(|| remote.login.clone());

    match EUser::find()
        .filter(
            Condition::any()
                .add(CUser::Username.eq(&remote.login))
                .add(CUser::Email.eq(&email)),
        )
        .one(&state.db)
        .await
        .context("Database error while finding user")?
    {
        Some(mut user) => {
            if user.deleted_at.is_some() {
                bail!("Account is deactivated");
            }

            if user.email != email {
                let mut auser: AUser = user.into();
                auser.email = Set(email.clone());
                user = auser
                    .update(&state.db)
                    .await
                    .context("Failed to update user email")?;
            }

            if user.name != name {
                let mut auser: AUser = user.into();
                auser.name = Set(name.clone());
                user = auser
                    .update(&state.db)
                    .await
                    .context("Failed to update user name")?;
            }

            update_last_login(state, user).await
        }
        None => {
            let new_user = AUser {
                id: Set(Uuid::new_v4()),
                username: Set(remote.login.clone()),
                name: Set(name),
                email: Set(email),
                password: Set(None),
                // OAuth identities arrive verified by the provider.
                email_verified: Set(true),
                last_login_at: Set(Utc::now().naive_utc()),
                created_at: Set(Utc::now().naive_utc()),
                deleted_at: Set(None),
            };

            new_user
                .insert(&state.db)
                .await
                .context("Failed to create user")
        }
    }
}
