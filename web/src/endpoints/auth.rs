/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::authorization::{encode_jwt, oauth_login_create, oauth_login_verify, update_last_login};
use crate::error::{WebError, WebResult};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::{Json, body::Body};
use chrono::Utc;
use app_core::consts::*;
use app_core::input::{check_index_name, validate_display_name};
use app_core::types::*;
use email_address::EmailAddress;
use password_auth::{generate_hash, verify_password};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeLoginRequest {
    pub loginname: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeUserRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn post_register(
    state: State<Arc<ServerState>>,
    Json(body): Json<MakeUserRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    if state.cli.oauth_required || state.cli.disable_registration {
        return Err(WebError::registration_disabled());
    }

    if check_index_name(body.username.as_str()).is_err() {
        return Err(WebError::invalid_name("Username"));
    }

    if let Err(e) = validate_display_name(&body.name) {
        return Err(WebError::BadRequest(format!("Invalid display name: {}", e)));
    }

    if !EmailAddress::is_valid(body.email.as_str()) {
        return Err(WebError::invalid_email());
    }

    let user = EUser::find()
        .filter(
            Condition::any()
                .add(CUser::Username.eq(body.username.clone()))
                .add(CUser::Email.eq(body.email.clone())),
        )
        .one(&state.db)
        .await?;

    if user.is_some() {
        return Err(WebError::already_exists("User"));
    };

    let user = AUser {
        id: Set(Uuid::new_v4()),
        username: Set(body.username.clone()),
        name: Set(body.name.clone()),
        email: Set(body.email.clone()),
        password: Set(Some(generate_hash(body.password.clone()))),
        email_verified: Set(false),
        last_login_at: Set(*NULL_TIME),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
    };

    let user = user.insert(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: user.id.to_string(),
    };

    Ok(Json(res))
}

pub async fn post_login(
    state: State<Arc<ServerState>>,
    Json(body): Json<MakeLoginRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    if state.cli.oauth_required {
        return Err(WebError::oauth_required());
    }

    let user = EUser::find()
        .filter(
            Condition::all()
                .add(
                    Condition::any()
                        .add(CUser::Username.eq(body.loginname.clone()))
                        .add(CUser::Email.eq(body.loginname.clone())),
                )
                .add(CUser::DeletedAt.is_null()),
        )
        .one(&state.db)
        .await?
        .ok_or_else(WebError::invalid_credentials)?;

    let user_password = user.password.clone().ok_or_else(WebError::oauth_required)?;

    verify_password(body.password, &user_password).map_err(|_| WebError::invalid_credentials())?;

    let token = encode_jwt(&state, user.id).map_err(|_| WebError::failed_to_generate_token())?;

    update_last_login(&state, user).await?;

    let res = BaseResponse {
        error: false,
        message: token,
    };

    Ok(Json(res))
}

pub async fn post_oauth_authorize(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<String>>> {
    if !state.cli.oauth_enabled {
        return Err(WebError::oauth_disabled());
    }

    let authorize_url =
        oauth_login_create(&state).map_err(|e| WebError::Unauthorized(e.to_string()))?;

    let res = BaseResponse {
        error: false,
        message: authorize_url.to_string(),
    };

    Ok(Json(res))
}

/// Exchanges the authorization code, persists the session and sends the
/// browser back to the dashboard with the JWT cookie set.
pub async fn get_oauth_callback(
    state: State<Arc<ServerState>>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Response> {
    let code = query.get("code").ok_or_else(WebError::invalid_oauth_code)?;

    let (user, _session) = oauth_login_verify(&state, code.to_string())
        .await
        .map_err(|e| WebError::Upstream(e.to_string()))?;

    let token = encode_jwt(&state, user.id).map_err(|_| WebError::failed_to_generate_token())?;

    let cookie = format!(
        "folio_token={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        token
    );

    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::SET_COOKIE, cookie)
        .header(header::LOCATION, "/")
        .body(Body::empty())
        .map_err(|e| WebError::InternalServerError(e.to_string()))
}

pub async fn post_logout(
    _state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<String>>> {
    let res = BaseResponse {
        error: false,
        message: "Logout Successfully".to_string(),
    };

    Ok(Json(res))
}
