/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use app_core::input::{check_index_name, validate_display_name};
use app_core::types::*;
use email_address::EmailAddress;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug)]
pub struct UserInfoResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchUserSettingsRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn get(
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<UserInfoResponse>>> {
    let user_info = UserInfoResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        email_verified: user.email_verified,
    };

    let res = BaseResponse {
        error: false,
        message: user_info,
    };

    Ok(Json(res))
}

pub async fn patch(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<PatchUserSettingsRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let mut auser: AUser = user.clone().into();

    if let Some(username) = body.username {
        if check_index_name(username.as_str()).is_err() {
            return Err(WebError::invalid_name("Username"));
        }

        let existing = EUser::find()
            .filter(
                Condition::all()
                    .add(CUser::Username.eq(username.clone()))
                    .add(CUser::Id.ne(user.id)),
            )
            .one(&state.db)
            .await?;

        if existing.is_some() {
            return Err(WebError::already_exists("Username"));
        }

        auser.username = Set(username);
    }

    if let Some(name) = body.name {
        if let Err(e) = validate_display_name(&name) {
            return Err(WebError::BadRequest(format!("Invalid display name: {}", e)));
        }
        auser.name = Set(name);
    }

    if let Some(email) = body.email {
        if !EmailAddress::is_valid(email.as_str()) {
            return Err(WebError::invalid_email());
        }
        auser.email = Set(email);
        auser.email_verified = Set(false);
    }

    auser.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Settings updated".to_string(),
    };

    Ok(Json(res))
}

/// Soft delete: the account disappears from login and list queries but
/// keeps its rows.
pub async fn delete(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<String>>> {
    let mut auser: AUser = user.into();
    auser.deleted_at = Set(Some(Utc::now().naive_utc()));
    auser.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "User deleted".to_string(),
    };

    Ok(Json(res))
}
