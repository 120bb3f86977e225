/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod auth;
pub mod blogs;
pub mod links;
pub mod projects;
pub mod stacks;
pub mod technologies;
pub mod user;

use crate::error::{WebError, WebResult};
use axum::extract::Json;
use app_core::types::BaseResponse;

pub async fn handle_404() -> WebError {
    WebError::NotFound("Not Found".to_string())
}

pub async fn get_health() -> WebResult<Json<BaseResponse<String>>> {
    let res = BaseResponse {
        error: false,
        message: "200 ALIVE".to_string(),
    };

    Ok(Json(res))
}
