/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::{Extension, Json};
use chrono::Utc;
use app_core::database::get_link_by_group_and_type;
use app_core::input::check_index_name;
use app_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeLinkRequest {
    pub group: String,
    pub link_type: String,
    pub url: String,
    pub active: bool,
    pub password: Option<String>,
    pub meta_tags: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchLinkRequest {
    pub url: Option<String>,
    pub active: Option<bool>,
    pub password: Option<String>,
    pub meta_tags: Option<serde_json::Value>,
}

pub async fn post_create(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Json(body): Json<MakeLinkRequest>,
) -> WebResult<Json<BaseResponse<MLink>>> {
    if check_index_name(body.group.as_str()).is_err() {
        return Err(WebError::invalid_name("Link Group"));
    }

    if check_index_name(body.link_type.as_str()).is_err() {
        return Err(WebError::invalid_name("Link Type"));
    }

    let existing = get_link_by_group_and_type(&state.db, &body.group, &body.link_type).await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Link"));
    }

    let link = ALink {
        id: Set(Uuid::new_v4()),
        group_name: Set(body.group),
        link_type: Set(body.link_type),
        url: Set(body.url),
        active: Set(body.active),
        password: Set(body.password),
        meta_tags: Set(body.meta_tags.unwrap_or(serde_json::Value::Null)),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
    };

    let link = link.insert(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: link,
    };

    Ok(Json(res))
}

pub async fn get_all(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MLink>>>> {
    let links = ELink::find()
        .filter(CLink::DeletedAt.is_null())
        .order_by_asc(CLink::GroupName)
        .all(&state.db)
        .await?;

    let res = BaseResponse {
        error: false,
        message: links,
    };

    Ok(Json(res))
}

pub async fn get_link(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(link): Path<Uuid>,
) -> WebResult<Json<BaseResponse<MLink>>> {
    let link = ELink::find_by_id(link)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Link"))?;

    let res = BaseResponse {
        error: false,
        message: link,
    };

    Ok(Json(res))
}

pub async fn patch_link(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(link): Path<Uuid>,
    Json(body): Json<PatchLinkRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let link = ELink::find_by_id(link)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Link"))?;

    let mut alink: ALink = link.into();

    if let Some(url) = body.url {
        alink.url = Set(url);
    }

    if let Some(active) = body.active {
        alink.active = Set(active);
    }

    if let Some(password) = body.password {
        alink.password = Set(Some(password));
    }

    if let Some(meta_tags) = body.meta_tags {
        alink.meta_tags = Set(meta_tags);
    }

    alink.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Link updated".to_string(),
    };

    Ok(Json(res))
}

pub async fn delete_link(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(link): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    let link = ELink::find_by_id(link)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Link"))?;

    let mut alink: ALink = link.into();
    alink.deleted_at = Set(Some(Utc::now().naive_utc()));
    alink.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Link deleted".to_string(),
    };

    Ok(Json(res))
}

fn redirect_to(url: &str) -> WebResult<Response> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, url)
        .body(Body::empty())
        .map_err(|e| WebError::InternalServerError(e.to_string()))
}

/// Public redirect endpoint. Inactive, missing, or password-protected
/// links without the right password all land on the fallback page
/// instead of the stored target.
pub async fn get_redirect(
    state: State<Arc<ServerState>>,
    Path(element): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Response> {
    let link_type = query
        .get("type")
        .ok_or_else(|| WebError::missing_param("type"))?;

    let link = get_link_by_group_and_type(&state.db, &element, link_type).await?;

    let link = match link {
        Some(link) if link.active => link,
        _ => return redirect_to(&state.cli.link_fallback_url),
    };

    if let Some(password) = &link.password {
        if query.get("password") != Some(password) {
            return redirect_to(&state.cli.link_fallback_url);
        }
    }

    redirect_to(&link.url)
}
