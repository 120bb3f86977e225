/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use app_core::database::{get_active_session, get_project_owned};
use app_core::projects::{self, CreateProjectInput, ProjectFilter};
use app_core::types::*;
use entity::project::Visibility;
use scanner::imports::Construct;
use scanner::scheduler::sync_project;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeProjectRequest {
    pub organization: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub secret: Option<String>,
    pub stack: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RemoveProjectRequest {
    pub id: Uuid,
}

pub async fn post_create(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<MakeProjectRequest>,
) -> WebResult<Json<BaseResponse<MProject>>> {
    let visibility: Visibility = body
        .visibility
        .parse()
        .map_err(|e: String| WebError::BadRequest(e))?;

    let session = get_active_session(&state.db, user.id)
        .await?
        .ok_or_else(WebError::no_active_session)?;

    let project = projects::create(
        &state,
        &session.access_token,
        user.id,
        CreateProjectInput {
            organization: body.organization,
            name: body.name,
            description: body.description,
            visibility,
            secret: body.secret,
            stack: body.stack,
        },
    )
    .await?;

    let res = BaseResponse {
        error: false,
        message: project,
    };

    Ok(Json(res))
}

pub async fn post_remove(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<RemoveProjectRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let project = get_project_owned(&state.db, user.id, body.id)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let session = get_active_session(&state.db, user.id)
        .await?
        .ok_or_else(WebError::no_active_session)?;

    projects::remove(&state, &session.access_token, project).await?;

    let res = BaseResponse {
        error: false,
        message: "Project removed".to_string(),
    };

    Ok(Json(res))
}

pub async fn get_all(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Json<BaseResponse<Vec<MProject>>>> {
    let visibility = match query.get("visibility") {
        Some(raw) => Some(
            raw.parse::<Visibility>()
                .map_err(|e: String| WebError::BadRequest(e))?,
        ),
        None => None,
    };

    let rows = projects::all_with_filter(
        &state.db,
        ProjectFilter {
            visibility,
            owner: Some(user.id),
        },
    )
    .await?;

    let res = BaseResponse {
        error: false,
        message: rows,
    };

    Ok(Json(res))
}

pub async fn post_sync_all(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<String>>> {
    let rows = projects::all_by_user(&state.db, user.id).await?;

    let mut synced = 0usize;

    for project in &rows {
        sync_project(Arc::clone(&state), project)
            .await
            .map_err(|e| WebError::Upstream(e.to_string()))?;
        synced += 1;
    }

    let res = BaseResponse {
        error: false,
        message: format!("Synced {} projects", synced),
    };

    Ok(Json(res))
}

pub async fn post_sync_one(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Json<BaseResponse<HashMap<String, Construct>>>> {
    let id = query
        .get("id")
        .ok_or_else(|| WebError::missing_param("id"))?
        .parse::<Uuid>()
        .map_err(|_| WebError::BadRequest("Invalid project id".to_string()))?;

    let project = get_project_owned(&state.db, user.id, id)
        .await?
        .ok_or_else(|| WebError::not_found("Project"))?;

    let constructs = sync_project(Arc::clone(&state), &project)
        .await
        .map_err(|e| WebError::Upstream(e.to_string()))?;

    let res = BaseResponse {
        error: false,
        message: constructs,
    };

    Ok(Json(res))
}

pub async fn get_organizations(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<String>>>> {
    let session = get_active_session(&state.db, user.id)
        .await?
        .ok_or_else(WebError::no_active_session)?;

    let orgs = state
        .host
        .list_organizations(&session.access_token)
        .await
        .map_err(|e| WebError::Upstream(e.to_string()))?;

    let res = BaseResponse {
        error: false,
        message: orgs.into_iter().map(|o| o.login).collect(),
    };

    Ok(Json(res))
}

pub async fn get_is_available(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Query(query): Query<HashMap<String, String>>,
) -> WebResult<Json<BaseResponse<bool>>> {
    let name = query
        .get("name")
        .ok_or_else(|| WebError::missing_param("name"))?;
    let organization = query
        .get("organization")
        .ok_or_else(|| WebError::missing_param("organization"))?;

    let session = get_active_session(&state.db, user.id)
        .await?
        .ok_or_else(WebError::no_active_session)?;

    let available =
        projects::is_name_available(&state, &session.access_token, organization, name).await?;

    let res = BaseResponse {
        error: false,
        message: available,
    };

    Ok(Json(res))
}
