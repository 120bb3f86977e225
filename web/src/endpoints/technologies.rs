/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use app_core::input::{check_index_name, validate_display_name};
use app_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeTechnologyRequest {
    pub name: String,
    pub description: String,
    pub import_path: String,
    /// Optional code template stored alongside the catalog entry.
    pub template: Option<MakeTemplateRequest>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeTemplateRequest {
    pub name: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchTechnologyRequest {
    pub description: Option<String>,
    pub import_path: Option<String>,
}

pub async fn post_create(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Json(body): Json<MakeTechnologyRequest>,
) -> WebResult<Json<BaseResponse<MTechnology>>> {
    if check_index_name(body.name.as_str()).is_err() {
        return Err(WebError::invalid_name("Technology Name"));
    }

    let existing = ETechnology::find()
        .filter(CTechnology::Name.eq(body.name.clone()))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Technology"));
    }

    let template = match body.template {
        Some(template) => {
            if let Err(e) = validate_display_name(&template.name) {
                return Err(WebError::BadRequest(format!("Invalid template name: {}", e)));
            }

            let atemplate = ATemplate {
                id: Set(Uuid::new_v4()),
                name: Set(template.name),
                content: Set(template.content),
                created_at: Set(Utc::now().naive_utc()),
            };

            Some(atemplate.insert(&state.db).await?.id)
        }
        None => None,
    };

    let technology = ATechnology {
        id: Set(Uuid::new_v4()),
        name: Set(body.name),
        description: Set(body.description),
        import_path: Set(body.import_path),
        template: Set(template),
        created_at: Set(Utc::now().naive_utc()),
    };

    let technology = technology.insert(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: technology,
    };

    Ok(Json(res))
}

pub async fn get_all(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MTechnology>>>> {
    let technologies = ETechnology::find()
        .order_by_asc(CTechnology::Name)
        .all(&state.db)
        .await?;

    let res = BaseResponse {
        error: false,
        message: technologies,
    };

    Ok(Json(res))
}

pub async fn get_technology(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(technology): Path<Uuid>,
) -> WebResult<Json<BaseResponse<MTechnology>>> {
    let technology = ETechnology::find_by_id(technology)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Technology"))?;

    let res = BaseResponse {
        error: false,
        message: technology,
    };

    Ok(Json(res))
}

pub async fn patch_technology(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(technology): Path<Uuid>,
    Json(body): Json<PatchTechnologyRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let technology = ETechnology::find_by_id(technology)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Technology"))?;

    let mut atechnology: ATechnology = technology.into();

    if let Some(description) = body.description {
        atechnology.description = Set(description);
    }

    if let Some(import_path) = body.import_path {
        atechnology.import_path = Set(import_path);
    }

    atechnology.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Technology updated".to_string(),
    };

    Ok(Json(res))
}

pub async fn delete_technology(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(technology): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    let technology = ETechnology::find_by_id(technology)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Technology"))?;

    technology.delete(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Technology deleted".to_string(),
    };

    Ok(Json(res))
}
