/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;
use app_core::database::get_stack_by_id;
use app_core::input::{check_index_name, validate_display_name};
use app_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeStackRequest {
    pub name: String,
    pub description: String,
    pub technologies: Vec<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchStackRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddTechnologyRequest {
    pub technology: Uuid,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StackDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub technologies: ListResponse,
}

pub async fn post_create(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<MakeStackRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    if check_index_name(body.name.as_str()).is_err() {
        return Err(WebError::invalid_name("Stack Name"));
    }

    let existing = EStack::find()
        .filter(CStack::Name.eq(body.name.clone()))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Stack"));
    }

    let stack = AStack {
        id: Set(Uuid::new_v4()),
        name: Set(body.name),
        description: Set(body.description),
        created_by: Set(user.id),
        created_at: Set(Utc::now().naive_utc()),
    };

    let stack = stack.insert(&state.db).await?;

    let stack_user = AStackUser {
        id: Set(Uuid::new_v4()),
        stack: Set(stack.id),
        user: Set(user.id),
    };

    stack_user.insert(&state.db).await?;

    for technology in body.technologies {
        let stack_technology = AStackTechnology {
            id: Set(Uuid::new_v4()),
            stack: Set(stack.id),
            technology: Set(technology),
        };

        stack_technology.insert(&state.db).await?;
    }

    let res = BaseResponse {
        error: false,
        message: stack.id.to_string(),
    };

    Ok(Json(res))
}

pub async fn get_all(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<ListResponse>>> {
    let stacks = EStack::find()
        .order_by_asc(CStack::Name)
        .all(&state.db)
        .await?;

    let stacks: ListResponse = stacks
        .iter()
        .map(|s| ListItem {
            id: s.id,
            name: s.name.clone(),
        })
        .collect();

    let res = BaseResponse {
        error: false,
        message: stacks,
    };

    Ok(Json(res))
}

pub async fn get_stack(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(stack): Path<Uuid>,
) -> WebResult<Json<BaseResponse<StackDetailsResponse>>> {
    let stack = get_stack_by_id(&state.db, stack)
        .await?
        .ok_or_else(|| WebError::not_found("Stack"))?;

    let technologies = ETechnology::find()
        .join_rev(
            JoinType::InnerJoin,
            EStackTechnology::belongs_to(entity::technology::Entity)
                .from(CStackTechnology::Technology)
                .to(CTechnology::Id)
                .into(),
        )
        .filter(CStackTechnology::Stack.eq(stack.id))
        .all(&state.db)
        .await?;

    let details = StackDetailsResponse {
        id: stack.id,
        name: stack.name,
        description: stack.description,
        technologies: technologies
            .iter()
            .map(|t| ListItem {
                id: t.id,
                name: t.name.clone(),
            })
            .collect(),
    };

    let res = BaseResponse {
        error: false,
        message: details,
    };

    Ok(Json(res))
}

pub async fn patch_stack(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(stack): Path<Uuid>,
    Json(body): Json<PatchStackRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let stack = get_stack_by_id(&state.db, stack)
        .await?
        .ok_or_else(|| WebError::not_found("Stack"))?;

    if stack.created_by != user.id {
        return Err(WebError::Forbidden(
            "Only the creator can edit a stack".to_string(),
        ));
    }

    let mut astack: AStack = stack.into();

    if let Some(name) = body.name {
        if check_index_name(name.as_str()).is_err() {
            return Err(WebError::invalid_name("Stack Name"));
        }
        astack.name = Set(name);
    }

    if let Some(description) = body.description {
        if let Err(e) = validate_display_name(&description) {
            return Err(WebError::BadRequest(format!("Invalid description: {}", e)));
        }
        astack.description = Set(description);
    }

    astack.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Stack updated".to_string(),
    };

    Ok(Json(res))
}

pub async fn delete_stack(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(stack): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    let stack = get_stack_by_id(&state.db, stack)
        .await?
        .ok_or_else(|| WebError::not_found("Stack"))?;

    if stack.created_by != user.id {
        return Err(WebError::Forbidden(
            "Only the creator can delete a stack".to_string(),
        ));
    }

    stack.delete(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Stack deleted".to_string(),
    };

    Ok(Json(res))
}

pub async fn post_technology(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(stack): Path<Uuid>,
    Json(body): Json<AddTechnologyRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let stack = get_stack_by_id(&state.db, stack)
        .await?
        .ok_or_else(|| WebError::not_found("Stack"))?;

    let technology = ETechnology::find_by_id(body.technology)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Technology"))?;

    let existing = EStackTechnology::find()
        .filter(
            Condition::all()
                .add(CStackTechnology::Stack.eq(stack.id))
                .add(CStackTechnology::Technology.eq(technology.id)),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Stack Technology"));
    }

    let stack_technology = AStackTechnology {
        id: Set(Uuid::new_v4()),
        stack: Set(stack.id),
        technology: Set(technology.id),
    };

    stack_technology.insert(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Technology added".to_string(),
    };

    Ok(Json(res))
}

pub async fn delete_technology(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path((stack, technology)): Path<(Uuid, Uuid)>,
) -> WebResult<Json<BaseResponse<String>>> {
    let stack_technology = EStackTechnology::find()
        .filter(
            Condition::all()
                .add(CStackTechnology::Stack.eq(stack))
                .add(CStackTechnology::Technology.eq(technology)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Stack Technology"))?;

    stack_technology.delete(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Technology removed".to_string(),
    };

    Ok(Json(res))
}
