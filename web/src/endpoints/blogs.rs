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
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeBlogRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PatchBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

pub async fn post_create(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Json(body): Json<MakeBlogRequest>,
) -> WebResult<Json<BaseResponse<MBlog>>> {
    if let Err(e) = validate_display_name(&body.title) {
        return Err(WebError::BadRequest(format!("Invalid title: {}", e)));
    }

    if check_index_name(body.slug.as_str()).is_err() {
        return Err(WebError::invalid_name("Blog Slug"));
    }

    let existing = EBlog::find()
        .filter(CBlog::Slug.eq(body.slug.clone()))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Blog Slug"));
    }

    let blog = ABlog {
        id: Set(Uuid::new_v4()),
        author: Set(user.id),
        title: Set(body.title),
        slug: Set(body.slug),
        content: Set(body.content),
        published: Set(body.published),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
    };

    let blog = blog.insert(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: blog,
    };

    Ok(Json(res))
}

pub async fn get_all(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MBlog>>>> {
    let blogs = EBlog::find()
        .filter(
            Condition::all()
                .add(CBlog::Author.eq(user.id))
                .add(CBlog::DeletedAt.is_null()),
        )
        .order_by_desc(CBlog::CreatedAt)
        .all(&state.db)
        .await?;

    let res = BaseResponse {
        error: false,
        message: blogs,
    };

    Ok(Json(res))
}

pub async fn get_blog(
    state: State<Arc<ServerState>>,
    Extension(_user): Extension<MUser>,
    Path(blog): Path<Uuid>,
) -> WebResult<Json<BaseResponse<MBlog>>> {
    let blog = EBlog::find_by_id(blog)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Blog"))?;

    let res = BaseResponse {
        error: false,
        message: blog,
    };

    Ok(Json(res))
}

pub async fn patch_blog(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(blog): Path<Uuid>,
    Json(body): Json<PatchBlogRequest>,
) -> WebResult<Json<BaseResponse<String>>> {
    let blog = EBlog::find_by_id(blog)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Blog"))?;

    if blog.author != user.id {
        return Err(WebError::Forbidden(
            "Only the author can edit a blog".to_string(),
        ));
    }

    let mut ablog: ABlog = blog.into();

    if let Some(title) = body.title {
        if let Err(e) = validate_display_name(&title) {
            return Err(WebError::BadRequest(format!("Invalid title: {}", e)));
        }
        ablog.title = Set(title);
    }

    if let Some(content) = body.content {
        ablog.content = Set(content);
    }

    if let Some(published) = body.published {
        ablog.published = Set(published);
    }

    ablog.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Blog updated".to_string(),
    };

    Ok(Json(res))
}

pub async fn delete_blog(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(blog): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    let blog = EBlog::find_by_id(blog)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Blog"))?;

    if blog.author != user.id {
        return Err(WebError::Forbidden(
            "Only the author can delete a blog".to_string(),
        ));
    }

    let mut ablog: ABlog = blog.into();
    ablog.deleted_at = Set(Some(Utc::now().naive_utc()));
    ablog.update(&state.db).await?;

    let res = BaseResponse {
        error: false,
        message: "Blog deleted".to_string(),
    };

    Ok(Json(res))
}
