/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod authorization;
pub mod endpoints;
pub mod error;
mod tests;

use axum::routing::{get, post};
use axum::{Router, middleware};
use app_core::types::ServerState;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn app(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(
            state
                .cli
                .serve_url
                .parse()
                .expect("invalid serve url for CORS"),
        ))
        .allow_headers(vec![AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/projects/create", post(endpoints::projects::post_create))
        .route("/projects/remove", post(endpoints::projects::post_remove))
        .route("/projects/all", get(endpoints::projects::get_all))
        .route(
            "/user/projects/sync",
            post(endpoints::projects::post_sync_all),
        )
        .route(
            "/user/project/sync",
            post(endpoints::projects::post_sync_one),
        )
        .route(
            "/user/organizations/all",
            get(endpoints::projects::get_organizations),
        )
        .route(
            "/user/projects/is-available",
            get(endpoints::projects::get_is_available),
        )
        .route(
            "/user/settings",
            get(endpoints::user::get)
                .patch(endpoints::user::patch)
                .delete(endpoints::user::delete),
        )
        .route("/blogs/create", post(endpoints::blogs::post_create))
        .route("/blogs/all", get(endpoints::blogs::get_all))
        .route(
            "/blogs/{blog}",
            get(endpoints::blogs::get_blog)
                .patch(endpoints::blogs::patch_blog)
                .delete(endpoints::blogs::delete_blog),
        )
        .route("/links/create", post(endpoints::links::post_create))
        .route("/links/all", get(endpoints::links::get_all))
        .route(
            "/links/{link}",
            get(endpoints::links::get_link)
                .patch(endpoints::links::patch_link)
                .delete(endpoints::links::delete_link),
        )
        .route(
            "/technologies/create",
            post(endpoints::technologies::post_create),
        )
        .route("/technologies/all", get(endpoints::technologies::get_all))
        .route(
            "/technologies/{technology}",
            get(endpoints::technologies::get_technology)
                .patch(endpoints::technologies::patch_technology)
                .delete(endpoints::technologies::delete_technology),
        )
        .route("/stacks/create", post(endpoints::stacks::post_create))
        .route("/stacks/all", get(endpoints::stacks::get_all))
        .route(
            "/stacks/{stack}",
            get(endpoints::stacks::get_stack)
                .patch(endpoints::stacks::patch_stack)
                .delete(endpoints::stacks::delete_stack),
        )
        .route(
            "/stacks/{stack}/technologies",
            post(endpoints::stacks::post_technology),
        )
        .route(
            "/stacks/{stack}/technologies/{technology}",
            axum::routing::delete(endpoints::stacks::delete_technology),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorization::authorize,
        ))
        .route("/user/register", post(endpoints::auth::post_register))
        .route("/user/login", post(endpoints::auth::post_login))
        .route("/user/logout", post(endpoints::auth::post_logout))
        .route("/auth/github", post(endpoints::auth::post_oauth_authorize))
        .route(
            "/auth/github/callback",
            get(endpoints::auth::get_oauth_callback),
        )
        .route("/link/{element}", get(endpoints::links::get_redirect))
        .route("/health", get(endpoints::get_health))
        .fallback(endpoints::handle_404)
        .layer(cors)
        .with_state(state)
}

pub async fn serve_web(state: Arc<ServerState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);
    let app = app(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    axum::serve(listener, app).await
}
