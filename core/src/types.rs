/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::{GITHUB_API_URL, GITHUB_AUTHORIZE_URL, GITHUB_TOKEN_URL};
use super::github::RepoHost;
use super::input::{greater_than_zero, port_in_range};
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "Folio", display_name = "Folio", bin_name = "folio-server", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "FOLIO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "FOLIO_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "FOLIO_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(
        long,
        env = "FOLIO_SERVE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub serve_url: String,
    #[arg(long, env = "FOLIO_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "FOLIO_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "FOLIO_JWT_SECRET_FILE")]
    pub jwt_secret_file: String,
    #[arg(long, env = "FOLIO_DISABLE_REGISTRATION", default_value = "false")]
    pub disable_registration: bool,
    #[arg(long, env = "FOLIO_OAUTH_ENABLED", default_value = "false")]
    pub oauth_enabled: bool,
    #[arg(long, env = "FOLIO_OAUTH_REQUIRED", default_value = "false")]
    pub oauth_required: bool,
    #[arg(long, env = "FOLIO_OAUTH_CLIENT_ID")]
    pub oauth_client_id: Option<String>,
    #[arg(long, env = "FOLIO_OAUTH_CLIENT_SECRET_FILE")]
    pub oauth_client_secret_file: Option<String>,
    #[arg(long, env = "FOLIO_OAUTH_AUTHORIZE_URL", default_value = GITHUB_AUTHORIZE_URL)]
    pub oauth_authorize_url: String,
    #[arg(long, env = "FOLIO_OAUTH_TOKEN_URL", default_value = GITHUB_TOKEN_URL)]
    pub oauth_token_url: String,
    #[arg(long, env = "FOLIO_GITHUB_API_URL", default_value = GITHUB_API_URL)]
    pub github_api_url: String,
    #[arg(long, env = "FOLIO_LINK_FALLBACK_URL", default_value = "/404")]
    pub link_fallback_url: String,
    #[arg(long, env = "FOLIO_SYNC_INTERVAL", value_parser = greater_than_zero::<i64>, default_value = "3600")]
    pub sync_interval: i64,
}

pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
    pub host: Arc<dyn RepoHost>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    pub name: String,
}

pub type ListResponse = Vec<ListItem>;

pub type EBlog = blog::Entity;
pub type ELink = link::Entity;
pub type EProject = project::Entity;
pub type EProjectTechnology = project_technology::Entity;
pub type ESession = session::Entity;
pub type EStack = stack::Entity;
pub type EStackTechnology = stack_technology::Entity;
pub type EStackUser = stack_user::Entity;
pub type ETechnology = technology::Entity;
pub type ETemplate = template::Entity;
pub type EUser = user::Entity;

pub type MBlog = blog::Model;
pub type MLink = link::Model;
pub type MProject = project::Model;
pub type MProjectTechnology = project_technology::Model;
pub type MSession = session::Model;
pub type MStack = stack::Model;
pub type MStackTechnology = stack_technology::Model;
pub type MStackUser = stack_user::Model;
pub type MTechnology = technology::Model;
pub type MTemplate = template::Model;
pub type MUser = user::Model;

pub type ABlog = blog::ActiveModel;
pub type ALink = link::ActiveModel;
pub type AProject = project::ActiveModel;
pub type AProjectTechnology = project_technology::ActiveModel;
pub type ASession = session::ActiveModel;
pub type AStack = stack::ActiveModel;
pub type AStackTechnology = stack_technology::ActiveModel;
pub type AStackUser = stack_user::ActiveModel;
pub type ATechnology = technology::ActiveModel;
pub type ATemplate = template::ActiveModel;
pub type AUser = user::ActiveModel;

pub type CBlog = blog::Column;
pub type CLink = link::Column;
pub type CProject = project::Column;
pub type CProjectTechnology = project_technology::Column;
pub type CSession = session::Column;
pub type CStack = stack::Column;
pub type CStackTechnology = stack_technology::Column;
pub type CStackUser = stack_user::Column;
pub type CTechnology = technology::Column;
pub type CTemplate = template::Column;
pub type CUser = user::Column;
