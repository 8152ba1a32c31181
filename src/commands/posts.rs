use tauri::State;

use crate::api::ApiClient;
use crate::types::post::{HelloResponse, PostsResponse};

pub async fn posts_list_with(
    client: &ApiClient,
    limit: Option<u32>,
) -> Result<PostsResponse, String> {
    Ok(client.posts(limit).await?)
}

pub async fn posts_by_user_with(
    client: &ApiClient,
    user_id: i64,
) -> Result<PostsResponse, String> {
    Ok(client.posts_by_user(user_id).await?)
}

#[tauri::command]
pub async fn posts_list(
    client: State<'_, ApiClient>,
    limit: Option<u32>,
) -> Result<PostsResponse, String> {
    posts_list_with(&client, limit).await
}

#[tauri::command]
pub async fn posts_by_user(
    client: State<'_, ApiClient>,
    user_id: i64,
) -> Result<PostsResponse, String> {
    posts_by_user_with(&client, user_id).await
}

/// Connectivity check against `/api/hello`.
#[tauri::command]
pub async fn api_hello(client: State<'_, ApiClient>) -> Result<HelloResponse, String> {
    Ok(client.hello().await?)
}
