//! Community board endpoints
//!
//! The community backend wraps every response in a
//! `{ success, data, message, errorCode }` envelope. `unseal` peels it and
//! warns when `success` is false but a body is still present, since the
//! gateway occasionally forwards soft failures with usable data.

use super::{decode, ApiClient, Query};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Checklist,
    Free,
    Qna,
}

/// Envelope common to all community responses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Wrapped<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: T,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

fn default_success() -> bool {
    true
}

fn unseal<T: serde::de::DeserializeOwned>(raw: Value) -> Result<T> {
    let wrapped: Wrapped<T> = decode(raw)?;
    if !wrapped.success {
        tracing::warn!(
            "community response flagged success=false ({:?} {:?})",
            wrapped.error_code,
            wrapped.message
        );
    }
    Ok(wrapped.data)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub post_id: i64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub author_nickname: String,
    #[serde(default)]
    pub author_profile_image: Option<String>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub liked: bool,
}

/// Page block the board list comes in
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBlock<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub has_next: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub post_id: i64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default)]
    pub author_nickname: String,
    #[serde(default)]
    pub author_profile_image: Option<String>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub liked: bool,
    /// Shared checklist snapshot attached to CHECKLIST posts
    #[serde(default)]
    pub checklist: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub reply_id: i64,
    #[serde(default)]
    pub post_id: i64,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default)]
    pub author_nickname: String,
    #[serde(default)]
    pub author_profile_image: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostPayload {
    pub category: Category,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    /// Checklist to share alongside a CHECKLIST post
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_checklist_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
}

/// Filters for the board list. `sort` is `latest` or `popular`.
#[derive(Debug, Clone, Default)]
pub struct ListPostsParams {
    pub category: Option<Category>,
    pub country: Option<String>,
    pub university: Option<String>,
    pub keyword: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ListPostsParams {
    fn to_query(&self) -> Result<Vec<(&'static str, String)>> {
        let mut query = Vec::new();
        if let Some(category) = self.category {
            let label = serde_json::to_value(category)?;
            query.push(("category", label.as_str().unwrap_or("").to_string()));
        }
        if let Some(country) = &self.country {
            query.push(("country", country.clone()));
        }
        if let Some(university) = &self.university {
            query.push(("university", university.clone()));
        }
        if let Some(keyword) = &self.keyword {
            query.push(("keyword", keyword.clone()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            query.push(("size", size.to_string()));
        }
        Ok(query)
    }
}

/// Community service
pub struct CommunityService;

impl CommunityService {
    /// List board posts.
    pub async fn list_posts(
        api: &ApiClient,
        params: &ListPostsParams,
    ) -> Result<PageBlock<PostSummary>> {
        let query = params.to_query()?;
        let query_ref: Option<Query<'_>> = if query.is_empty() { None } else { Some(&query) };
        unseal(api.get("/community/posts", query_ref).await?)
    }

    /// Fetch one post. `user_id` lets the server mark `liked` for the viewer.
    pub async fn get_post(
        api: &ApiClient,
        post_id: i64,
        user_id: Option<i64>,
    ) -> Result<PostDetail> {
        let query;
        let query_ref = match user_id {
            Some(id) => {
                query = [("userId", id.to_string())];
                Some(&query[..])
            }
            None => None,
        };
        unseal(
            api.get(&format!("/community/posts/{}", post_id), query_ref)
                .await?,
        )
    }

    /// Create a post; returns the created detail.
    pub async fn create_post(api: &ApiClient, payload: &CreatePostPayload) -> Result<PostDetail> {
        tracing::info!("CommunityService::create_post [{}]", payload.title);
        let body = serde_json::to_value(payload)?;
        unseal(api.post("/community/posts", None, Some(&body)).await?)
    }

    /// Update a post's fields.
    pub async fn update_post(
        api: &ApiClient,
        post_id: i64,
        payload: &UpdatePostPayload,
    ) -> Result<PostDetail> {
        let body = serde_json::to_value(payload)?;
        unseal(
            api.patch(&format!("/community/posts/{}", post_id), None, Some(&body))
                .await?,
        )
    }

    /// Delete a post.
    pub async fn delete_post(api: &ApiClient, post_id: i64) -> Result<()> {
        api.delete(&format!("/community/posts/{}", post_id), None)
            .await?;
        Ok(())
    }

    /// Like a post.
    pub async fn like_post(api: &ApiClient, post_id: i64) -> Result<()> {
        api.post(&format!("/community/posts/{}/like", post_id), None, None)
            .await?;
        Ok(())
    }

    /// Remove the caller's like.
    pub async fn unlike_post(api: &ApiClient, post_id: i64) -> Result<()> {
        api.delete(&format!("/community/posts/{}/like", post_id), None)
            .await?;
        Ok(())
    }

    /// List a post's replies.
    pub async fn list_replies(api: &ApiClient, post_id: i64) -> Result<Vec<Reply>> {
        unseal(
            api.get(&format!("/community/posts/{}/replies", post_id), None)
                .await?,
        )
    }

    /// Add a reply.
    pub async fn create_reply(api: &ApiClient, post_id: i64, content: &str) -> Result<Reply> {
        let body = serde_json::json!({ "content": content });
        unseal(
            api.post(
                &format!("/community/posts/{}/replies", post_id),
                None,
                Some(&body),
            )
            .await?,
        )
    }

    /// Delete a reply.
    pub async fn delete_reply(api: &ApiClient, reply_id: i64) -> Result<()> {
        api.delete(&format!("/community/replies/{}", reply_id), None)
            .await?;
        Ok(())
    }

    /// Adopt a reply as the accepted answer on a QNA post.
    pub async fn adopt_reply(api: &ApiClient, reply_id: i64) -> Result<()> {
        tracing::info!("CommunityService::adopt_reply {}", reply_id);
        api.post(&format!("/community/replies/{}/adopt", reply_id), None, None)
            .await?;
        Ok(())
    }

    /// Withdraw an adoption.
    pub async fn cancel_adopt_reply(api: &ApiClient, reply_id: i64) -> Result<()> {
        api.delete(&format!("/community/replies/{}/adopt", reply_id), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unseal_returns_data_payload() {
        let replies: Vec<Reply> = unseal(json!({
            "success": true,
            "data": [{"replyId": 1, "postId": 2, "content": "좋은 정보 감사합니다", "adopted": false}],
            "message": null,
        }))
        .unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].reply_id, 1);
    }

    #[test]
    fn unseal_keeps_data_on_soft_failure() {
        // success=false with a body still yields the data; the flag is logged
        let detail: PostDetail = unseal(json!({
            "success": false,
            "errorCode": "C901",
            "message": "partial",
            "data": {"postId": 7, "title": "미국 교환학생 팁"},
        }))
        .unwrap();
        assert_eq!(detail.post_id, 7);
    }

    #[test]
    fn category_query_uses_wire_labels() {
        let params = ListPostsParams {
            category: Some(Category::Qna),
            sort: Some("popular".to_string()),
            ..Default::default()
        };
        let query = params.to_query().unwrap();
        assert!(query.contains(&("category", "QNA".to_string())));
        assert!(query.contains(&("sort", "popular".to_string())));
    }
}
