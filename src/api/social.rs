//! Social API endpoints
//!
//! POST   /api/v1/users                                - Register a user
//! GET    /api/v1/users/:user_id                       - Profile by ID
//! GET    /api/v1/profiles/:username                   - Profile by handle
//! GET    /api/v1/profiles/:username/posts             - Posts by a user
//! GET    /api/v1/users/:user_id/suggestions           - Users with shared interests
//! GET    /api/v1/users/:user_id/followers             - Users following this user
//! GET    /api/v1/users/:user_id/following             - Users this user follows
//! POST   /api/v1/users/:user_id/following/:target_id  - Follow a user
//! DELETE /api/v1/users/:user_id/following/:target_id  - Unfollow a user
//! POST   /api/v1/users/:user_id/likes/:post_id        - Like a post
//! GET    /api/v1/users/:user_id/bookmarks             - Reading list
//! POST   /api/v1/users/:user_id/bookmarks/:post_id    - Bookmark a post
//! DELETE /api/v1/users/:user_id/bookmarks/:post_id    - Remove a bookmark
//! GET    /api/v1/users/:user_id/bookmark-images       - Featured images of bookmarks
//! GET    /api/v1/tags                                 - List tags
//! POST   /api/v1/tags                                 - Create a tag
//! GET    /api/v1/posts                                - Feed, newest first
//! POST   /api/v1/posts                                - Create a post
//! GET    /api/v1/posts/by-slug/:slug                  - Post by slug
//! GET    /api/v1/posts/:post_id                       - Post by ID
//! GET    /api/v1/posts/:post_id/featured-image        - Featured painting of a post
//! GET    /api/v1/posts/:post_id/comments              - Comments, newest first
//! POST   /api/v1/posts/:post_id/comments              - Comment on a post
//!
//! Feed endpoints take an optional `viewer_id` query parameter used to flag
//! the viewer's likes and bookmarks.

use atelier_social::{
    Comment, FeedPost, NewPost, Post, SocialStore, SuggestionEngine, Tag, User, UserProfile,
    UserSummary, READING_LIST_LIMIT,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::response::{created, ok, social_error, ApiReply};

/// Shared state for social endpoints
#[derive(Clone)]
pub struct SocialApiState {
    pub store: SocialStore,
    pub suggestions: SuggestionEngine<SocialStore>,
}

impl SocialApiState {
    /// Create social state around a store
    pub fn new(store: SocialStore, suggestions: SuggestionEngine<SocialStore>) -> Self {
        Self { store, suggestions }
    }
}

/// Request to register a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Request to create a tag
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request to create a post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    /// Painting ID to feature
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// Request to comment on a post
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub user_id: String,
    pub text: String,
}

/// Optional viewer for engagement flags
#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Option<String>,
}

/// Register a user
async fn create_user(
    State(state): State<SocialApiState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiReply<User> {
    match state
        .store
        .create_user(&request.name, &request.username, request.image.as_deref())
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "User registered");
            created(user)
        }
        Err(e) => social_error(e),
    }
}

/// Profile by user ID
async fn get_profile(
    State(state): State<SocialApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<UserProfile> {
    match state.store.get_profile(&user_id).await {
        Ok(profile) => ok(profile),
        Err(e) => social_error(e),
    }
}

/// Profile by username
async fn get_profile_by_username(
    State(state): State<SocialApiState>,
    Path(username): Path<String>,
) -> ApiReply<UserProfile> {
    match state.store.get_profile_by_username(&username).await {
        Ok(profile) => ok(profile),
        Err(e) => social_error(e),
    }
}

/// Posts written by a user
async fn list_user_posts(
    State(state): State<SocialApiState>,
    Path(username): Path<String>,
    Query(viewer): Query<ViewerQuery>,
) -> ApiReply<Vec<FeedPost>> {
    match state
        .store
        .list_user_posts(&username, viewer.viewer_id.as_deref())
        .await
    {
        Ok(posts) => ok(posts),
        Err(e) => social_error(e),
    }
}

/// Suggest users who share the requester's tag interests
async fn get_suggestions(
    State(state): State<SocialApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<Vec<UserSummary>> {
    match state.suggestions.get_suggestions(&user_id).await {
        Ok(users) => ok(users),
        Err(e) => social_error(e),
    }
}

/// List followers
async fn list_followers(
    State(state): State<SocialApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<Vec<UserSummary>> {
    match state.store.followers(&user_id).await {
        Ok(users) => ok(users),
        Err(e) => social_error(e),
    }
}

/// List followed users
async fn list_following(
    State(state): State<SocialApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<Vec<UserSummary>> {
    match state.store.following(&user_id).await {
        Ok(users) => ok(users),
        Err(e) => social_error(e),
    }
}

/// Follow a user
async fn follow(
    State(state): State<SocialApiState>,
    Path((user_id, target_id)): Path<(String, String)>,
) -> ApiReply<bool> {
    match state.store.follow(&user_id, &target_id).await {
        Ok(()) => {
            info!(user_id = %user_id, target_id = %target_id, "Followed user");
            ok(true)
        }
        Err(e) => social_error(e),
    }
}

/// Unfollow a user, reporting whether a follow existed
async fn unfollow(
    State(state): State<SocialApiState>,
    Path((user_id, target_id)): Path<(String, String)>,
) -> ApiReply<bool> {
    match state.store.unfollow(&user_id, &target_id).await {
        Ok(existed) => ok(existed),
        Err(e) => social_error(e),
    }
}

/// Like a post
async fn like_post(
    State(state): State<SocialApiState>,
    Path((user_id, post_id)): Path<(String, String)>,
) -> ApiReply<bool> {
    match state.store.like_post(&user_id, &post_id).await {
        Ok(()) => ok(true),
        Err(e) => social_error(e),
    }
}

/// Bookmark a post
async fn bookmark_post(
    State(state): State<SocialApiState>,
    Path((user_id, post_id)): Path<(String, String)>,
) -> ApiReply<bool> {
    match state.store.bookmark_post(&user_id, &post_id).await {
        Ok(()) => ok(true),
        Err(e) => social_error(e),
    }
}

/// Remove a bookmark
async fn remove_bookmark(
    State(state): State<SocialApiState>,
    Path((user_id, post_id)): Path<(String, String)>,
) -> ApiReply<bool> {
    match state.store.remove_bookmark(&user_id, &post_id).await {
        Ok(()) => ok(true),
        Err(e) => social_error(e),
    }
}

/// Most recent bookmarks
async fn reading_list(
    State(state): State<SocialApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<Vec<FeedPost>> {
    match state.store.reading_list(&user_id, READING_LIST_LIMIT).await {
        Ok(posts) => ok(posts),
        Err(e) => social_error(e),
    }
}

/// Featured paintings of bookmarked posts
async fn bookmark_images(
    State(state): State<SocialApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<Vec<String>> {
    match state.store.bookmark_images(&user_id).await {
        Ok(images) => ok(images),
        Err(e) => social_error(e),
    }
}

/// List tags
async fn list_tags(State(state): State<SocialApiState>) -> ApiReply<Vec<Tag>> {
    match state.store.list_tags().await {
        Ok(tags) => ok(tags),
        Err(e) => social_error(e),
    }
}

/// Create a tag
async fn create_tag(
    State(state): State<SocialApiState>,
    Json(request): Json<CreateTagRequest>,
) -> ApiReply<Tag> {
    match state
        .store
        .create_tag(&request.name, &request.description)
        .await
    {
        Ok(tag) => created(tag),
        Err(e) => social_error(e),
    }
}

/// Feed of all posts
async fn list_posts(
    State(state): State<SocialApiState>,
    Query(viewer): Query<ViewerQuery>,
) -> ApiReply<Vec<FeedPost>> {
    match state.store.list_posts(viewer.viewer_id.as_deref()).await {
        Ok(posts) => ok(posts),
        Err(e) => social_error(e),
    }
}

/// Create a post
async fn create_post(
    State(state): State<SocialApiState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiReply<Post> {
    let new_post = NewPost {
        title: request.title,
        description: request.description,
        tag_ids: request.tag_ids,
        featured_image: request.featured_image,
    };
    match state.store.create_post(&request.author_id, new_post).await {
        Ok(post) => {
            info!(post_id = %post.id, slug = %post.slug, "Post published");
            created(post)
        }
        Err(e) => social_error(e),
    }
}

/// Post by slug
async fn get_post_by_slug(
    State(state): State<SocialApiState>,
    Path(slug): Path<String>,
    Query(viewer): Query<ViewerQuery>,
) -> ApiReply<FeedPost> {
    match state
        .store
        .get_post_by_slug(&slug, viewer.viewer_id.as_deref())
        .await
    {
        Ok(post) => ok(post),
        Err(e) => social_error(e),
    }
}

/// Post by ID
async fn get_post(
    State(state): State<SocialApiState>,
    Path(post_id): Path<String>,
) -> ApiReply<Post> {
    match state.store.get_post(&post_id).await {
        Ok(post) => ok(post),
        Err(e) => social_error(e),
    }
}

/// Featured painting ID of a post
async fn post_featured_image(
    State(state): State<SocialApiState>,
    Path(post_id): Path<String>,
) -> ApiReply<Option<String>> {
    match state.store.post_featured_image(&post_id).await {
        Ok(image) => ok(image),
        Err(e) => social_error(e),
    }
}

/// Comments on a post
async fn list_comments(
    State(state): State<SocialApiState>,
    Path(post_id): Path<String>,
) -> ApiReply<Vec<Comment>> {
    match state.store.list_comments(&post_id).await {
        Ok(comments) => ok(comments),
        Err(e) => social_error(e),
    }
}

/// Comment on a post
async fn add_comment(
    State(state): State<SocialApiState>,
    Path(post_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiReply<Comment> {
    match state
        .store
        .add_comment(&request.user_id, &post_id, &request.text)
        .await
    {
        Ok(comment) => created(comment),
        Err(e) => social_error(e),
    }
}

/// Create social routes
pub fn social_routes(state: SocialApiState) -> Router {
    Router::new()
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/:user_id", get(get_profile))
        .route("/api/v1/profiles/:username", get(get_profile_by_username))
        .route("/api/v1/profiles/:username/posts", get(list_user_posts))
        .route("/api/v1/users/:user_id/suggestions", get(get_suggestions))
        .route("/api/v1/users/:user_id/followers", get(list_followers))
        .route("/api/v1/users/:user_id/following", get(list_following))
        .route(
            "/api/v1/users/:user_id/following/:target_id",
            post(follow).delete(unfollow),
        )
        .route("/api/v1/users/:user_id/likes/:post_id", post(like_post))
        .route("/api/v1/users/:user_id/bookmarks", get(reading_list))
        .route(
            "/api/v1/users/:user_id/bookmarks/:post_id",
            post(bookmark_post).delete(remove_bookmark),
        )
        .route("/api/v1/users/:user_id/bookmark-images", get(bookmark_images))
        .route("/api/v1/tags", get(list_tags).post(create_tag))
        .route("/api/v1/posts", get(list_posts).post(create_post))
        .route("/api/v1/posts/by-slug/:slug", get(get_post_by_slug))
        .route("/api/v1/posts/:post_id", get(get_post))
        .route("/api/v1/posts/:post_id/featured-image", get(post_featured_image))
        .route(
            "/api/v1/posts/:post_id/comments",
            get(list_comments).post(add_comment),
        )
        .with_state(state)
}
