use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub community_id: Option<String>,
    pub song_id: Option<String>,
    pub content: String,
    pub vote_count: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub id: String,
    pub user_id: String,
    pub community_id: Option<String>,
    pub song_id: Option<String>,
    pub content: String,
    pub vote_count: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct PostRequest {
    pub content: String,
    pub community_id: Option<String>,
    pub song_id: Option<String>,
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::posts)]
pub struct UpdatePost {
    pub content: Option<String>,
    pub song_id: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::post_votes)]
pub struct NewPostVote {
    pub post_id: String,
    pub user_id: String,
    pub value: i32,
}

#[derive(Deserialize)]
pub struct VoteQuery {
    pub value: i32,
}

#[derive(Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub user_nickname: String,
    pub community_id: Option<String>,
    pub song_id: Option<String>,
    pub vote_count: i32,
    /// The authenticated caller's current vote on this post (0 when none).
    pub user_vote: i32,
    pub created_at: Option<NaiveDateTime>,
}

impl PostResponse {
    pub fn from_post(post: Post, user_nickname: String) -> Self {
        Self {
            id: post.id,
            content: post.content,
            user_id: post.user_id,
            user_nickname,
            community_id: post.community_id,
            song_id: post.song_id,
            vote_count: post.vote_count,
            user_vote: 0,
            created_at: post.created_at,
        }
    }
}
