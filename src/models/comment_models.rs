use chrono::NaiveDateTime;
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub user_nickname: String,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
}

impl CommentResponse {
    pub fn from_comment(comment: Comment, user_nickname: String) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            user_nickname,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}
