use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: String,
    pub name: String,
    pub last_name: Option<String>,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub email_verified: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub last_name: Option<String>,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub email_verified: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = false)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub last_name: Option<String>,
    pub nickname: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    /// Whether the authenticated caller follows this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<bool>,
    /// Role within a community, set on community member listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_role: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            last_name: u.last_name,
            nickname: u.nickname,
            email: u.email,
            role: u.role,
            bio: u.bio,
            profile_picture_url: u.profile_picture_url,
            created_at: u.created_at,
            following: None,
            community_role: None,
        }
    }
}
