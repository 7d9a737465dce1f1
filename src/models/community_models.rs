use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

pub const ROLE_LEADER: &str = "LEADER";
pub const ROLE_MEMBER: &str = "MEMBER";

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::communities)]
pub struct Community {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub leader_id: String,
    pub radio_playlist_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::communities)]
pub struct NewCommunity {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub leader_id: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct CommunityRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = crate::schema::communities)]
#[diesel(treat_none_as_null = false)]
pub struct UpdateCommunity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::schema::community_members)]
pub struct CommunityMember {
    pub community_id: String,
    pub user_id: String,
    pub role: String,
    pub joined_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::community_members)]
pub struct NewCommunityMember {
    pub community_id: String,
    pub user_id: String,
    pub role: String,
    pub joined_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Deserialize)]
pub struct CommunityResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub leader_id: String,
    pub radio_playlist_id: Option<String>,
    pub member_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_member: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl CommunityResponse {
    pub fn from_community(community: Community, member_count: i64) -> Self {
        Self {
            id: community.id,
            name: community.name,
            description: community.description,
            image_url: community.image_url,
            leader_id: community.leader_id,
            radio_playlist_id: community.radio_playlist_id,
            member_count,
            is_member: None,
            user_role: None,
            created_at: community.created_at,
        }
    }
}
