use diesel::prelude::*;

use crate::db::DbConn;
use crate::error::ApiError;
use crate::models::token_models::Claims;
use crate::schema::users;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_USER: &str = "USER";

pub fn load_role(conn: &mut DbConn, user_id: &str) -> Result<String, ApiError> {
    users::table
        .filter(users::id.eq(user_id))
        .select(users::role)
        .first::<String>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub fn is_admin(conn: &mut DbConn, claims: &Claims) -> Result<bool, ApiError> {
    Ok(load_role(conn, &claims.sub)? == ROLE_ADMIN)
}

/// Check that the caller owns the resource or is an admin.
pub fn check_owner_or_admin(
    conn: &mut DbConn,
    claims: &Claims,
    owner_id: &str,
) -> Result<(), ApiError> {
    if claims.sub == owner_id {
        return Ok(());
    }
    if is_admin(conn, claims)? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not own this resource".to_string(),
        ))
    }
}

pub fn require_admin(conn: &mut DbConn, claims: &Claims) -> Result<(), ApiError> {
    if is_admin(conn, claims)? {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin only".to_string()))
    }
}
