use actix_web::web;

use crate::handlers::user_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("/search", web::get().to(user_handlers::search_users))
            .route("/me", web::get().to(user_handlers::get_current_user))
            .route("/{id}/follow", web::post().to(user_handlers::follow_user))
            .route(
                "/{id}/unfollow",
                web::post().to(user_handlers::unfollow_user),
            )
            .route(
                "/{id}/followers",
                web::get().to(user_handlers::get_followers),
            )
            .route(
                "/{id}/following",
                web::get().to(user_handlers::get_following),
            )
            .route("/{id}", web::get().to(user_handlers::get_user))
            .route("/{id}", web::put().to(user_handlers::update_user))
            .route("/{id}", web::delete().to(user_handlers::delete_user)),
    );
}
