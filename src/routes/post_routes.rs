use actix_web::web;

use crate::handlers::post_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/posts")
            .route("", web::post().to(post_handlers::create_post))
            .route("/feed", web::get().to(post_handlers::get_feed))
            .route(
                "/user/{user_id}",
                web::get().to(post_handlers::get_user_posts),
            )
            .route(
                "/community/{community_id}",
                web::get().to(post_handlers::get_community_posts),
            )
            .route("/{id}/vote", web::post().to(post_handlers::vote_post))
            .route("/{id}", web::get().to(post_handlers::get_post))
            .route("/{id}", web::put().to(post_handlers::update_post))
            .route("/{id}", web::delete().to(post_handlers::delete_post)),
    );
}
