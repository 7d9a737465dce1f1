use actix_web::web;

use crate::handlers::{community_handlers, post_handlers};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/communities")
            .route("", web::post().to(community_handlers::create_community))
            .route(
                "/search",
                web::get().to(community_handlers::search_communities),
            )
            .route(
                "/user",
                web::get().to(community_handlers::get_user_communities),
            )
            .route(
                "/{id}/join",
                web::post().to(community_handlers::join_community),
            )
            .route(
                "/{id}/leave",
                web::post().to(community_handlers::leave_community),
            )
            .route(
                "/{id}/members",
                web::get().to(community_handlers::get_members),
            )
            .route(
                "/{id}/posts",
                web::get().to(post_handlers::get_community_posts),
            )
            .route("/{id}/radio", web::post().to(community_handlers::set_radio))
            .route("/{id}", web::get().to(community_handlers::get_community))
            .route("/{id}", web::put().to(community_handlers::update_community))
            .route(
                "/{id}",
                web::delete().to(community_handlers::delete_community),
            ),
    );
}
