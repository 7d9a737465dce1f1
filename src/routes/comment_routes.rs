use actix_web::web;

use crate::handlers::comment_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/comments")
            .route(
                "/post/{post_id}",
                web::post().to(comment_handlers::add_comment),
            )
            .route(
                "/post/{post_id}",
                web::get().to(comment_handlers::get_comments_for_post),
            )
            .route("/{id}", web::put().to(comment_handlers::update_comment))
            .route("/{id}", web::delete().to(comment_handlers::delete_comment)),
    );
}
