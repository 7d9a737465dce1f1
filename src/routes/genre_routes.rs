use actix_web::web;

use crate::handlers::genre_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/genres")
            .route("", web::get().to(genre_handlers::list_genres))
            .route("", web::post().to(genre_handlers::create_genre))
            .route("/{id}", web::get().to(genre_handlers::get_genre))
            .route("/{id}", web::put().to(genre_handlers::update_genre))
            .route("/{id}", web::delete().to(genre_handlers::delete_genre)),
    );
}
