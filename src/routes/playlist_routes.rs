use actix_web::web;

use crate::handlers::playlist_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/playlists")
            .route("", web::post().to(playlist_handlers::create_playlist))
            .route(
                "/public",
                web::get().to(playlist_handlers::get_public_playlists),
            )
            .route("/user", web::get().to(playlist_handlers::get_my_playlists))
            .route(
                "/user/{user_id}/public",
                web::get().to(playlist_handlers::get_user_public_playlists),
            )
            .route(
                "/user/{user_id}",
                web::get().to(playlist_handlers::get_user_playlists),
            )
            .route(
                "/{id}/songs/{song_id}",
                web::post().to(playlist_handlers::add_song_to_playlist),
            )
            .route(
                "/{id}/songs/{song_id}",
                web::delete().to(playlist_handlers::remove_song_from_playlist),
            )
            .route("/{id}", web::get().to(playlist_handlers::get_playlist))
            .route("/{id}", web::put().to(playlist_handlers::update_playlist))
            .route("/{id}", web::delete().to(playlist_handlers::delete_playlist)),
    );
}
