use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use chrono::Utc;
use diesel::prelude::*;
use tempfile::TempDir;
use uuid::Uuid;

use resona::config::AppConfig;
use resona::db::{self, DbPool};
use resona::middleware::auth_middleware::AuthMiddleware;
use resona::models::song_models::NewSong;
use resona::models::user_models::NewUser;
use resona::routes;
use resona::schema::{songs, users};
use resona::utils::token_utils::generate_jwt;

pub struct TestCtx {
    pub pool: DbPool,
    pub secret: Vec<u8>,
    pub config: AppConfig,
    _dir: TempDir,
}

pub fn setup() -> TestCtx {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("test.db");
    let pool = db::init_pool(db_path.to_str().expect("utf-8 path"));

    let mut conn = pool.get().expect("connection");
    db::run_migrations(&mut conn);

    let secret = b"integration-test-secret".to_vec();
    let config = AppConfig {
        port: 0,
        database_url: db_path.to_string_lossy().into_owned(),
        jwt_secret: secret.clone(),
        media_dir: dir.path().join("media").to_string_lossy().into_owned(),
    };

    TestCtx {
        pool,
        secret,
        config,
        _dir: dir,
    }
}

pub async fn init_app(
    ctx: &TestCtx,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::new(ctx.secret.clone()))
            .app_data(web::Data::new(ctx.config.clone()))
            .wrap(AuthMiddleware)
            .configure(routes::configure),
    )
    .await
}

fn insert_user(ctx: &TestCtx, nickname: &str, role: &str) -> (String, String) {
    let mut conn = ctx.pool.get().expect("connection");
    let id = Uuid::new_v4().to_string();

    diesel::insert_into(users::table)
        .values(&NewUser {
            id: id.clone(),
            name: nickname.to_string(),
            last_name: None,
            nickname: nickname.to_string(),
            email: format!("{nickname}@example.com"),
            password_hash: bcrypt::hash("password123", 4).expect("hash"),
            role: role.to_string(),
            bio: None,
            profile_picture_url: None,
            email_verified: false,
            created_at: Some(Utc::now().naive_utc()),
        })
        .execute(&mut conn)
        .expect("insert user");

    let token = generate_jwt(&id, &ctx.secret);
    (id, token)
}

/// Returns (user_id, bearer token) for a regular user.
pub fn create_user(ctx: &TestCtx, nickname: &str) -> (String, String) {
    insert_user(ctx, nickname, "USER")
}

pub fn create_admin(ctx: &TestCtx, nickname: &str) -> (String, String) {
    insert_user(ctx, nickname, "ADMIN")
}

pub fn create_song(ctx: &TestCtx, uploader_id: &str, title: &str) -> String {
    let mut conn = ctx.pool.get().expect("connection");
    let id = Uuid::new_v4().to_string();

    diesel::insert_into(songs::table)
        .values(&NewSong {
            id: id.clone(),
            title: title.to_string(),
            description: None,
            uploader_id: uploader_id.to_string(),
            audio_path: format!("{}/{id}.mp3", ctx.config.media_dir),
            cover_path: None,
            duration_seconds: Some(180),
            created_at: Some(Utc::now().naive_utc()),
            updated_at: None,
        })
        .execute(&mut conn)
        .expect("insert song");

    id
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
