use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use log::info;

use resona::config::AppConfig;
use resona::db;
use resona::middleware::auth_middleware::AuthMiddleware;
use resona::routes;

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("resona api")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    let pool = db::init_pool(&config.database_url);

    {
        let mut conn = pool.get().expect("database connection for migrations");
        db::run_migrations(&mut conn);
    }

    std::fs::create_dir_all(&config.media_dir)?;

    let port = config.port;
    info!("listening on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.jwt_secret.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(AuthMiddleware)
            .wrap(Logger::default())
            .route("/", web::get().to(index))
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
