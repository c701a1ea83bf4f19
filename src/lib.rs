pub mod application;
pub mod auth;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod invoice;
pub mod models;
pub mod openapi;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use auth::JwtConfig;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    jwt: JwtConfig,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jwt.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                // Malformed JSON bodies answer with the same {"message"} shape
                // as every other failure.
                errors::AppError::Validation(err.to_string()).into()
            }))
            .wrap(Logger::default())
            .service(
                web::scope("/cart")
                    .route("", web::get().to(handlers::cart::list_cart_items))
                    .route("", web::post().to(handlers::cart::add_cart_item))
                    .route("/{id}", web::put().to(handlers::cart::update_cart_item))
                    .route("/{id}", web::delete().to(handlers::cart::remove_cart_item)),
            )
            .service(
                web::scope("/checkout")
                    .route("", web::post().to(handlers::checkout::create_checkout))
                    .route("/orders", web::get().to(handlers::checkout::list_orders))
                    .route(
                        "/invoices/{order_id}",
                        web::get().to(handlers::checkout::get_invoice),
                    )
                    .route(
                        "/settings",
                        web::post().to(handlers::settings::update_checkout_setting),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
