//! HTTP handlers and route configuration.

mod categories;
mod comments;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    // Literal segments before the {id} matchers.
                    .route("/drafts", web::post().to(posts::save_draft))
                    .route("/search", web::get().to(posts::search_posts))
                    .route("/slug/{slug}", web::get().to(posts::get_post_by_slug))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/like", web::post().to(posts::like_post))
                    .route("/{id}/publish", web::post().to(posts::toggle_publish))
                    .route("/{post_id}/comments", web::get().to(comments::list_comments))
                    .route(
                        "/{post_id}/comments",
                        web::post().to(comments::create_comment),
                    ),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list_categories))
                    .route("", web::post().to(categories::create_category))
                    .route("/{id}", web::get().to(categories::get_category))
                    .route("/{id}", web::put().to(categories::update_category))
                    .route("/{id}", web::delete().to(categories::delete_category)),
            )
            .service(
                web::scope("/comments")
                    .route("/{id}", web::delete().to(comments::delete_comment))
                    .route("/{id}/like", web::post().to(comments::like_comment)),
            ),
    );
}
