/// HTTP request handlers
pub mod calendar;
pub mod media;
pub mod posts;
pub mod social_accounts;

use actix_web::web;

/// Register the authenticated API routes. Mounted by `main` (and the
/// integration tests) under `/api/v1` behind the auth middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(
                web::resource("")
                    .route(web::post().to(posts::create_post))
                    .route(web::get().to(posts::list_posts)),
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::delete().to(posts::delete_post)),
            ),
    )
    .service(
        web::scope("/calendar")
            .route("/day", web::get().to(calendar::day))
            .route("/summary", web::get().to(calendar::summary)),
    )
    .service(
        web::scope("/social-accounts")
            .service(
                web::resource("")
                    .route(web::post().to(social_accounts::connect_account))
                    .route(web::get().to(social_accounts::list_accounts)),
            )
            .service(
                web::resource("/{account_id}")
                    .route(web::patch().to(social_accounts::set_account_active))
                    .route(web::delete().to(social_accounts::delete_account)),
            ),
    )
    .service(
        web::scope("/media")
            .service(
                web::resource("")
                    .route(web::post().to(media::upload_media))
                    .route(web::get().to(media::list_media)),
            )
            .service(web::resource("/{media_id}").route(web::delete().to(media::delete_media))),
    );
}
