use crate::{
    api::{attendance, profile, status, team},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfig, GovernorConfigBuilder,
    PeerIpKeyExtractor,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route-group limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_conf = build_limiter(config.rate_login_per_min);
    let register_conf = build_limiter(config.rate_register_per_min);
    let refresh_conf = build_limiter(config.rate_refresh_per_min);
    let protected_conf = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_conf))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_conf))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Governor::new(&refresh_conf))
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_conf))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&protected_conf)) // rate limiting
            .service(
                web::resource("/me")
                    .route(web::get().to(profile::get_profile))
                    .route(web::put().to(profile::update_profile)),
            )
            .service(
                web::resource("/status")
                    .route(web::get().to(status::get_status))
                    .route(web::patch().to(status::update_status)),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_present))
                            .route(web::get().to(attendance::my_attendance)),
                    )
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in")
                            .route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/check-out
                    .service(
                        web::resource("/check-out")
                            .route(web::post().to(attendance::check_out)),
                    ),
            )
            .service(
                web::scope("/team")
                    // /team
                    .service(web::resource("").route(web::get().to(team::list_team)))
                    // /team/{id}
                    .service(web::resource("/{id}").route(web::get().to(team::get_member))),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
