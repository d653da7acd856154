use crate::{
    api::{attendance, check_in_window},
    auth::middleware::auth_middleware,
};
use actix_governor::{
    GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

/// Per-IP limiter shared by every worker.
pub fn build_limiter(
    requests_per_min: u32,
) -> anyhow::Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(60_000 / u64::from(requests_per_min))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min} per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    // Protected routes
    cfg.service(
        web::scope(api_prefix)
            .wrap(from_fn(auth_middleware))
            .service(
                web::scope("/check-in-windows")
                    // /check-in-windows
                    .service(
                        web::resource("")
                            .route(web::get().to(check_in_window::list_windows))
                            .route(web::post().to(check_in_window::create_window)),
                    )
                    // /check-in-windows/status (before /{id})
                    .service(
                        web::resource("/status")
                            .route(web::get().to(check_in_window::check_in_status)),
                    )
                    // /check-in-windows/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(check_in_window::update_window))
                            .route(web::delete().to(check_in_window::delete_window)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::put().to(attendance::check_out))
                            .route(web::post().to(attendance::check_in)),
                    ),
            ),
    );
}
