use crate::{
    api::{analytics, perimeter, time_entries, users},
    config::Config,
    error::AttendanceError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};
use anyhow::anyhow;
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiters shared by every worker. A rate of 0 turns a limiter off.
#[derive(Clone)]
pub struct RateLimits {
    clock: Option<Limiter>,
    protected: Option<Limiter>,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            clock: build_limiter(config.rate_clock_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }

    pub fn disabled() -> Self {
        Self {
            clock: None,
            protected: None,
        }
    }
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<Option<Limiter>> {
    if requests_per_min == 0 {
        return Ok(None);
    }
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min} requests/min"))?;
    Ok(Some(Arc::new(Governor::new(&cfg))))
}

/// `Condition` needs a middleware even when it is switched off.
fn limiter(slot: &Option<Limiter>) -> Condition<Limiter> {
    match slot {
        Some(l) => Condition::new(true, l.clone()),
        None => Condition::new(false, idle_limiter()),
    }
}

fn idle_limiter() -> Limiter {
    Arc::new(Governor::new(&GovernorConfig::default()))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AttendanceError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AttendanceError::Validation(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(json_config())
            .app_data(query_config())
            .wrap(limiter(&limits.protected))
            .service(
                web::scope("/time-entries")
                    // /time-entries
                    .service(
                        web::resource("")
                            .wrap(limiter(&limits.clock))
                            .route(web::get().to(time_entries::list_entries))
                            .route(web::post().to(time_entries::clock_in)),
                    )
                    // /time-entries/{id}
                    .service(
                        web::resource("/{id}")
                            .wrap(limiter(&limits.clock))
                            .route(web::patch().to(time_entries::clock_out)),
                    ),
            )
            .service(
                web::resource("/perimeter")
                    .route(web::get().to(perimeter::get_active))
                    .route(web::post().to(perimeter::replace_active)),
            )
            .service(
                web::resource("/users")
                    .route(web::get().to(users::list_users))
                    .route(web::post().to(users::create_user)),
            )
            .service(web::resource("/analytics").route(web::get().to(analytics::summary))),
    );
}
