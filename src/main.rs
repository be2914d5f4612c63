mod api;
mod config;
mod db;
mod helper_model;
mod methods;
mod model;
mod schema;

use lazy_static::lazy_static;
use tracing_subscriber::EnvFilter;
use warp::Filter;

lazy_static! {
    pub static ref POOL: db::PgPool = db::get_connection_pool();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server_config = config::ServerConfig::from_env()?.install();
    tracing::info!(
        "starting rentacar-httpd on {} (uploads in {})",
        server_config.bind_addr,
        server_config.upload_root.display()
    );

    let access_log = warp::log::custom(|info| {
        tracing::info!(
            target: "rentacar::access",
            "{} {} {} {:?}",
            info.method(),
            info.path(),
            info.status().as_u16(),
            info.elapsed()
        );
    });
    // routing for the server
    let httpd = api::api().and(warp::path::end()).with(access_log);
    warp::serve(httpd).run(server_config.bind_addr).await;
    Ok(())
}
