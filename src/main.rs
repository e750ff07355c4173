use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use log::{info, warn};

use homerank::{config, handlers, upstream};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match config::read_config("Homerank.toml") {
        Ok(config) => config,
        Err(e) => {
            warn!("couldn't read config file: {}, using defaults", e);
            config::Config::default()
        }
    };

    let client = Arc::new(upstream::UpstreamClient::new());
    let routes = handlers::rankings_route(client);

    let ip = match config.web.ip.parse::<IpAddr>() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("couldn't parse ip for warp server: {}, using 0.0.0.0", e);
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        }
    };

    info!("starting warp server at {}:{}", ip, config.web.port);
    warp::serve(routes).run((ip, config.web.port)).await;
}
