use std::net::SocketAddr;

use clap::Parser;

use crate::consts::{
  DEFAULT_ASSETS, DEFAULT_COUNTRY, DEFAULT_GEOIP_URL, DEFAULT_LISTEN, DEFAULT_REFRESH_SECS,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tells you whether today is a good day to deploy")]
pub struct Args {
  /// Address the HTTP server binds to
  #[arg(long, env = "DEPLOY_TODAY_LISTEN", default_value = DEFAULT_LISTEN)]
  pub listen: SocketAddr,

  /// Directory or http(s) base URL holding `config/` and `responses/`
  #[arg(long, env = "DEPLOY_TODAY_ASSETS", default_value = DEFAULT_ASSETS)]
  pub assets: String,

  /// Seconds between re-evaluations of the current level
  #[arg(long, env = "DEPLOY_TODAY_REFRESH_SECS", default_value_t = DEFAULT_REFRESH_SECS)]
  pub refresh_secs: u64,

  /// Country used when none is given or detection fails
  #[arg(long, env = "DEPLOY_TODAY_DEFAULT_COUNTRY", default_value = DEFAULT_COUNTRY)]
  pub default_country: String,

  #[arg(long, env = "DEPLOY_TODAY_GEOIP_URL", default_value = DEFAULT_GEOIP_URL)]
  pub geoip_url: String,
}
