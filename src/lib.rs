pub mod bundle;
pub mod cli;
pub mod consts;
pub mod error;
pub mod levels;
pub mod loader;
pub mod locale;
pub mod logging;
pub mod refresh;
pub mod response;
pub mod routers;
pub mod source;
pub mod state;
