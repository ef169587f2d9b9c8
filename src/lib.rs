pub mod browser;
pub mod chrono_util;
pub mod config;
pub mod playlist;
pub mod site;
