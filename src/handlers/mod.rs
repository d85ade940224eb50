pub mod bots;
pub mod teams;

#[cfg(test)]
mod bots_http_tests;


pub use bots::configure_bot_routes;
pub use teams::configure_team_routes;
