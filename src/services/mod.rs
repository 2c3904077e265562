pub mod collision_feed;
pub mod geocoding;
pub mod google_routes;
pub mod route_planner;
pub mod safety;
