pub mod auth;

pub mod dashboard;

pub mod files;

pub mod folders;

pub mod sharing;

pub use auth::configure_auth_routes;
pub use dashboard::configure_dashboard_routes;
pub use files::configure_file_routes;
pub use folders::configure_folder_routes;
pub use sharing::configure_share_routes;
