mod error;
mod health_check;
mod leaderboard;
mod register;
mod update;

pub use error::ApiError;
pub use health_check::health_check;
pub use leaderboard::leaderboard;
pub use register::register;
pub use update::update_user;
