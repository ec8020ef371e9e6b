//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod release_repo;
pub mod royalty_repo;
pub mod track_repo;
pub mod user_repo;

pub use release_repo::ReleaseRepo;
pub use royalty_repo::RoyaltyRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;
