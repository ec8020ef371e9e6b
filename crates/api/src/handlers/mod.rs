pub mod releases;
pub mod royalties;
pub mod tracks;
pub mod users;
