//! Repository layer: one zero-sized struct per table family, each method
//! taking the pool (or an executor) explicitly.

pub mod asset_repo;
pub mod booking_repo;
pub mod extra_repo;
pub mod payment_repo;
pub mod review_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use booking_repo::BookingRepo;
pub use extra_repo::ExtraRepo;
pub use payment_repo::PaymentRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
