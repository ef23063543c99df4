mod account_repo;
mod device_info_repo;
mod session_repo;

pub use account_repo::AccountRepo;
pub use device_info_repo::DeviceInfoRepo;
pub use session_repo::SessionRepo;
