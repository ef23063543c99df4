pub mod account;
pub mod device_info;
pub mod session;
