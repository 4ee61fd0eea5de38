pub mod home;
pub mod session;
pub mod settings;
pub mod status;
