pub mod mock;
pub mod repository;

pub use mock::MockPhoneVerificationRepository;
pub use repository::PhoneVerificationRepository;
