//! Domain-service clients
//!
//! Each service is a thin handle over the shared authenticated transport,
//! carrying a representative slice of the platform's operations for its
//! domain. The platform's full surface is far wider; new operations follow
//! the same pattern on the transport's verb helpers.

pub mod boarding_passes;
pub mod currency;
pub mod manifests;
pub mod organizations;
pub mod persons;
pub mod users;
pub mod vouchers;

pub use boarding_passes::BoardingPassService;
pub use currency::CurrencyService;
pub use manifests::ManifestService;
pub use organizations::OrganizationService;
pub use persons::PersonService;
pub use users::UserService;
pub use vouchers::VoucherService;
