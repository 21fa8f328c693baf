pub mod catalog;
pub mod complaints;
pub mod error;
pub mod filter;
pub mod users;

pub use complaints::ComplaintStore;
pub use error::StoreError;
pub use filter::ComplaintFilter;
pub use users::UserDirectory;
