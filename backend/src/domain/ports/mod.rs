//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_directory_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use user_directory_repository::MockUserDirectoryRepository;
pub use user_directory_repository::{UserDirectoryRepository, UserDirectoryRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{RoleChangeOutcome, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
