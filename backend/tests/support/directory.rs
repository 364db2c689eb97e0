//! Shared world for directory behaviour scenarios.
//!
//! Each scenario gets its own runtime and a fresh copy of the seeded
//! in-memory directory behind the real service.

use std::sync::{Arc, Mutex};

use pagination::Paginated;
use tokio::runtime::Runtime;
use user_directory::domain::ports::{RoleChangeOutcome, UsersCommand, UsersQuery};
use user_directory::domain::{
    Error, ListUsersRequest, RolePriority, User, UserDirectoryService, UserId,
};
use user_directory::outbound::memory::InMemoryUserDirectoryRepository;

pub type Service = UserDirectoryService<InMemoryUserDirectoryRepository>;

pub struct DirectoryWorld {
    runtime: Runtime,
    service: Option<Service>,
    pub listing: Option<Result<Paginated<User>, Error>>,
    pub change: Option<Result<RoleChangeOutcome, Error>>,
}

impl std::fmt::Debug for DirectoryWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWorld")
            .field("service", &self.service.as_ref().map(|_| "<service>"))
            .field("listing", &self.listing)
            .field("change", &self.change)
            .finish()
    }
}

impl Default for DirectoryWorld {
    fn default() -> Self {
        Self {
            runtime: Runtime::new().expect("tokio runtime should initialise"),
            service: None,
            listing: None,
            change: None,
        }
    }
}

impl DirectoryWorld {
    pub fn use_seeded_directory(&mut self) {
        let repo = InMemoryUserDirectoryRepository::seeded().expect("seed data is valid");
        self.service = Some(UserDirectoryService::new(
            Arc::new(repo),
            RolePriority::default(),
        ));
    }

    pub fn use_empty_directory(&mut self) {
        self.service = Some(UserDirectoryService::new(
            Arc::new(InMemoryUserDirectoryRepository::empty()),
            RolePriority::default(),
        ));
    }

    fn service(&self) -> &Service {
        self.service.as_ref().expect("directory configured")
    }

    pub fn list(&mut self, request: ListUsersRequest) {
        let result = self.runtime.block_on(self.service().list_users(request));
        self.listing = Some(result);
    }

    pub fn change_roles(&mut self, id: i64, roles: &[&str]) {
        let id = UserId::new(id).expect("valid id");
        let requested = roles.iter().map(|role| (*role).to_owned()).collect();
        let result = self
            .runtime
            .block_on(self.service().change_roles(id, requested));
        self.change = Some(result);
    }

    pub fn user(&self, id: i64) -> User {
        let id = UserId::new(id).expect("valid id");
        self.runtime
            .block_on(self.service().get_user(id))
            .expect("user exists")
    }

    pub fn listed_ids(&self) -> Vec<i32> {
        self.listing
            .as_ref()
            .expect("listing requested")
            .as_ref()
            .expect("listing succeeded")
            .items()
            .iter()
            .map(|user| user.id().value())
            .collect()
    }

    pub fn listing_error(&self) -> &Error {
        self.listing
            .as_ref()
            .expect("listing requested")
            .as_ref()
            .expect_err("listing failed")
    }
}

pub fn world() -> Mutex<DirectoryWorld> {
    Mutex::new(DirectoryWorld::default())
}
