//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use super::api_scope;
use super::state::HttpState;
use crate::Trace;
use crate::domain::{RolePriority, UserDirectoryService};
use crate::outbound::memory::InMemoryUserDirectoryRepository;

/// State backed by a fresh copy of the seeded in-memory directory.
pub fn seeded_state() -> HttpState {
    let repo = InMemoryUserDirectoryRepository::seeded().expect("seed data is valid");
    let service = UserDirectoryService::new(Arc::new(repo), RolePriority::default());
    HttpState::from_service(Arc::new(service))
}

/// The full API over the seeded directory, wrapped in [`Trace`].
pub fn seeded_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(seeded_state()))
        .wrap(Trace)
        .service(api_scope())
}
