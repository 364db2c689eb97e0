//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; the repository converts them to
//! domain types.

use diesel::prelude::*;

use super::schema::{roles, user_roles, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
}

/// Insertable and changeset form of the editable user columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserFieldsRow<'a> {
    pub name: &'a str,
    pub age: i32,
    pub email: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewUserRoleRow {
    pub user_id: i32,
    pub role_id: i32,
}
