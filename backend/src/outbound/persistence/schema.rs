//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly.

diesel::table! {
    /// Directory users. `email` carries a unique index.
    users (id) {
        id -> Int4,
        name -> Varchar,
        age -> Int4,
        email -> Varchar,
    }
}

diesel::table! {
    /// Role catalogue. `name` carries a unique index.
    roles (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Assignment relation between users and roles.
    ///
    /// The composite primary key forbids duplicate assignments; both foreign
    /// keys cascade on delete.
    user_roles (user_id, role_id) {
        user_id -> Int4,
        role_id -> Int4,
    }
}

diesel::joinable!(user_roles -> users (user_id));
diesel::joinable!(user_roles -> roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(users, roles, user_roles);
