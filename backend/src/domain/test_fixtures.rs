//! Shared test data: the seeded directory of nine users.

use crate::domain::{RoleName, User, UserId, UserProfile};

pub(crate) fn role_names(names: &[&str]) -> Vec<RoleName> {
    names
        .iter()
        .map(|name| RoleName::new(*name).expect("valid role name"))
        .collect()
}

pub(crate) fn user(id: i64, name: &str, age: i64, email: &str, roles: &[&str]) -> User {
    let id = UserId::new(id).expect("valid user id");
    let profile = UserProfile::try_from_parts(name, email, age).expect("valid profile");
    User::new(id, profile, role_names(roles))
}

/// The nine seeded users in id order, roles in assignment order.
pub(crate) fn seeded_users() -> Vec<User> {
    vec![
        user(1, "Ivan Alexeev", 32, "i.alexeev@gmail.com", &["User"]),
        user(2, "Oleg Andreev", 22, "o.andreev@gmail.com", &["User"]),
        user(3, "Olga Petrova", 24, "o.petrova@gmail.com", &["User"]),
        user(4, "Elena Ivanova", 29, "e.ivanova@gmail.com", &["User"]),
        user(5, "Pavel Durov", 38, "p.durov@telegram.com", &["Admin", "SuperAdmin"]),
        user(6, "Elon Musk", 52, "e.musk@spaceX.com", &["Support"]),
        user(7, "Bill Gates", 67, "b.gates@microsoft.com", &["Admin", "SuperAdmin"]),
        user(8, "Tim Cook", 62, "t.cook@apple.com", &["Support"]),
        user(9, "Mark Zuckerberg", 39, "m.zuckerberg@meta.com", &["Support", "Admin"]),
    ]
}
