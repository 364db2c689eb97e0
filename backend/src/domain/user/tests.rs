//! Tests for user value validation and role arrangement.

use super::*;
use crate::domain::RolePriority;
use rstest::rstest;

fn profile() -> UserProfile {
    UserProfile::try_from_parts("Pavel Durov", "p.durov@telegram.com", 38)
        .expect("fixture profile is valid")
}

fn role(name: &str) -> RoleName {
    RoleName::new(name).expect("fixture role name is valid")
}

#[rstest]
#[case(0)]
#[case(-3)]
#[case(i64::from(i32::MAX) + 1)]
fn user_id_rejects_non_positive_or_oversized_values(#[case] value: i64) {
    assert_eq!(
        UserId::new(value),
        Err(UserValidationError::InvalidId { value })
    );
}

#[rstest]
fn user_id_displays_raw_value() {
    let id = UserId::new(42).expect("valid id");
    assert_eq!(id.to_string(), "42");
    assert_eq!(id.value(), 42);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_names_are_rejected(#[case] name: &str) {
    assert_eq!(UserName::new(name), Err(UserValidationError::EmptyName));
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("not-an-email", UserValidationError::InvalidEmail)]
#[case("two@@signs.com", UserValidationError::InvalidEmail)]
#[case("no-domain@host", UserValidationError::InvalidEmail)]
#[case("spa ce@host.com", UserValidationError::InvalidEmail)]
fn malformed_emails_are_rejected(#[case] email: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(email), Err(expected));
}

#[rstest]
#[case("e.musk@spaceX.com")]
#[case("i.alexeev@gmail.com")]
fn well_formed_emails_are_accepted(#[case] email: &str) {
    let parsed = Email::new(email).expect("valid email");
    assert_eq!(parsed.as_ref(), email);
}

#[rstest]
fn email_comparison_ignores_ascii_case() {
    let left = Email::new("E.Musk@SpaceX.com").expect("valid email");
    let right = Email::new("e.musk@spacex.com").expect("valid email");
    assert!(left.eq_ignore_case(&right));
    assert_ne!(left, right);
}

#[rstest]
#[case(0)]
#[case(-1)]
fn non_positive_ages_are_rejected(#[case] age: i64) {
    assert_eq!(
        Age::new(age),
        Err(UserValidationError::NonPositiveAge { value: age })
    );
}

#[rstest]
fn profile_reports_first_failing_field() {
    let err = UserProfile::try_from_parts("", "bad", 0).expect_err("name is blank");
    assert_eq!(err.field(), "name");

    let err = UserProfile::try_from_parts("Tim Cook", "bad", 0).expect_err("email is invalid");
    assert_eq!(err.field(), "email");

    let err = UserProfile::try_from_parts("Tim Cook", "t.cook@apple.com", 0)
        .expect_err("age is zero");
    assert_eq!(err.field(), "age");
}

#[rstest]
fn arranging_roles_orders_by_priority() {
    let id = UserId::new(5).expect("valid id");
    let user = User::new(id, profile(), vec![role("Admin"), role("SuperAdmin")]);

    let arranged = user.with_roles_arranged(&RolePriority::default());

    assert_eq!(
        arranged.roles(),
        &[role("SuperAdmin"), role("Admin")]
    );
    assert_eq!(arranged.primary_role(), Some(&role("SuperAdmin")));
    assert!(arranged.has_role("Admin"));
    assert!(!arranged.has_role("User"));
}

#[rstest]
fn user_without_roles_has_no_primary_role() {
    let id = UserId::new(1).expect("valid id");
    let user = User::new(id, profile(), Vec::new());
    assert!(user.primary_role().is_none());
}
