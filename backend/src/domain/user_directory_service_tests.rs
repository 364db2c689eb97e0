//! Tests for the user directory service.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::*;
use crate::domain::ports::MockUserDirectoryRepository;
use crate::domain::test_fixtures::{role_names, seeded_users, user};
use crate::domain::{ErrorCode, RoleChangePlan, RoleId, UserProfile, plan_role_changes};
use crate::outbound::memory::InMemoryUserDirectoryRepository;
use rstest::rstest;
use tokio::sync::Barrier;

fn make_service(repo: MockUserDirectoryRepository) -> UserDirectoryService<MockUserDirectoryRepository> {
    UserDirectoryService::new(Arc::new(repo), RolePriority::default())
}

fn user_id(value: i64) -> UserId {
    UserId::new(value).expect("valid user id")
}

fn profile(name: &str, email: &str, age: i64) -> UserProfile {
    UserProfile::try_from_parts(name, email, age).expect("valid profile")
}

fn requested(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[rstest]
#[tokio::test]
async fn list_users_runs_the_pipeline() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_list_users_with_roles()
        .times(1)
        .return_once(|| Ok(seeded_users()));

    let request = ListUsersRequest {
        filter: crate::domain::UserFilter::default().with_age_range(30, 60),
        ..ListUsersRequest::default()
    };
    let page = make_service(repo)
        .list_users(request)
        .await
        .expect("listing succeeds");

    assert_eq!(page.pagination().total_count(), 4);
    let ids: Vec<i32> = page.items().iter().map(|user| user.id().value()).collect();
    assert_eq!(ids, vec![1, 5, 6, 9]);
}

#[rstest]
#[tokio::test]
async fn list_users_reports_an_empty_directory() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_list_users_with_roles()
        .times(1)
        .return_once(|| Ok(Vec::new()));

    let err = make_service(repo)
        .list_users(ListUsersRequest::default())
        .await
        .expect_err("no users");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "no users");
}

#[rstest]
#[case(UserDirectoryRepositoryError::connection("refused"))]
#[case(UserDirectoryRepositoryError::query("bad sql"))]
#[tokio::test]
async fn repository_failures_are_internal(#[case] failure: UserDirectoryRepositoryError) {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_list_users_with_roles()
        .times(1)
        .return_once(move || Err(failure));

    let err = make_service(repo)
        .list_users(ListUsersRequest::default())
        .await
        .expect_err("store failed");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn get_user_arranges_roles_by_priority() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user()
        .withf(|id| id.value() == 5)
        .times(1)
        .return_once(|_| {
            Ok(Some(user(5, "Pavel Durov", 38, "p.durov@telegram.com", &["Admin", "SuperAdmin"])))
        });

    let found = make_service(repo).get_user(user_id(5)).await.expect("user exists");
    let roles: Vec<&str> = found.roles().iter().map(AsRef::as_ref).collect();
    assert_eq!(roles, vec!["SuperAdmin", "Admin"]);
}

#[rstest]
#[tokio::test]
async fn get_user_reports_missing_users() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user().times(1).return_once(|_| Ok(None));

    let err = make_service(repo).get_user(user_id(42)).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "user with id 42 not found");
}

#[rstest]
#[tokio::test]
async fn list_roles_orders_the_catalogue_by_priority() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_list_roles().times(1).return_once(|| {
        Ok(["User", "Support", "Admin", "SuperAdmin"]
            .into_iter()
            .zip(1..)
            .map(|(name, id)| Role {
                id: RoleId::new(id),
                name: RoleName::new(name).expect("valid role name"),
            })
            .collect())
    });

    let roles = make_service(repo).list_roles().await.expect("catalogue");
    let names: Vec<&str> = roles.iter().map(|role| role.name.as_ref()).collect();
    assert_eq!(names, vec!["SuperAdmin", "Admin", "Support", "User"]);
}

#[rstest]
#[tokio::test]
async fn create_user_rejects_taken_email_without_inserting() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_email_exists().times(1).return_once(|_| Ok(true));
    repo.expect_insert_user().times(0);

    let err = make_service(repo)
        .create_user(profile("Ivan", "i.alexeev@gmail.com", 30))
        .await
        .expect_err("email taken");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "i.alexeev@gmail.com has already been taken");
}

#[rstest]
#[tokio::test]
async fn create_user_inserts_when_email_is_free() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_email_exists().times(1).return_once(|_| Ok(false));
    repo.expect_insert_user()
        .withf(|new_user| new_user.email.as_ref() == "new@user.io")
        .times(1)
        .return_once(|new_user| Ok(User::new(user_id(10), new_user.clone(), Vec::new())));

    let created = make_service(repo)
        .create_user(profile("New User", "new@user.io", 30))
        .await
        .expect("created");
    assert_eq!(created.id().value(), 10);
    assert!(created.roles().is_empty());
}

#[rstest]
#[tokio::test]
async fn edit_user_keeping_the_same_email_skips_the_uniqueness_check() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user()
        .times(1)
        .return_once(|_| Ok(Some(user(1, "Ivan Alexeev", 32, "i.alexeev@gmail.com", &["User"]))));
    repo.expect_email_exists().times(0);
    repo.expect_update_user().times(1).return_once(|update| {
        Ok(Some(User::new(
            update.id,
            update.profile.clone(),
            role_names(&["User"]),
        )))
    });

    let update = UserUpdate {
        id: user_id(1),
        profile: profile("Ivan A.", "I.Alexeev@gmail.com", 33),
    };
    let edited = make_service(repo).edit_user(update).await.expect("edited");
    assert_eq!(edited.name().as_ref(), "Ivan A.");
    assert_eq!(edited.age().value(), 33);
}

#[rstest]
#[tokio::test]
async fn edit_user_rejects_a_taken_email() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user()
        .times(1)
        .return_once(|_| Ok(Some(user(1, "Ivan Alexeev", 32, "i.alexeev@gmail.com", &["User"]))));
    repo.expect_email_exists().times(1).return_once(|_| Ok(true));
    repo.expect_update_user().times(0);

    let update = UserUpdate {
        id: user_id(1),
        profile: profile("Ivan Alexeev", "o.andreev@gmail.com", 32),
    };
    let err = make_service(repo).edit_user(update).await.expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn edit_user_reports_missing_users() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user().times(1).return_once(|_| Ok(None));
    repo.expect_update_user().times(0);

    let update = UserUpdate {
        id: user_id(99),
        profile: profile("Nobody", "no@body.io", 20),
    };
    let err = make_service(repo).edit_user(update).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_user_reports_whether_a_user_was_removed(
    #[case] deleted: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_delete_user().times(1).return_once(move |_| Ok(deleted));

    let result = make_service(repo).delete_user(user_id(3)).await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}

fn ivan() -> User {
    user(1, "Ivan Alexeev", 32, "i.alexeev@gmail.com", &["User"])
}

fn role_set(names: &[&str]) -> BTreeSet<RoleName> {
    role_names(names).into_iter().collect()
}

#[rstest]
#[tokio::test]
async fn change_roles_hands_the_deduplicated_target_to_the_store() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user()
        .times(1)
        .return_once(|_| Ok(Some(user(6, "Elon Musk", 52, "e.musk@spaceX.com", &["Support"]))));
    repo.expect_reconcile_roles()
        .withf(|id, target| id.value() == 6 && *target == role_set(&["Admin", "SuperAdmin"]))
        .times(1)
        .return_once(|_, target| {
            Ok(RoleReconciliation::Applied(plan_role_changes(
                &role_set(&["Support"]),
                target,
            )))
        });

    let outcome = make_service(repo)
        .change_roles(user_id(6), requested(&["SuperAdmin", "Admin", "Admin"]))
        .await
        .expect("roles changed");

    assert_eq!(outcome.added, role_names(&["Admin", "SuperAdmin"]));
    assert_eq!(outcome.removed, role_names(&["Support"]));
}

#[rstest]
#[tokio::test]
async fn change_roles_reports_the_unknown_role() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user().times(1).return_once(|_| Ok(Some(ivan())));
    repo.expect_reconcile_roles().times(1).return_once(|_, _| {
        Ok(RoleReconciliation::UnknownRole(
            RoleName::new("Ghost").expect("valid role name"),
        ))
    });

    let err = make_service(repo)
        .change_roles(user_id(1), requested(&["User", "Ghost"]))
        .await
        .expect_err("unknown role");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "role Ghost not found");
}

#[rstest]
#[tokio::test]
async fn change_roles_rejects_an_empty_request_before_touching_assignments() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user().times(1).return_once(|_| Ok(Some(ivan())));
    repo.expect_reconcile_roles().times(0);

    let err = make_service(repo)
        .change_roles(user_id(1), Vec::new())
        .await
        .expect_err("empty request");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::before_reconciling(None, 0)]
#[case::deleted_while_reconciling(Some(()), 1)]
#[tokio::test]
async fn change_roles_for_unknown_user_is_not_found(
    #[case] found_first: Option<()>,
    #[case] reconciliations: usize,
) {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user()
        .times(1)
        .return_once(move |_| Ok(found_first.map(|()| ivan())));
    repo.expect_reconcile_roles()
        .times(reconciliations)
        .returning(|_, _| Ok(RoleReconciliation::UserNotFound));

    let err = make_service(repo)
        .change_roles(user_id(1), requested(&["User"]))
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "user with id 1 not found");
}

#[rstest]
#[tokio::test]
async fn matching_roles_report_no_changes() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user().times(1).return_once(|_| Ok(Some(ivan())));
    repo.expect_reconcile_roles()
        .times(1)
        .return_once(|_, _| Ok(RoleReconciliation::Applied(RoleChangePlan::default())));

    let outcome = make_service(repo)
        .change_roles(user_id(1), requested(&["User"]))
        .await
        .expect("nothing to do");
    assert_eq!(outcome, RoleChangeOutcome::default());
}

#[rstest]
#[tokio::test]
async fn create_user_losing_an_email_race_is_a_conflict() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_email_exists().times(1).return_once(|_| Ok(false));
    repo.expect_insert_user()
        .times(1)
        .return_once(|new_user| {
            Err(UserDirectoryRepositoryError::duplicate_email(
                new_user.email.to_string(),
            ))
        });

    let err = make_service(repo)
        .create_user(profile("Ada", "ada@example.com", 36))
        .await
        .expect_err("lost the race");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "ada@example.com has already been taken");
}

#[rstest]
#[tokio::test]
async fn edit_user_losing_an_email_race_is_a_conflict() {
    let mut repo = MockUserDirectoryRepository::new();
    repo.expect_find_user().times(1).return_once(|_| Ok(Some(ivan())));
    repo.expect_email_exists().times(1).return_once(|_| Ok(false));
    repo.expect_update_user()
        .times(1)
        .return_once(|update| {
            Err(UserDirectoryRepositoryError::duplicate_email(
                update.profile.email.to_string(),
            ))
        });

    let update = UserUpdate {
        id: user_id(1),
        profile: profile("Ivan Alexeev", "ada@example.com", 32),
    };
    let err = make_service(repo).edit_user(update).await.expect_err("lost the race");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

/// Holds every reconciliation until `parties` of them have arrived, so
/// concurrent role changes overlap inside the store.
struct ContendedDirectory {
    inner: InMemoryUserDirectoryRepository,
    gate: Barrier,
}

#[async_trait]
impl UserDirectoryRepository for ContendedDirectory {
    async fn list_users_with_roles(&self) -> Result<Vec<User>, UserDirectoryRepositoryError> {
        self.inner.list_users_with_roles().await
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, UserDirectoryRepositoryError> {
        self.inner.find_user(id).await
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, UserDirectoryRepositoryError> {
        self.inner.email_exists(email).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, UserDirectoryRepositoryError> {
        self.inner.list_roles().await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, UserDirectoryRepositoryError> {
        self.inner.insert_user(user).await
    }

    async fn update_user(
        &self,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserDirectoryRepositoryError> {
        self.inner.update_user(update).await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, UserDirectoryRepositoryError> {
        self.inner.delete_user(id).await
    }

    async fn reconcile_roles(
        &self,
        id: UserId,
        target: &BTreeSet<RoleName>,
    ) -> Result<RoleReconciliation, UserDirectoryRepositoryError> {
        self.gate.wait().await;
        self.inner.reconcile_roles(id, target).await
    }
}

#[rstest]
#[tokio::test]
async fn overlapping_role_changes_end_on_one_requested_set() {
    let repo = ContendedDirectory {
        inner: InMemoryUserDirectoryRepository::seeded().expect("seed data"),
        gate: Barrier::new(2),
    };
    let service = UserDirectoryService::new(Arc::new(repo), RolePriority::default());

    let (admin, support) = tokio::join!(
        service.change_roles(user_id(1), requested(&["Admin"])),
        service.change_roles(user_id(1), requested(&["Support"])),
    );
    let admin = admin.expect("admin change");
    let support = support.expect("support change");

    let roles = service.get_user(user_id(1)).await.expect("user").roles().to_vec();
    let last_removed_the_first = if roles == role_names(&["Admin"]) {
        admin.removed == role_names(&["Support"]) && support.removed == role_names(&["User"])
    } else {
        assert_eq!(roles, role_names(&["Support"]));
        support.removed == role_names(&["Admin"]) && admin.removed == role_names(&["User"])
    };
    assert!(last_removed_the_first, "admin: {admin:?}, support: {support:?}");
}
