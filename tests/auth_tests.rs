//! Integration tests for registration, login and admin account management

mod common;

use campus_portal::contract::{AuthContext, PortalError, Role};
use campus_portal::domain::{LoginRequest, NewLecturer, NewStudent, Registration};
use common::TestPortal;

fn registration(username: &str, role: Role) -> Registration {
    Registration {
        username: username.to_string(),
        email: format!("{}@portal.edu", username),
        password: "pa55word!".to_string(),
        role,
        department: "Computer Science".to_string(),
    }
}

fn login(username: &str, role: Role) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: "pa55word!".to_string(),
        role,
        lecturer_id: None,
    }
}

#[tokio::test]
async fn registered_student_starts_unapproved() {
    let portal = TestPortal::new();
    let account = portal
        .auth
        .register(registration("amina", Role::Student))
        .await
        .unwrap();

    assert_eq!(account.profile.role, Role::Student);
    assert!(!account.profile.is_approved);
    assert_eq!(account.profile.department.as_deref(), Some("Computer Science"));
}

#[tokio::test]
async fn admin_role_cannot_be_self_registered() {
    let portal = TestPortal::new();
    let err = portal
        .auth
        .register(registration("sneaky", Role::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Validation { .. }));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let portal = TestPortal::new();
    portal
        .auth
        .register(registration("amina", Role::Student))
        .await
        .unwrap();
    let err = portal
        .auth
        .register(registration("amina", Role::Student))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Conflict { .. }));
}

#[tokio::test]
async fn unknown_department_is_rejected() {
    let portal = TestPortal::new();
    let mut req = registration("amina", Role::Student);
    req.department = "Astrology".to_string();
    let err = portal.auth.register(req).await.unwrap_err();
    assert!(matches!(err, PortalError::Validation { .. }));
}

#[tokio::test]
async fn all_numeric_password_is_rejected() {
    let portal = TestPortal::new();
    let mut req = registration("amina", Role::Student);
    req.password = "12345678".to_string();
    let err = portal.auth.register(req).await.unwrap_err();
    assert!(matches!(err, PortalError::Validation { .. }));
}

#[tokio::test]
async fn unapproved_student_cannot_log_in() {
    let portal = TestPortal::new();
    portal
        .auth
        .register(registration("amina", Role::Student))
        .await
        .unwrap();

    let err = portal
        .auth
        .login(login("amina", Role::Student))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NotApproved));
}

#[tokio::test]
async fn approved_student_logs_in_with_matching_role() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    let account = portal
        .auth
        .register(registration("amina", Role::Student))
        .await
        .unwrap();

    portal
        .auth
        .approve_student(&admin, account.user.id)
        .await
        .unwrap();

    let (token, logged_in) = portal
        .auth
        .login(login("amina", Role::Student))
        .await
        .unwrap();
    assert_eq!(logged_in.user.id, account.user.id);

    let ctx = portal.auth.verify_token(&token).unwrap();
    assert_eq!(ctx.user_id, account.user.id);
    assert_eq!(ctx.role, Role::Student);

    // Claiming a different role with the same credentials fails
    let err = portal
        .auth
        .login(login("amina", Role::Lecturer))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Unauthorized { .. }));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    let account = portal
        .auth
        .register(registration("amina", Role::Student))
        .await
        .unwrap();
    portal
        .auth
        .approve_student(&admin, account.user.id)
        .await
        .unwrap();

    let mut req = login("amina", Role::Student);
    req.password = "not-the-password".to_string();
    let err = portal.auth.login(req).await.unwrap_err();
    assert!(matches!(err, PortalError::Unauthorized { .. }));
}

#[tokio::test]
async fn lecturer_login_requires_the_staff_id() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    portal
        .auth
        .add_lecturer(
            &admin,
            NewLecturer {
                username: "drkline".to_string(),
                email: "drkline@portal.edu".to_string(),
                lecturer_id: "LEC-041".to_string(),
                password: "pa55word!".to_string(),
                department: Some("Networking".to_string()),
            },
        )
        .await
        .unwrap();

    // Missing staff id
    let err = portal
        .auth
        .login(login("drkline", Role::Lecturer))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Unauthorized { .. }));

    // Wrong staff id
    let mut req = login("drkline", Role::Lecturer);
    req.lecturer_id = Some("LEC-999".to_string());
    let err = portal.auth.login(req).await.unwrap_err();
    assert!(matches!(err, PortalError::Unauthorized { .. }));

    // Correct staff id, tolerating surrounding whitespace
    let mut req = login("drkline", Role::Lecturer);
    req.lecturer_id = Some(" LEC-041 ".to_string());
    let (_, account) = portal.auth.login(req).await.unwrap();
    assert_eq!(account.user.username, "drkline");
    assert!(account.profile.is_approved);
}

#[tokio::test]
async fn duplicate_lecturer_id_is_a_conflict() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    let lecturer = NewLecturer {
        username: "drkline".to_string(),
        email: "drkline@portal.edu".to_string(),
        lecturer_id: "LEC-041".to_string(),
        password: "pa55word!".to_string(),
        department: None,
    };
    portal.auth.add_lecturer(&admin, lecturer.clone()).await.unwrap();

    let mut other = lecturer;
    other.username = "drmensah".to_string();
    other.email = "drmensah@portal.edu".to_string();
    let err = portal.auth.add_lecturer(&admin, other).await.unwrap_err();
    assert!(matches!(err, PortalError::Conflict { .. }));
}

#[tokio::test]
async fn only_admins_approve_students() {
    let portal = TestPortal::new();
    let (_, lecturer) = portal.seed_lecturer("drkline", "Networking").await;
    let (student, _) = portal.seed_student("amina", "Networking").await;

    let err = portal
        .auth
        .approve_student(&lecturer, student.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Forbidden { .. }));
}

#[tokio::test]
async fn approving_a_non_student_is_not_found() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;

    let err = portal
        .auth
        .approve_student(&admin, lecturer.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NotFound { .. }));
}

#[tokio::test]
async fn delete_lecturer_rules() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;
    let (student, _) = portal.seed_student("amina", "Networking").await;

    // Admins cannot delete themselves through this operation
    let err = portal
        .auth
        .delete_lecturer(&admin, admin.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Conflict { .. }));

    // The target must actually be a lecturer
    let err = portal
        .auth
        .delete_lecturer(&admin, student.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NotFound { .. }));

    portal
        .auth
        .delete_lecturer(&admin, lecturer.user.id)
        .await
        .unwrap();
    assert!(portal.auth.list_lecturers(&admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_created_students_skip_the_approval_queue() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;

    let new_student = NewStudent {
        username: "amina".to_string(),
        email: "amina@portal.edu".to_string(),
        password: "pa55word!".to_string(),
        department: "Networking".to_string(),
    };

    // Only administrators create accounts this way
    let (_, lecturer) = portal.seed_lecturer("drkline", "Networking").await;
    let err = portal
        .auth
        .add_student(&lecturer, new_student.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Forbidden { .. }));

    let account = portal.auth.add_student(&admin, new_student).await.unwrap();
    assert_eq!(account.profile.role, Role::Student);
    assert!(account.profile.is_approved);

    // No approval step needed before the first login
    let (_, logged_in) = portal
        .auth
        .login(login("amina", Role::Student))
        .await
        .unwrap();
    assert_eq!(logged_in.user.id, account.user.id);
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let portal = TestPortal::new();
    portal
        .auth
        .ensure_admin("root", "root@portal.edu", "pa55word!")
        .await
        .unwrap();
    portal
        .auth
        .ensure_admin("root", "root@portal.edu", "pa55word!")
        .await
        .unwrap();

    let (_, account) = portal
        .auth
        .login(login("root", Role::Admin))
        .await
        .unwrap();
    assert_eq!(account.profile.role, Role::Admin);
    assert!(account.profile.is_approved);
}

#[tokio::test]
async fn profile_image_path_is_stored_on_the_profile() {
    let portal = TestPortal::new();
    let (_, student) = portal.seed_student("amina", "Networking").await;

    let account = portal
        .auth
        .set_profile_image(&student, "profiles/amina.png".to_string())
        .await
        .unwrap();
    assert_eq!(
        account.profile.profile_image.as_deref(),
        Some("profiles/amina.png")
    );
}

#[tokio::test]
async fn stale_token_for_deleted_user_fails_account_lookup() {
    let portal = TestPortal::new();
    let ctx = AuthContext::new(999, Role::Student);
    let err = portal.auth.account(ctx.user_id).await.unwrap_err();
    assert!(matches!(err, PortalError::NotFound { .. }));
}
