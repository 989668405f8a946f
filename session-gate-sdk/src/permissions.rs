//! Pure permission evaluation.
//!
//! The effective permission set is the union of permissions reachable in the
//! session's company → project → role/app hierarchy after applying the
//! scoping filters:
//!
//! - a project contributes nothing when a `project_id` scope is set and does
//!   not match its `_id` (projects are exclusionary under mismatch);
//! - a role is skipped when a `role_id` scope is set and does not match;
//! - app permissions are unioned unconditionally within a matching project —
//!   apps are never role-scoped.
//!
//! The accumulator is a set: duplicate permission names collapse and carry
//! no counting semantics.

use std::collections::HashSet;

use crate::error::AuthorizeError;
use crate::models::{Requirement, Scoping, SessionUser};

/// Compute the effective permission set for a session under the given
/// scoping filters.
///
/// A missing user or an empty hierarchy yields the empty set.
#[must_use]
pub fn effective_permissions(user: Option<&SessionUser>, scoping: &Scoping) -> HashSet<String> {
    let mut effective = HashSet::new();
    let Some(user) = user else {
        return effective;
    };

    for company in &user.company {
        for project in &company.project {
            if let Some(project_id) = scoping.project_id.as_deref()
                && project.id.as_deref() != Some(project_id)
            {
                continue;
            }
            for role in &project.role {
                if let Some(role_id) = scoping.role_id.as_deref()
                    && role.id.as_deref() != Some(role_id)
                {
                    continue;
                }
                effective.extend(role.permissions.iter().cloned());
            }
            for app in &project.app {
                effective.extend(app.permissions.iter().cloned());
            }
        }
    }

    effective
}

/// Scoping guard for JWT-typed sessions.
///
/// A JWT-typed session must be scoped by at least one of `project_id` or
/// `role_id`; the guard runs before permission computation and its failure
/// is a client-error classification distinct from a denial.
///
/// # Errors
///
/// Returns [`AuthorizeError::MissingScoping`] when the session is JWT-typed
/// and both scoping signals are absent.
pub fn check_jwt_scoping(
    user: Option<&SessionUser>,
    scoping: &Scoping,
) -> Result<(), AuthorizeError> {
    if let Some(user) = user
        && user.is_jwt_session()
        && scoping.is_empty()
    {
        return Err(AuthorizeError::MissingScoping);
    }
    Ok(())
}

/// Run a full authorization check: scoping guard, then predicate evaluation
/// over the effective permission set.
///
/// # Errors
///
/// - [`AuthorizeError::MissingScoping`] when the JWT scoping guard fails.
/// - [`AuthorizeError::PermissionDenied`] when the effective permissions do
///   not satisfy the requirement.
pub fn authorize(
    user: Option<&SessionUser>,
    requirement: &Requirement,
    scoping: &Scoping,
) -> Result<(), AuthorizeError> {
    check_jwt_scoping(user, scoping)?;
    let effective = effective_permissions(user, scoping);
    if requirement.satisfied_by(&effective) {
        Ok(())
    } else {
        Err(AuthorizeError::PermissionDenied)
    }
}

/// ANY-mode verdict without the response-writing side effect.
#[must_use]
pub fn any_granted(user: Option<&SessionUser>, scoping: &Scoping, required: &[&str]) -> bool {
    let effective = effective_permissions(user, scoping);
    required.iter().any(|permission| effective.contains(*permission))
}

/// ALL-mode verdict without the response-writing side effect.
#[must_use]
pub fn all_granted(user: Option<&SessionUser>, scoping: &Scoping, required: &[&str]) -> bool {
    let effective = effective_permissions(user, scoping);
    required.iter().all(|permission| effective.contains(*permission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{App, Company, Project, Role};

    fn role(id: &str, permissions: &[&str]) -> Role {
        Role {
            id: Some(id.to_owned()),
            permissions: permissions.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    fn app(permissions: &[&str]) -> App {
        App {
            id: None,
            permissions: permissions.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    fn project(id: &str, roles: Vec<Role>, apps: Vec<App>) -> Project {
        Project {
            id: Some(id.to_owned()),
            role: roles,
            app: apps,
        }
    }

    fn user_with(projects: Vec<Project>) -> SessionUser {
        SessionUser {
            company: vec![Company { project: projects }],
            ..SessionUser::default()
        }
    }

    fn scoped(project_id: Option<&str>, role_id: Option<&str>) -> Scoping {
        Scoping::new(project_id.map(str::to_owned), role_id.map(str::to_owned))
    }

    #[test]
    fn missing_user_yields_empty_set() {
        assert!(effective_permissions(None, &Scoping::default()).is_empty());
    }

    #[test]
    fn empty_company_yields_empty_set_and_all_mode_denies() {
        let user = SessionUser::default();
        let effective = effective_permissions(Some(&user), &Scoping::default());
        assert!(effective.is_empty());

        let requirement = Requirement::all(["read"]);
        assert_eq!(
            authorize(Some(&user), &requirement, &Scoping::default()),
            Err(AuthorizeError::PermissionDenied)
        );
    }

    #[test]
    fn unmatched_project_scope_excludes_everything() {
        let user = user_with(vec![project(
            "p1",
            vec![role("r1", &["read", "write"])],
            vec![app(&["admin"])],
        )]);

        let effective = effective_permissions(Some(&user), &scoped(Some("p2"), None));
        assert!(effective.is_empty());
    }

    #[test]
    fn app_permissions_ignore_role_scoping() {
        // Role r1 is excluded by the role_id filter, the app is not.
        let user = user_with(vec![project(
            "p1",
            vec![role("r1", &["read"])],
            vec![app(&["report"])],
        )]);

        let effective = effective_permissions(Some(&user), &scoped(None, Some("r9")));
        assert_eq!(effective, HashSet::from(["report".to_owned()]));
    }

    #[test]
    fn role_scope_selects_single_role() {
        let user = user_with(vec![project(
            "p1",
            vec![role("r1", &["a"]), role("r2", &["b"])],
            vec![],
        )]);

        let effective = effective_permissions(Some(&user), &scoped(Some("p1"), Some("r2")));
        assert_eq!(effective, HashSet::from(["b".to_owned()]));
    }

    #[test]
    fn permissions_union_across_companies_and_projects() {
        let user = SessionUser {
            company: vec![
                Company {
                    project: vec![project("p1", vec![role("r1", &["a", "a"])], vec![])],
                },
                Company {
                    project: vec![project("p2", vec![], vec![app(&["b"])])],
                },
            ],
            ..SessionUser::default()
        };

        let effective = effective_permissions(Some(&user), &Scoping::default());
        assert_eq!(effective, HashSet::from(["a".to_owned(), "b".to_owned()]));
    }

    #[test]
    fn any_mode_grants_on_non_empty_intersection() {
        let user = user_with(vec![project("p1", vec![role("r1", &["read"])], vec![])]);

        assert!(authorize(Some(&user), &Requirement::any(["read", "write"]), &Scoping::default()).is_ok());
        assert_eq!(
            authorize(Some(&user), &Requirement::any(["write"]), &Scoping::default()),
            Err(AuthorizeError::PermissionDenied)
        );
    }

    #[test]
    fn all_mode_grants_only_on_subset() {
        let user = user_with(vec![project(
            "p1",
            vec![role("r1", &["read", "write"])],
            vec![],
        )]);

        assert!(authorize(Some(&user), &Requirement::all(["read", "write"]), &Scoping::default()).is_ok());
        assert_eq!(
            authorize(
                Some(&user),
                &Requirement::all(["read", "write", "delete"]),
                &Scoping::default()
            ),
            Err(AuthorizeError::PermissionDenied)
        );
    }

    #[test]
    fn all_implies_any_for_non_empty_requirements() {
        let grants: [&[&str]; 4] = [&[], &["a"], &["a", "b"], &["a", "b", "c"]];
        let requirements: [&[&str]; 3] = [&["a"], &["b", "c"], &["a", "c"]];

        for granted in grants {
            let user = user_with(vec![project("p1", vec![role("r1", granted)], vec![])]);
            for required in requirements {
                let all = all_granted(Some(&user), &Scoping::default(), required);
                let any = any_granted(Some(&user), &Scoping::default(), required);
                if all {
                    assert!(any, "ALL({required:?}) granted but ANY was not");
                }
            }
        }
    }

    #[test]
    fn jwt_guard_fails_without_scoping_signals() {
        let user = SessionUser {
            session_type: Some("jwt".to_owned()),
            ..SessionUser::default()
        };

        assert_eq!(
            check_jwt_scoping(Some(&user), &Scoping::default()),
            Err(AuthorizeError::MissingScoping)
        );
        // The guard runs before permission computation, so even a
        // permission-rich session fails the same way.
        let rich = SessionUser {
            session_type: Some("jwt".to_owned()),
            ..user_with(vec![project("p1", vec![role("r1", &["read"])], vec![])])
        };
        assert_eq!(
            authorize(Some(&rich), &Requirement::any(["read"]), &Scoping::default()),
            Err(AuthorizeError::MissingScoping)
        );
    }

    #[test]
    fn jwt_guard_passes_with_either_scoping_signal() {
        let user = SessionUser {
            session_type: Some("jwt".to_owned()),
            ..SessionUser::default()
        };

        assert!(check_jwt_scoping(Some(&user), &scoped(Some("p1"), None)).is_ok());
        assert!(check_jwt_scoping(Some(&user), &scoped(None, Some("r1"))).is_ok());
    }

    #[test]
    fn non_jwt_sessions_skip_the_guard() {
        let user = SessionUser {
            session_type: Some("basic".to_owned()),
            ..SessionUser::default()
        };
        assert!(check_jwt_scoping(Some(&user), &Scoping::default()).is_ok());
        assert!(check_jwt_scoping(None, &Scoping::default()).is_ok());
    }

    #[test]
    fn boolean_variants_match_authorize() {
        let user = user_with(vec![project("p1", vec![role("r1", &["read"])], vec![])]);
        let scoping = Scoping::default();

        assert!(any_granted(Some(&user), &scoping, &["read", "write"]));
        assert!(!all_granted(Some(&user), &scoping, &["read", "write"]));
        assert!(!any_granted(None, &scoping, &["read"]));
    }
}
