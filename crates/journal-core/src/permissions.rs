//! Permission tiers, the access control list and the per-route requirements.
//!
//! Routes declare what they need here; the HTTP layer resolves the caller's
//! principals and rejects the request before the handler body runs.

/// A named capability a route may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Read,
    Change,
    Create,
}

/// Who the caller is, for ACL purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Everyone,
    Authenticated,
}

/// The journal's access control list. Anything not listed is denied.
pub const ACL: &[(Principal, Permission)] = &[
    (Principal::Everyone, Permission::Read),
    (Principal::Authenticated, Permission::Change),
    (Principal::Authenticated, Permission::Create),
];

/// Principals held by a caller.
pub fn principals(authenticated: bool) -> &'static [Principal] {
    if authenticated {
        &[Principal::Everyone, Principal::Authenticated]
    } else {
        &[Principal::Everyone]
    }
}

/// Whether any of `principals` is granted `permission`.
pub fn permits(principals: &[Principal], permission: Permission) -> bool {
    ACL.iter()
        .any(|(principal, granted)| *granted == permission && principals.contains(principal))
}

/// Named routes of the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Detail,
    Edit,
    AddEntry,
    Login,
    Logout,
    Register,
    AddComment,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::Detail,
        Route::Edit,
        Route::AddEntry,
        Route::Login,
        Route::Logout,
        Route::Register,
        Route::AddComment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Detail => "detail",
            Route::Edit => "edit",
            Route::AddEntry => "add_entry",
            Route::Login => "login",
            Route::Logout => "logout",
            Route::Register => "register",
            Route::AddComment => "add_json",
        }
    }

    pub fn from_name(name: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.name() == name)
    }
}

/// Whether a request renders a view or submits a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Submit,
}

/// What a caller needs to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Permission(Permission),
}

/// The requirement for `action` on `route`.
///
/// Viewing the edit form needs `change` while submitting it needs `create`.
/// Both are granted to the same principal today, but the two are kept
/// distinct so a narrower ACL would split them.
pub fn requirement(route: Route, action: Action) -> Requirement {
    match (route, action) {
        (Route::Home | Route::Detail, _) => Requirement::Permission(Permission::Read),
        (Route::Edit, Action::View) => Requirement::Permission(Permission::Change),
        (Route::Edit, Action::Submit) => Requirement::Permission(Permission::Create),
        (Route::AddEntry, _) => Requirement::Permission(Permission::Change),
        (Route::AddComment, _) => Requirement::Authenticated,
        (Route::Login | Route::Logout | Route::Register, _) => Requirement::Public,
    }
}

/// Why a requirement was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    NotAuthenticated,
    Forbidden(Permission),
}

/// Check a requirement for a caller.
pub fn check(requirement: Requirement, authenticated: bool) -> Result<(), Denied> {
    match requirement {
        Requirement::Public => Ok(()),
        Requirement::Authenticated if authenticated => Ok(()),
        Requirement::Authenticated => Err(Denied::NotAuthenticated),
        Requirement::Permission(permission) => {
            if permits(principals(authenticated), permission) {
                Ok(())
            } else {
                Err(Denied::Forbidden(permission))
            }
        }
    }
}
