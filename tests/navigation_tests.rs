//! Tests for route gating
//!
//! Unauthenticated users land on login, wrong-role users on unauthorized.

use std::sync::Arc;

use dlvery::models::{LoginResponse, Role, User};
use dlvery::navigation::{guard, menu, Decision, Navigator, Route};
use dlvery::session::{SessionEvent, SessionManager};

fn user(role: Role) -> User {
    User {
        id: "u-1".to_string(),
        username: "amit".to_string(),
        email: "amit@dlvery.io".to_string(),
        full_name: "Amit Singh".to_string(),
        role,
        phone_number: None,
    }
}

fn login(role: Role) -> LoginResponse {
    LoginResponse {
        id: "u-1".to_string(),
        username: "amit".to_string(),
        email: "amit@dlvery.io".to_string(),
        full_name: "Amit Singh".to_string(),
        role,
        token: "tok".to_string(),
        token_type: "Bearer".to_string(),
    }
}

#[test]
fn test_public_routes_always_open() {
    for path in ["/login", "/register", "/oauth/callback/google", "/unauthorized", "/missing"] {
        assert_eq!(guard(&Route::parse(path), None), Decision::Allow, "{}", path);
    }
}

#[test]
fn test_unauthenticated_redirects_to_login() {
    for path in ["/", "/profile", "/reports", "/inventory", "/delivery/today"] {
        assert_eq!(
            guard(&Route::parse(path), None),
            Decision::Redirect(Route::Login),
            "{}",
            path
        );
    }
}

#[test]
fn test_wrong_role_redirects_to_unauthorized() {
    let agent = user(Role::DlTeam);
    let staff = user(Role::InvTeam);

    assert_eq!(
        guard(&Route::parse("/inventory/products/add"), Some(&agent)),
        Decision::Redirect(Route::Unauthorized)
    );
    assert_eq!(
        guard(&Route::parse("/deliveries/completed"), Some(&staff)),
        Decision::Redirect(Route::Unauthorized)
    );
    assert_eq!(guard(&Route::parse("/inventory/transactions"), Some(&staff)), Decision::Allow);
    assert_eq!(guard(&Route::parse("/delivery/details/d-1"), Some(&agent)), Decision::Allow);
    assert_eq!(guard(&Route::Reports, Some(&agent)), Decision::Allow);
}

#[test]
fn test_menu_entries_pass_the_guard() {
    for role in Role::ALL {
        let u = user(role);
        let items = menu(role);
        assert_eq!(items[0].path, "/");
        for item in items {
            assert_eq!(guard(&Route::parse(&item.path), Some(&u)), Decision::Allow, "{}", item.path);
        }
    }
}

#[test]
fn test_navigator_follows_session() {
    let session = Arc::new(SessionManager::in_memory());
    let mut events = session.subscribe();
    let mut nav = Navigator::new(session.clone());
    assert_eq!(nav.current(), &Route::Login);

    assert_eq!(nav.open("/inventory"), Decision::Redirect(Route::Login));

    session.establish(&login(Role::DlTeam)).unwrap();
    nav.drain(&mut events);
    assert_eq!(nav.current(), &Route::Dashboard);

    assert_eq!(nav.open("/inventory"), Decision::Redirect(Route::Unauthorized));
    assert_eq!(nav.current(), &Route::Unauthorized);

    assert_eq!(nav.open("/delivery/today"), Decision::Allow);
    assert_eq!(nav.current(), &Route::TodayDeliveries);

    session.expire().unwrap();
    nav.drain(&mut events);
    assert_eq!(nav.current(), &Route::Login);
}

#[test]
fn test_expired_event_forces_login() {
    let session = Arc::new(SessionManager::in_memory());
    session.establish(&login(Role::InvTeam)).unwrap();
    let mut nav = Navigator::new(session);
    nav.open("/inventory/products");
    assert_eq!(nav.current(), &Route::Products);

    nav.handle(&SessionEvent::Expired);
    assert_eq!(nav.current(), &Route::Login);
}
