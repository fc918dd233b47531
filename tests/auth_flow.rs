mod common;

use common::open_state;
use roster_tauri::app::{AppState, LoginForm};
use roster_tauri::auth::Screen;
use tempfile::TempDir;

fn form(email: &str, password: &str, confirm: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
    }
}

#[test]
fn admin_emails_route_to_the_admin_screen() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);
    app.sign_up(&form("ops@smarted.io", "hunter22", "hunter22"))
        .unwrap();
    assert_eq!(app.session().map(|s| s.screen), Some(Screen::Hr));
    app.sign_out();

    let notice = app.sign_in(&form("ops@smarted.io", "hunter22", "")).unwrap();
    assert_eq!(notice.title, "Login Successful");
    assert_eq!(notice.description, "Welcome back!");
    assert_eq!(app.session().map(|s| s.screen), Some(Screen::Admin));
}

#[test]
fn registration_errors_carry_fixed_messages() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);

    let err = app.sign_up(&form("hr@corp.io", "12345", "12345")).unwrap_err();
    let notice = err.notice();
    assert_eq!(notice.title, "Registration Failed");
    assert_eq!(notice.description, "Password should be at least 6 characters.");

    app.sign_up(&form("hr@corp.io", "123456", "123456")).unwrap();
    let err = app.sign_up(&form("HR@corp.io", "123456", "123456")).unwrap_err();
    assert_eq!(
        err.notice().description,
        "An account with this email already exists."
    );
}

#[test]
fn wrong_password_is_rejected_and_session_stays_empty() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);
    app.sign_up(&form("hr@corp.io", "correct1", "correct1")).unwrap();
    app.sign_out();

    let err = app.sign_in(&form("hr@corp.io", "wrong111", "")).unwrap_err();
    assert_eq!(err.notice().description, "Incorrect password.");
    assert!(app.session().is_none());
}

#[test]
fn accounts_and_roster_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut app = open_state(&dir);
        app.sign_up(&form("hr@corp.io", "secret1", "secret1")).unwrap();
        app.hr.load(&app.store).unwrap();
        app.hr.toggle_bookmark(&mut app.store, "STU001").unwrap();
    }
    let mut app = open_state(&dir);
    app.sign_in(&form("hr@corp.io", "secret1", "")).unwrap();
    app.hr.load(&app.store).unwrap();
    assert_eq!(app.hr.stats().bookmarks, 1);
    assert_eq!(app.hr.stats().total_candidates, 8);
}

#[test]
fn first_launch_writes_config_and_seeds() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("roster.config.json"), r#"{ "kdf_iterations": 10 }"#).unwrap();
    let mut app = AppState::open(dir.path()).unwrap();
    assert!(dir.path().join("roster.config.json").exists());
    assert!(!app.config.store_secret.is_empty());
    app.home.submit_key("BE0708", &app.store).unwrap();
    assert_eq!(app.home.unlocked().len(), 1);
}

#[test]
fn disabled_accounts_cannot_sign_in_until_enabled() {
    let dir = TempDir::new().unwrap();
    let mut app = open_state(&dir);
    app.sign_up(&form("hr@corp.io", "secret1", "secret1")).unwrap();
    app.sign_out();

    let notice = app.set_account_disabled("hr@corp.io", true).unwrap();
    assert_eq!(notice.description, "Account disabled");
    let notice = app.sign_in(&form("hr@corp.io", "secret1", "")).unwrap_err().notice();
    assert_eq!(notice.title, "Login Failed");
    assert_eq!(notice.description, "This account has been disabled.");
    assert!(app.session().is_none());

    app.set_account_disabled("hr@corp.io", false).unwrap();
    assert_eq!(app.sign_in(&form("hr@corp.io", "secret1", "")).unwrap().title, "Login Successful");
}

#[test]
fn disabling_an_unknown_account_reports_it() {
    let dir = TempDir::new().unwrap();
    let app = open_state(&dir);
    let notice = app.set_account_disabled("ghost@corp.io", true).unwrap_err().notice();
    assert_eq!(notice.title, "Error");
    assert_eq!(notice.description, "No account found with this email.");
}
