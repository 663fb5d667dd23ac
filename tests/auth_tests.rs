mod common;

use chrono::NaiveDate;
use common::temp_base;
use finance_core::{
    auth::{AuthError, CredentialStore, JsonCredentialStore, Session},
    utils::paths,
};

fn store() -> JsonCredentialStore {
    JsonCredentialStore::new(paths::users_file_in(&temp_base()))
}

fn birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1988, 11, 2).unwrap()
}

#[test]
fn signup_login_and_session() {
    let store = store();
    let registered = store
        .register("Carla Souza", "carla@example.com", "s3cret!", birthday())
        .unwrap();
    assert_eq!(registered.name, "Carla Souza");
    assert_eq!(registered.birth_date, birthday());

    let profile = store.authenticate("carla@example.com", "s3cret!").unwrap();
    let session = Session::start(profile);
    assert_eq!(session.profile.id, registered.id);
    assert!(session.token.contains(&registered.id));
}

#[test]
fn accounts_survive_a_new_store_handle() {
    let base = temp_base();
    let path = paths::users_file_in(&base);
    JsonCredentialStore::new(path.clone())
        .register("Dan", "dan@example.com", "letmein1", birthday())
        .unwrap();
    let reopened = JsonCredentialStore::new(path);
    assert!(reopened.authenticate("dan@example.com", "letmein1").is_ok());
}

#[test]
fn failures_are_typed() {
    let store = store();
    assert!(matches!(
        store.authenticate("nobody@example.com", "whatever"),
        Err(AuthError::InvalidCredentials)
    ));
    store.register("Eve", "eve@example.com", "password1", birthday()).unwrap();
    assert!(matches!(
        store.register("Eve Two", "EVE@example.com", "password2", birthday()),
        Err(AuthError::EmailAlreadyUsed(_))
    ));
    assert!(matches!(
        store.request_password_reset("ghost@example.com"),
        Err(AuthError::UnknownEmail(_))
    ));
    assert!(matches!(
        store.register("", "new@example.com", "password1", birthday()),
        Err(AuthError::InvalidInput(_))
    ));
}
