use accounts::domain::{FullName, NewUser, UserEmail, UserPassword};
use accounts::forms::{FieldError, PasswordPolicy, SaveError, UserCreationForm};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use secrecy::Secret;
use serde_json::Value;

use crate::helpers::{self, TestUser};

#[tokio::test]
async fn register_persists_a_new_user_and_returns_201_for_valid_data() {
    let app = helpers::spawn_app().await;

    let response = app
        .register(&[
            ("email", "a@b.com"),
            ("full_name", "A B"),
            ("password1", "Secret123!"),
            ("password2", "Secret123!"),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["full_name"], "A B");

    let saved = app
        .stored_user("a@b.com")
        .await
        .expect("The user was not persisted.");
    assert_eq!(saved.id.to_string(), body["id"].as_str().unwrap());
    assert_eq!(saved.email, "a@b.com");
    assert_eq!(saved.full_name, "A B");
    assert!(saved.is_active);
    assert!(!saved.is_staff);
    assert!(saved.last_login.is_none());
}

#[tokio::test]
async fn register_stores_a_verifiable_hash_instead_of_the_password() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let response = app.register(&user.form()).await;
    assert_eq!(response.status().as_u16(), 201);

    let saved = app.stored_user(&user.email).await.unwrap();
    let hash = app.stored_password_hash(saved.id).await;

    assert_ne!(hash, user.password);
    assert!(hash.starts_with("$argon2id$"));
    let parsed = PasswordHash::new(&hash).expect("The stored hash is not a PHC string.");
    Argon2::default()
        .verify_password(user.password.as_bytes(), &parsed)
        .expect("The stored hash does not verify the registered password.");
}

#[tokio::test]
async fn register_returns_400_and_persists_nothing_when_passwords_differ() {
    let app = helpers::spawn_app().await;

    let response = app
        .register(&[
            ("email", "a@b.com"),
            ("full_name", "A B"),
            ("password1", "x"),
            ("password2", "y"),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["field"], "password2");
    assert_eq!(body["errors"][0]["messages"][0]["code"], "password_mismatch");
    assert_eq!(app.count_users().await, 0);
}

#[tokio::test]
async fn register_returns_400_when_required_fields_are_missing() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let test_cases = vec![
        (
            vec![
                ("full_name", user.full_name.as_str()),
                ("password1", user.password.as_str()),
                ("password2", user.password.as_str()),
            ],
            "email",
        ),
        (
            vec![
                ("email", user.email.as_str()),
                ("password1", user.password.as_str()),
                ("password2", user.password.as_str()),
            ],
            "full_name",
        ),
        (
            vec![
                ("email", user.email.as_str()),
                ("full_name", user.full_name.as_str()),
            ],
            "password1",
        ),
    ];

    for (invalid_form, missing) in test_cases {
        let response = app.register(&invalid_form).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the form was missing {missing}."
        );

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["field"], missing);
        assert_eq!(body["errors"][0]["messages"][0]["code"], "required");
    }
    assert_eq!(app.count_users().await, 0);
}

#[tokio::test]
async fn register_returns_400_when_fields_are_invalid() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();
    let long_name = "a".repeat(256);

    let test_cases = vec![
        (("email", "definitely wrong email"), "email", "invalid"),
        (("full_name", "   "), "full_name", "required"),
        (("full_name", long_name.as_str()), "full_name", "max_length"),
        (("password", "Zq1!"), "password2", "password_too_short"),
        (("password", "password123"), "password2", "password_too_common"),
    ];

    for ((key, value), field, code) in test_cases {
        let mut form = user.form();
        match key {
            "password" => {
                form[2].1 = value.to_string();
                form[3].1 = value.to_string();
            }
            key => {
                if let Some(entry) = form.iter_mut().find(|(name, _)| *name == key) {
                    entry.1 = value.to_string();
                }
            }
        }

        let response = app.register(&form).await;
        assert_eq!(response.status().as_u16(), 400, "{value} should be rejected");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["field"], field);
        assert_eq!(body["errors"][0]["messages"][0]["code"], code);
    }
}

#[tokio::test]
async fn register_returns_400_when_the_email_is_already_taken() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let response = app.register(&user.form()).await;
    assert_eq!(response.status().as_u16(), 201);

    let mut second = TestUser::generate().form();
    second[0].1 = user.email.to_uppercase();
    let response = app.register(&second).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["field"], "email");
    assert_eq!(body["errors"][0]["messages"][0]["code"], "unique");
    assert_eq!(app.count_users().await, 1);
}

#[tokio::test]
async fn save_reports_a_unique_error_when_the_database_rejects_a_duplicate_email() {
    let app = helpers::spawn_app().await;

    let response = app
        .register(&[
            ("email", "anne@example.com"),
            ("full_name", "Anne Smith"),
            ("password1", "Secret123!"),
            ("password2", "Secret123!"),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 201);

    // Saving without `validate_unique`, as a concurrent registration would.
    let duplicate = NewUser {
        email: UserEmail::parse("ANNE@EXAMPLE.COM".to_string()).unwrap(),
        full_name: FullName::parse("Anne Other".to_string()).unwrap(),
        password: UserPassword::new(Secret::new("Secret123!".to_string())),
    };
    let result = UserCreationForm::new(PasswordPolicy::default())
        .save(duplicate, &app.db_pool)
        .await;

    let errors = match result {
        Err(SaveError::Invalid(errors)) => errors,
        other => panic!("Expected a field error, got {:?}", other.map(|user| user.id)),
    };
    assert_eq!(errors.get("email"), Some([FieldError::Unique].as_slice()));
    assert_eq!(app.count_users().await, 1);
}

#[tokio::test]
async fn register_accepts_full_names_with_punctuation() {
    let app = helpers::spawn_app().await;
    let mut form = TestUser::generate().form();
    form[1].1 = "Anne (Annie) Smith".to_string();

    let response = app.register(&form).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["full_name"], "Anne (Annie) Smith");
}

#[tokio::test]
async fn register_ignores_fields_that_are_not_declared() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let mut form = user.form();
    form.push(("is_staff", "true".to_string()));
    let response = app.register(&form).await;
    assert_eq!(response.status().as_u16(), 201);

    let saved = app.stored_user(&user.email).await.unwrap();
    assert!(!saved.is_staff);
}

#[tokio::test]
async fn register_returns_500_on_fatal_database_error() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    // Sabotage the database
    sqlx::query("ALTER TABLE users DROP COLUMN full_name;")
        .execute(&app.db_pool)
        .await
        .unwrap();

    let response = app.register(&user.form()).await;
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn registration_fields_are_listed_in_form_order() {
    let app = helpers::spawn_app().await;

    let response = app.get_registration_fields().await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let names: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["email", "full_name", "password1", "password2"]);
    assert_eq!(body["fields"][0]["max_length"], 254);
    assert!(body["fields"][2]["help_text"].as_array().unwrap().len() > 1);
}
