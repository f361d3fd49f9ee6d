use ::common::ExpertLevel;
use sea_orm::{ActiveModelTrait, Set};
use shelter::entity::caretaker;

use crate::common::{PASSWORD, TestApp, routes};

/// Insert a caretaker straight into the database, skipping password hashing.
async fn insert_caretaker(app: &TestApp, username: &str, email: &str) {
    caretaker::ActiveModel {
        username: Set(username.to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        email: Set(email.to_string()),
        password: Set("!unusable".to_string()),
        expert_level: Set(ExpertLevel::default()),
        is_staff: Set(false),
        is_superuser: Set(false),
        is_active: Set(true),
        date_joined: Set(chrono::Utc::now()),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .expect("Failed to insert caretaker");
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn anyone_can_register() {
        let app = TestApp::spawn().await;

        let form = app.get_without_token(routes::CARETAKER_CREATE).await;
        assert_eq!(form.status, 200);
        assert_eq!(form.body["expert_levels"].as_array().unwrap().len(), 4);

        let res = app
            .post_form_without_token(
                routes::CARETAKER_CREATE,
                &[
                    ("username", "alice"),
                    ("first_name", "Alice"),
                    ("email", "alice@example.com"),
                    ("expert_level", "advanced"),
                    ("password1", PASSWORD),
                    ("password2", PASSWORD),
                ],
            )
            .await;
        assert_eq!(res.status, 303, "{}", res.text);
        let id = res.location_id();
        assert_eq!(res.location, Some(routes::caretaker(id)));

        let token = app.login("alice", PASSWORD).await;
        let detail = app.get_with_token(&routes::caretaker(id), &token).await;
        assert_eq!(detail.status, 200);
        let caretaker = &detail.body["caretaker"];
        assert_eq!(caretaker["username"], "alice");
        assert_eq!(caretaker["first_name"], "Alice");
        assert_eq!(caretaker["expert_level"], "advanced");
        assert_eq!(caretaker["is_staff"], false);
        assert!(caretaker.get("password").is_none());
        assert!(!caretaker["last_login"].is_null());
    }

    #[tokio::test]
    async fn expert_level_defaults_to_beginner() {
        let app = TestApp::spawn().await;
        let id = app.register("alice", PASSWORD).await;
        let token = app.login("alice", PASSWORD).await;

        let detail = app.get_with_token(&routes::caretaker(id), &token).await;
        assert_eq!(detail.body["caretaker"]["expert_level"], "beginner");
    }

    #[tokio::test]
    async fn passwords_must_match() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form_without_token(
                routes::CARETAKER_CREATE,
                &[
                    ("username", "alice"),
                    ("password1", PASSWORD),
                    ("password2", "Password1234!"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.field_errors("password2"),
            ["The two password fields didn’t match."]
        );
    }

    #[tokio::test]
    async fn weak_password_is_explained() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form_without_token(
                routes::CARETAKER_CREATE,
                &[("username", "alice"), ("password1", "1234"), ("password2", "1234")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.field_errors("password2"),
            [
                "This password is too short. It must contain at least 8 characters.",
                "This password is entirely numeric.",
            ]
        );
    }

    #[tokio::test]
    async fn missing_fields_are_reported() {
        let app = TestApp::spawn().await;

        let res = app.post_form_without_token(routes::CARETAKER_CREATE, &[]).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.field_errors("username"), ["This field is required."]);
        assert_eq!(res.field_errors("password1"), ["This field is required."]);
        assert_eq!(res.field_errors("password2"), ["This field is required."]);
    }

    #[tokio::test]
    async fn username_characters_are_restricted() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form_without_token(
                routes::CARETAKER_CREATE,
                &[("username", "al ice"), ("password1", PASSWORD), ("password2", PASSWORD)],
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(res.field_errors("username")[0].starts_with("Enter a valid username."));
    }

    #[tokio::test]
    async fn usernames_are_unique_ignoring_case() {
        let app = TestApp::spawn().await;
        app.register("alice", PASSWORD).await;

        let res = app
            .post_form_without_token(
                routes::CARETAKER_CREATE,
                &[("username", "ALICE"), ("password1", PASSWORD), ("password2", PASSWORD)],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.field_errors("username"),
            ["A user with that username already exists."]
        );
    }
}

mod access {
    use super::*;

    #[tokio::test]
    async fn list_and_detail_require_login() {
        let app = TestApp::spawn().await;
        let id = app.register("alice", PASSWORD).await;

        let list = app.get_without_token(routes::CARETAKERS).await;
        assert_eq!(list.status, 302);
        assert_eq!(
            list.location.as_deref(),
            Some("/accounts/login/?next=/caretakers/")
        );

        let detail = app.get_without_token(&routes::caretaker(id)).await;
        assert_eq!(detail.status, 302);
        assert_eq!(
            detail.location,
            Some(format!("/accounts/login/?next=/caretakers/{id}/"))
        );
    }

    #[tokio::test]
    async fn update_and_delete_require_login() {
        let app = TestApp::spawn().await;
        let id = app.register("alice", PASSWORD).await;

        for path in [routes::caretaker_update(id), routes::caretaker_delete(id)] {
            let res = app.post_form_without_token(&path, &[]).await;
            assert_eq!(res.status, 302, "POST {path}");
        }

        // Still able to log in: nothing was changed or deleted.
        app.login("alice", PASSWORD).await;
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn search_by_username_ignores_case() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        insert_caretaker(&app, "bob", "").await;
        insert_caretaker(&app, "Bobby", "").await;

        let res = app
            .get_with_token(&format!("{}?username=BOB", routes::CARETAKERS), &token)
            .await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Bobby", "bob"]);
    }

    #[tokio::test]
    async fn pages_hold_fifteen_caretakers() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("aaa").await;
        for i in 0..16 {
            insert_caretaker(&app, &format!("keeper{i:02}"), "").await;
        }

        let first = app.get_with_token(routes::CARETAKERS, &token).await;
        assert_eq!(first.body["data"].as_array().unwrap().len(), 15);
        assert_eq!(first.body["is_paginated"], true);
        assert_eq!(first.body["data"][0]["username"], "aaa");

        let second = app
            .get_with_token(&format!("{}?page=2", routes::CARETAKERS), &token)
            .await;
        let rows = second.body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["username"], "keeper15");
    }
}

mod changes {
    use super::*;

    #[tokio::test]
    async fn update_without_passwords_keeps_the_old_one() {
        let app = TestApp::spawn().await;
        let id = app.register("alice", PASSWORD).await;
        let token = app.login("alice", PASSWORD).await;

        let form = app.get_with_token(&routes::caretaker_update(id), &token).await;
        assert_eq!(form.status, 200);
        assert_eq!(form.body["caretaker"]["username"], "alice");

        let res = app
            .post_form_with_token(
                &routes::caretaker_update(id),
                &[
                    ("username", "alice"),
                    ("last_name", "Liddell"),
                    ("expert_level", "Expert"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 303, "{}", res.text);
        assert_eq!(res.location, Some(routes::caretaker(id)));

        let token = app.login("alice", PASSWORD).await;
        let detail = app.get_with_token(&routes::caretaker(id), &token).await;
        assert_eq!(detail.body["caretaker"]["last_name"], "Liddell");
        assert_eq!(detail.body["caretaker"]["expert_level"], "expert");
    }

    #[tokio::test]
    async fn update_with_passwords_changes_it() {
        let app = TestApp::spawn().await;
        let id = app.register("alice", PASSWORD).await;
        let token = app.login("alice", PASSWORD).await;

        let res = app
            .post_form_with_token(
                &routes::caretaker_update(id),
                &[
                    ("username", "alice"),
                    ("password1", "Another5678#"),
                    ("password2", "Another5678#"),
                ],
                &token,
            )
            .await;
        assert_eq!(res.status, 303, "{}", res.text);

        let old = app
            .post_form_without_token(
                routes::LOGIN,
                &[("username", "alice"), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(old.status, 401);
        app.login("alice", "Another5678#").await;
    }

    #[tokio::test]
    async fn renaming_onto_another_username_is_refused() {
        let app = TestApp::spawn().await;
        app.register("bob", PASSWORD).await;
        let id = app.register("alice", PASSWORD).await;
        let token = app.login("alice", PASSWORD).await;

        let res = app
            .post_form_with_token(&routes::caretaker_update(id), &[("username", "Bob")], &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.field_errors("username"),
            ["A user with that username already exists."]
        );
    }

    #[tokio::test]
    async fn delete_keeps_the_dogs() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let bob = app.register("bob", PASSWORD).await;
        let breed = app.create_breed(&token, "Pekiness", "S").await;
        let bob_field = bob.to_string();
        let breed_field = breed.to_string();
        let res = app
            .post_form_with_token(
                routes::DOG_CREATE,
                &[
                    ("name", "Brovko"),
                    ("date_registered", "2023-06-20"),
                    ("gender", "M"),
                    ("breed", &breed_field),
                    ("caretakers", &bob_field),
                ],
                &token,
            )
            .await;
        let dog = res.location_id();

        let confirm = app.get_with_token(&routes::caretaker_delete(bob), &token).await;
        assert_eq!(confirm.status, 200);
        assert_eq!(confirm.body["username"], "bob");

        let res = app
            .post_form_with_token(&routes::caretaker_delete(bob), &[], &token)
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(routes::CARETAKERS));

        let gone = app.get_with_token(&routes::caretaker(bob), &token).await;
        assert_eq!(gone.status, 404);
        let detail = app.get_without_token(&routes::dog(dog)).await;
        assert_eq!(detail.status, 200);
        assert_eq!(detail.body["caretakers"], serde_json::json!([]));
    }
}
