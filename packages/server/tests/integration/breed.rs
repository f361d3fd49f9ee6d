use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod access {
    use super::*;

    #[tokio::test]
    async fn anonymous_create_form_redirects_to_login() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::BREED_CREATE).await;

        assert_eq!(res.status, 302);
        assert_eq!(
            res.location.as_deref(),
            Some("/accounts/login/?next=/breeds/create/")
        );
    }

    #[tokio::test]
    async fn anonymous_post_redirects_and_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form_without_token(routes::BREED_CREATE, &[("name", "Pekiness")])
            .await;
        assert_eq!(res.status, 302);

        let list = app.get_without_token(routes::BREEDS).await;
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn anonymous_update_redirects_even_with_a_broken_body() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let id = app.create_breed(&token, "Pekiness", "S").await;

        let res = app
            .client
            .post(app.url(&routes::breed_update(id)))
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        let res = TestResponse::from_response(res).await;

        assert_eq!(res.status, 302);
        assert_eq!(
            res.location,
            Some(format!("/accounts/login/?next=/breeds/{id}/update/"))
        );
    }

    #[tokio::test]
    async fn forged_token_is_treated_as_anonymous() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(routes::BREED_CREATE, "not-a-real-token")
            .await;

        assert_eq!(res.status, 302);
    }

    #[tokio::test]
    async fn list_and_detail_are_public() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let id = app.create_breed(&token, "Pekiness", "S").await;

        assert_eq!(app.get_without_token(routes::BREEDS).await.status, 200);
        assert_eq!(app.get_without_token(&routes::breed(id)).await.status, 200);
    }
}

mod crud {
    use super::*;

    #[tokio::test]
    async fn create_redirects_to_detail_and_round_trips() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app
            .post_form_with_token(
                routes::BREED_CREATE,
                &[("name", "Pekiness"), ("dog_size", "S")],
                &token,
            )
            .await;
        assert_eq!(res.status, 303);
        let id = res.location_id();
        assert_eq!(res.location.as_deref(), Some(routes::breed(id).as_str()));

        let detail = app.get_without_token(&routes::breed(id)).await;
        assert_eq!(detail.status, 200);
        assert_eq!(detail.body["name"], "Pekiness");
        assert_eq!(detail.body["dog_size"], "small");
        assert_eq!(detail.body["dogs"], json!([]));
    }

    #[tokio::test]
    async fn json_bodies_are_accepted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(
                routes::BREED_CREATE,
                &json!({"name": "Akita", "dog_size": "large"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 303);
        let detail = app.get_without_token(&routes::breed(res.location_id())).await;
        assert_eq!(detail.body["dog_size"], "large");
    }

    #[tokio::test]
    async fn size_defaults_to_medium() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app
            .post_form_with_token(routes::BREED_CREATE, &[("name", "Mutt")], &token)
            .await;

        let detail = app.get_without_token(&routes::breed(res.location_id())).await;
        assert_eq!(detail.body["dog_size"], "medium");
    }

    #[tokio::test]
    async fn create_form_lists_the_sizes() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::BREED_CREATE, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["breed"], serde_json::Value::Null);
        assert_eq!(res.body["dog_sizes"].as_array().unwrap().len(), 4);
        assert_eq!(res.body["dog_sizes"][0]["value"], "S");
    }

    #[tokio::test]
    async fn missing_name_is_a_field_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app
            .post_form_with_token(routes::BREED_CREATE, &[("dog_size", "S")], &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.field_errors("name"), ["This field is required."]);
    }

    #[tokio::test]
    async fn unknown_size_is_a_field_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app
            .post_form_with_token(
                routes::BREED_CREATE,
                &[("name", "Pekiness"), ("dog_size", "X")],
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(!res.field_errors("dog_size").is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        app.create_breed(&token, "Pekiness", "S").await;

        let res = app
            .post_form_with_token(routes::BREED_CREATE, &[("name", "Pekiness")], &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.field_errors("name"),
            ["Breed with this Name already exists."]
        );
    }

    #[tokio::test]
    async fn update_changes_fields_and_redirects_to_detail() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let id = app.create_breed(&token, "Pekiness", "S").await;

        let form = app.get_with_token(&routes::breed_update(id), &token).await;
        assert_eq!(form.status, 200);
        assert_eq!(form.body["breed"]["name"], "Pekiness");

        let res = app
            .post_form_with_token(
                &routes::breed_update(id),
                &[("name", "Pekingese"), ("dog_size", "G")],
                &token,
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(routes::breed(id).as_str()));

        let detail = app.get_without_token(&routes::breed(id)).await;
        assert_eq!(detail.body["name"], "Pekingese");
        assert_eq!(detail.body["dog_size"], "giant");
    }

    #[tokio::test]
    async fn keeping_the_same_name_on_update_is_allowed() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let id = app.create_breed(&token, "Pekiness", "S").await;

        let res = app
            .post_form_with_token(
                &routes::breed_update(id),
                &[("name", "Pekiness"), ("dog_size", "L")],
                &token,
            )
            .await;

        assert_eq!(res.status, 303);
    }

    #[tokio::test]
    async fn update_of_unknown_breed_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;

        let res = app
            .post_form_with_token(&routes::breed_update(999), &[("name", "X")], &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_removes_an_unused_breed() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let id = app.create_breed(&token, "Pekiness", "S").await;

        let confirm = app.get_with_token(&routes::breed_delete(id), &token).await;
        assert_eq!(confirm.status, 200);
        assert_eq!(confirm.body["name"], "Pekiness");

        let res = app
            .post_form_with_token(&routes::breed_delete(id), &[], &token)
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(routes::BREEDS));

        assert_eq!(app.get_without_token(&routes::breed(id)).await.status, 404);
    }

    #[tokio::test]
    async fn breed_with_dogs_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let id = app.create_breed(&token, "Pekiness", "S").await;
        app.create_dog(&token, "Brovko", id, "2023-06-20").await;

        let res = app
            .post_form_with_token(&routes::breed_delete(id), &[], &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        let detail = app.get_without_token(&routes::breed(id)).await;
        assert_eq!(detail.status, 200);
        assert_eq!(detail.body["dogs"].as_array().unwrap().len(), 1);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn search_is_a_case_insensitive_substring_match() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        for name in ["Pekiness", "Akita", "Spekled Hound", "Beagle"] {
            app.create_breed(&token, name, "M").await;
        }

        let res = app.get_without_token("/breeds/?name=PEK").await;

        assert_eq!(res.status, 200);
        let names: Vec<_> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Pekiness", "Spekled Hound"]);
    }

    #[tokio::test]
    async fn wildcards_in_the_search_match_literally() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        app.create_breed(&token, "Pekiness", "M").await;
        app.create_breed(&token, "100% Terrier", "M").await;

        let res = app.get_without_token("/breeds/?name=%25").await;

        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["data"][0]["name"], "100% Terrier");
    }

    #[tokio::test]
    async fn search_folds_case_of_non_ascii_letters() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        for name in ["Ñandú Terrier", "Épagneul Breton", "Akita"] {
            app.create_breed(&token, name, "M").await;
        }

        // Ñand, ñAND, épag
        for (query, expected) in [
            ("%C3%91and", "Ñandú Terrier"),
            ("%C3%B1AND", "Ñandú Terrier"),
            ("%C3%A9pag", "Épagneul Breton"),
        ] {
            let res = app.get_without_token(&format!("/breeds/?name={query}")).await;
            assert_eq!(res.status, 200);
            let data = res.body["data"].as_array().unwrap();
            assert_eq!(data.len(), 1, "name={query}");
            assert_eq!(data[0]["name"], expected);
        }
    }

    #[tokio::test]
    async fn glob_characters_in_the_search_match_literally() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        app.create_breed(&token, "Mix [Rare]", "M").await;
        app.create_breed(&token, "Akita", "M").await;

        let bracket = app.get_without_token("/breeds/?name=%5B").await;
        assert_eq!(bracket.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(bracket.body["data"][0]["name"], "Mix [Rare]");

        let star = app.get_without_token("/breeds/?name=*").await;
        assert_eq!(star.body["data"], serde_json::json!([]));

        let question = app.get_without_token("/breeds/?name=%3F").await;
        assert_eq!(question.body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn blank_search_returns_everything() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        app.create_breed(&token, "Pekiness", "M").await;
        app.create_breed(&token, "Akita", "M").await;

        let res = app.get_without_token("/breeds/?name=%20%20").await;

        assert_eq!(res.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn seventeen_breeds_split_into_fifteen_and_two() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        for i in 0..17 {
            app.create_breed(&token, &format!("Breed {i:02}"), "M").await;
        }

        let first = app.get_without_token(routes::BREEDS).await;
        assert_eq!(first.body["data"].as_array().unwrap().len(), 15);
        assert_eq!(first.body["is_paginated"], true);
        assert_eq!(first.body["pagination"]["total_pages"], 2);
        assert_eq!(first.body["data"][0]["name"], "Breed 00");

        let second = app.get_without_token("/breeds/?page=2").await;
        assert_eq!(second.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(second.body["data"][1]["name"], "Breed 16");

        let past_end = app.get_without_token("/breeds/?page=5").await;
        assert_eq!(past_end.status, 200);
        assert_eq!(past_end.body["data"], json!([]));
    }

    #[tokio::test]
    async fn short_list_is_not_paginated() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        app.create_breed(&token, "Pekiness", "M").await;

        let res = app.get_without_token("/breeds/?page=0").await;

        assert_eq!(res.body["is_paginated"], false);
        assert_eq!(res.body["pagination"]["page"], 1);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rows_carry_their_dog_count() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice").await;
        let pekiness = app.create_breed(&token, "Pekiness", "S").await;
        app.create_breed(&token, "Akita", "L").await;
        app.create_dog(&token, "Brovko", pekiness, "2023-06-20").await;
        app.create_dog(&token, "Sharik", pekiness, "2023-06-21").await;

        let res = app.get_without_token(routes::BREEDS).await;

        assert_eq!(res.body["data"][0]["name"], "Akita");
        assert_eq!(res.body["data"][0]["num_dogs"], 0);
        assert_eq!(res.body["data"][1]["num_dogs"], 2);
    }

    #[tokio::test]
    async fn malformed_page_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token("/breeds/?page=abc").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
