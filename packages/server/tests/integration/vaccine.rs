use crate::common::{TestApp, routes};

#[tokio::test]
async fn list_is_public_unpaginated_and_ordered_by_name() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    for i in (0..20).rev() {
        app.create_vaccine(&token, &format!("Vaccine {i:02}")).await;
    }

    let res = app.get_without_token(routes::VACCINES).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["is_paginated"], false);
    assert!(res.body.get("pagination").is_none());
    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 20);
    assert_eq!(data[0]["name"], "Vaccine 00");
    assert_eq!(data[19]["name"], "Vaccine 19");
}

#[tokio::test]
async fn anonymous_create_redirects_to_login() {
    let app = TestApp::spawn().await;

    let res = app
        .post_form_without_token(routes::VACCINE_CREATE, &[("name", "Flue")])
        .await;

    assert_eq!(res.status, 302);
    assert_eq!(
        res.location.as_deref(),
        Some("/accounts/login/?next=/vaccines/create/")
    );
}

#[tokio::test]
async fn create_and_update_redirect_to_the_list() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    let id = app.create_vaccine(&token, "Flue").await;

    let form = app.get_with_token(&routes::vaccine_update(id), &token).await;
    assert_eq!(form.status, 200);
    assert_eq!(form.body["vaccine"]["name"], "Flue");

    let res = app
        .post_form_with_token(&routes::vaccine_update(id), &[("name", "Flu")], &token)
        .await;
    assert_eq!(res.status, 303);
    assert_eq!(res.location.as_deref(), Some(routes::VACCINES));

    let list = app.get_without_token(routes::VACCINES).await;
    assert_eq!(list.body["data"][0]["name"], "Flu");
}

#[tokio::test]
async fn name_is_required_and_bounded() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_form_with_token(routes::VACCINE_CREATE, &[("name", "  ")], &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.field_errors("name"), ["This field is required."]);

    let long = "x".repeat(256);
    let res = app
        .post_form_with_token(routes::VACCINE_CREATE, &[("name", &long)], &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(
        res.field_errors("name"),
        ["Ensure this value has at most 255 characters (it has 256)."]
    );
}

#[tokio::test]
async fn delete_removes_the_vaccinations_that_used_it() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    let breed = app.create_breed(&token, "Pekiness", "S").await;
    let dog = app.create_dog(&token, "Brovko", breed, "2023-06-20").await;
    let flue = app.create_vaccine(&token, "Flue").await;
    app.create_vaccination(&token, dog, flue, "2023-06-21").await;

    let confirm = app.get_with_token(&routes::vaccine_delete(flue), &token).await;
    assert_eq!(confirm.body["name"], "Flue");

    let res = app
        .post_form_with_token(&routes::vaccine_delete(flue), &[], &token)
        .await;
    assert_eq!(res.status, 303);
    assert_eq!(res.location.as_deref(), Some(routes::VACCINES));

    let detail = app.get_without_token(&routes::dog(dog)).await;
    assert_eq!(detail.body["vaccinations"], serde_json::json!([]));
}

#[tokio::test]
async fn deleting_an_unknown_vaccine_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_form_with_token(&routes::vaccine_delete(5), &[], &token)
        .await;

    assert_eq!(res.status, 404);
}
