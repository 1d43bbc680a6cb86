use googletest::{
    assert_that,
    prelude::{eq, none},
};
use http::StatusCode;
use serde_json::json;
use unfurl::ExpandConfig;
use unfurl_operation::{OperationConfig, Show};

use crate::fixtures::{BrokenFinder, User, article_decorator, article_policy, articles};

#[test]
fn the_model_is_rendered_with_the_requested_expansions() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let outcome = show.call(&1, &User { id: 1 }, Some(&json!(["user", "user.role"])));
    assert_that!(outcome.status(), eq(StatusCode::OK));
    assert_eq!(
        outcome.resource(),
        Some(&json!({
            "title": "My Beautiful Article",
            "user": {
                "full_name": "John Doe",
                "role": { "name": "Editor" }
            }
        }))
    );
}

#[test]
fn missing_models_are_not_found() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let outcome = show.call(&2, &User { id: 1 }, None);
    assert_that!(outcome.status(), eq(StatusCode::NOT_FOUND));
    insta::assert_snapshot!(outcome.resource().unwrap(), @r#"{"error_type":"not_found","error_message":"The requested resource could not be found","meta":{}}"#);
}

#[test]
fn unauthorized_users_are_forbidden() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let outcome = show.call(&1, &User { id: 2 }, None);
    assert_that!(outcome.status(), eq(StatusCode::FORBIDDEN));
    assert!(!outcome.is_success());
}

#[test]
fn a_plain_string_expand_is_unprocessable() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let outcome = show.call(&1, &User { id: 1 }, Some(&json!("foo")));
    assert_that!(outcome.status(), eq(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(
        outcome.resource().unwrap()["error_type"],
        json!("unprocessable_entity")
    );
}

#[test]
fn unknown_associations_are_bad_requests() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let outcome = show.call(&1, &User { id: 1 }, Some(&json!(["foo"])));
    assert_that!(outcome.status(), eq(StatusCode::BAD_REQUEST));
    insta::assert_snapshot!(outcome.resource().unwrap()["error_message"], @r#""`foo` is not an association that can be expanded""#);
}

#[test]
fn children_without_parents_are_bad_requests() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let outcome = show.call(&1, &User { id: 1 }, Some(&json!(["user.role"])));
    assert_that!(outcome.status(), eq(StatusCode::BAD_REQUEST));
    assert_eq!(
        outcome.resource().unwrap()["meta"]["errors"][0]["kind"],
        json!("orphaned_child")
    );
}

#[test]
fn the_expand_limit_comes_from_the_configuration() {
    let config = OperationConfig::new().set_expand(ExpandConfig::new().set_max_path_count(Some(1)));
    let show = Show::new(articles(), article_policy, article_decorator()).config(config);

    let outcome = show.call(&1, &User { id: 1 }, Some(&json!(["user", "user.role"])));
    assert_that!(outcome.status(), eq(StatusCode::UNPROCESSABLE_ENTITY));
}

#[test]
fn storage_failures_are_opaque() {
    let show = Show::new(BrokenFinder, article_policy, article_decorator());

    let outcome = show.call(&1, &User { id: 1 }, None);
    assert_that!(outcome.status(), eq(StatusCode::INTERNAL_SERVER_ERROR));
    insta::assert_snapshot!(outcome.resource().unwrap()["error_message"], @r#""There was an error processing your request""#);
}

#[test]
fn outcomes_convert_into_responses() {
    let show = Show::new(articles(), article_policy, article_decorator());

    let response = show.call(&1, &User { id: 1 }, None).into_response();
    assert_that!(response.status(), eq(StatusCode::OK));
    insta::assert_snapshot!(response.body(), @r#"{"title":"My Beautiful Article"}"#);

    let outcome = show.call(&1, &User { id: 1 }, Some(&json!([])));
    assert_that!(outcome.resource().and_then(|r| r.get("user")), none());
}
