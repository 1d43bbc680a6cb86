use std::collections::HashMap;

use googletest::{assert_that, prelude::eq};
use http::StatusCode;
use unfurl_operation::Destroy;

use crate::fixtures::{Comment, User, comment_policy};

fn comments(comment: Comment) -> HashMap<u64, Comment> {
    HashMap::from([(1, comment)])
}

#[test]
fn authorized_users_can_destroy_their_comments() {
    let comment = Comment::by(1);
    let destroy = Destroy::new(comments(comment.clone()), comment_policy);

    let outcome = destroy.call(&1, &User { id: 1 });
    assert_that!(outcome.status(), eq(StatusCode::NO_CONTENT));
    assert!(outcome.resource().is_none());
    assert!(comment.is_destroyed());
}

#[test]
fn missing_comments_are_not_found() {
    let destroy = Destroy::new(comments(Comment::by(1)), comment_policy);

    let outcome = destroy.call(&2, &User { id: 1 });
    assert_that!(outcome.status(), eq(StatusCode::NOT_FOUND));
}

#[test]
fn other_users_are_forbidden() {
    let comment = Comment::by(1);
    let destroy = Destroy::new(comments(comment.clone()), comment_policy);

    let outcome = destroy.call(&1, &User { id: 2 });
    assert_that!(outcome.status(), eq(StatusCode::FORBIDDEN));
    assert!(!comment.is_destroyed());
}

#[test]
fn rejections_are_unprocessable() {
    let comment = Comment {
        pinned: true,
        ..Comment::by(1)
    };
    let destroy = Destroy::new(comments(comment.clone()), comment_policy);

    let outcome = destroy.call(&1, &User { id: 1 });
    assert_that!(outcome.status(), eq(StatusCode::UNPROCESSABLE_ENTITY));
    assert!(!comment.is_destroyed());
    insta::assert_snapshot!(serde_json::to_string_pretty(outcome.resource().unwrap()).unwrap(), @r#"
    {
      "error_type": "unprocessable_entity",
      "error_message": "The resource could not be destroyed",
      "meta": {
        "errors": {
          "pinned": [
            "pinned comments can't be destroyed"
          ]
        }
      }
    }
    "#);
}

#[test]
fn storage_failures_are_internal_errors() {
    let comment = Comment {
        storage_is_down: true,
        ..Comment::by(1)
    };
    let destroy = Destroy::new(comments(comment), comment_policy);

    let outcome = destroy.call(&1, &User { id: 1 });
    assert_that!(outcome.status(), eq(StatusCode::INTERNAL_SERVER_ERROR));
}
