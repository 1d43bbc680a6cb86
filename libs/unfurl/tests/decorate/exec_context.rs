//! Getters that run on the decorator rather than on the decorated object.
use serde_json::{Value, json};
use unfurl::{
    Associated, Decorator, ExecContext, ExpandConfig, PropertyError, ReflectionOptions, decorate,
};

use crate::fixtures::{article, blog};

#[test]
fn computed_properties_are_always_rendered() {
    let user = Decorator::builder("User")
        .property("full_name")
        .computed_property("initials", |user| {
            let full_name = user.attribute("full_name")?;
            let initials: String = full_name
                .as_str()
                .unwrap_or_default()
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .collect();
            Ok(Value::String(initials))
        })
        .build()
        .unwrap();

    let output = decorate(
        &json!({ "full_name": "John Doe" }),
        &user,
        None,
        &ExpandConfig::default(),
    )
    .unwrap();
    assert_eq!(
        Value::Object(output),
        json!({ "full_name": "John Doe", "initials": "JD" })
    );
}

#[test]
fn computed_associations_are_expanded_like_any_other() {
    let blog = blog();
    let article_decorator = Decorator::builder("Article")
        .property("title")
        .computed_association("latest_comment", |article| {
            let comments = article.attribute("comments")?;
            Ok(match comments.as_array().and_then(|c| c.last()) {
                Some(comment) => Associated::owned(comment.clone()),
                None => Associated::Nil,
            })
        })
        .has_one(
            "latest_comment",
            ReflectionOptions::new()
                .decorator(blog.comment.clone())
                .exec_context(ExecContext::Decorator),
        )
        .build()
        .unwrap();

    let raw = json!(["latest_comment", "latest_comment.author"]);
    let output = decorate(
        &article(),
        &article_decorator,
        Some(&raw),
        &ExpandConfig::default(),
    )
    .unwrap();
    // Getters below the association run on each item, not on the article decorator.
    assert_eq!(
        Value::Object(output),
        json!({
            "title": "My Beautiful Article",
            "latest_comment": {
                "body": "Thanks!",
                "author": { "full_name": "John Doe" }
            }
        })
    );

    let output = decorate(
        &json!({ "title": "Empty", "comments": [] }),
        &article_decorator,
        Some(&raw),
        &ExpandConfig::default(),
    )
    .unwrap();
    assert_eq!(
        Value::Object(output),
        json!({ "title": "Empty", "latest_comment": null })
    );
}

#[test]
fn exec_context_can_be_configured_by_name() {
    let reviewer = Decorator::builder("Article")
        .computed_association("reviewer", |_| {
            Ok(Associated::owned(json!({ "full_name": "Ann Other" })))
        })
        .has_one(
            "reviewer",
            ReflectionOptions::new()
                .undecorated()
                .exec_context_named("decorator_instance"),
        )
        .build()
        .unwrap();

    let output = decorate(
        &json!({}),
        &reviewer,
        Some(&json!(["reviewer"])),
        &ExpandConfig::default(),
    )
    .unwrap();
    assert_eq!(
        Value::Object(output),
        json!({ "reviewer": { "full_name": "Ann Other" } })
    );
}

#[test]
fn associations_on_the_decorator_are_checked_when_declared() {
    let err = Decorator::builder("Article")
        .has_one(
            "reviewer",
            ReflectionOptions::new()
                .undecorated()
                .exec_context(ExecContext::Decorator),
        )
        .build()
        .unwrap_err();
    insta::assert_snapshot!(err, @"The `reviewer` association runs on the `Article` decorator, but there is no `computed_association` getter for it");
}

#[test]
fn failing_computed_getters_are_property_errors() {
    let decorator = Decorator::builder("Article")
        .computed_association("reviewer", |article| {
            article.attribute("reviewer_id")?;
            Ok(Associated::Nil)
        })
        .has_one(
            "reviewer",
            ReflectionOptions::new()
                .undecorated()
                .exec_context(ExecContext::Decorator),
        )
        .build()
        .unwrap();

    let err = decorate(
        &json!({ "reviewer": null }),
        &decorator,
        Some(&json!(["reviewer"])),
        &ExpandConfig::default(),
    )
    .unwrap_err();
    let unfurl::DecorateError::Property(PropertyError::Missing { property, .. }) = &err else {
        panic!("Expected a missing property, got {err:?}");
    };
    assert_eq!(property, "reviewer_id");
}

#[test]
fn decorators_can_be_picked_item_by_item() {
    let blog = blog();
    let image = Decorator::builder("Image").property("url").build().unwrap();
    let (role, user) = (blog.role.clone(), blog.user.clone());
    let feed = Decorator::builder("Feed")
        .has_many(
            "entries",
            ReflectionOptions::new().decorate_with(move |entry| {
                match entry.attribute("type").ok()?.as_str()? {
                    "image" => Some(image.clone()),
                    "user" => Some(user.clone()),
                    "role" => Some(role.clone()),
                    _ => None,
                }
            }),
        )
        .build()
        .unwrap();
    let model = json!({
        "entries": [
            { "type": "image", "url": "https://example.com/cat.png", "size": 1024 },
            { "type": "user", "full_name": "John Doe", "role": { "name": "Editor" } },
            { "type": "note", "text": "Raw" }
        ]
    });

    let output = decorate(
        &model,
        &feed,
        Some(&json!(["entries"])),
        &ExpandConfig::default(),
    )
    .unwrap();
    assert_eq!(
        Value::Object(output),
        json!({
            "entries": [
                { "url": "https://example.com/cat.png" },
                { "full_name": "John Doe" },
                { "type": "note", "text": "Raw" }
            ]
        })
    );
}
