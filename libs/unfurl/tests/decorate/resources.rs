//! Domain objects that are not JSON documents.
use serde_json::{Value, json};
use unfurl::{
    Associated, DecorateError, Decorator, ExpandConfig, PropertyError, ReflectionOptions,
    Resource, decorate,
};

#[derive(serde::Serialize)]
struct Tag {
    label: String,
}

struct Post {
    title: String,
    views: u64,
    author: Option<Author>,
    tags: Vec<Tag>,
}

struct Author {
    name: String,
}

impl Resource for Post {
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        match name {
            "title" => Ok(self.title.clone().into()),
            "views" => Ok(self.views.into()),
            "rating" => Err(PropertyError::getter(
                name,
                anyhow::anyhow!("The ratings service is unavailable"),
            )),
            _ => Err(PropertyError::missing(name, "a post")),
        }
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        match name {
            "author" => Ok(Associated::from_option(self.author.as_ref())),
            "tags" => Ok(Associated::many(&self.tags)),
            _ => Err(PropertyError::missing(name, "a post")),
        }
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        Ok(json!({ "title": self.title, "views": self.views }))
    }
}

impl Resource for Author {
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        match name {
            "name" => Ok(self.name.clone().into()),
            _ => Err(PropertyError::missing(name, "an author")),
        }
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        Err(PropertyError::missing(name, "an author"))
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        Ok(json!({ "name": self.name }))
    }
}

impl Resource for Tag {
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        match name {
            "label" => Ok(self.label.clone().into()),
            _ => Err(PropertyError::missing(name, "a tag")),
        }
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        Err(PropertyError::missing(name, "a tag"))
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        serde_json::to_value(self).map_err(|e| PropertyError::getter("tag", e))
    }
}

fn post() -> Post {
    Post {
        title: "Hello".into(),
        views: 42,
        author: Some(Author {
            name: "Jane".into(),
        }),
        tags: vec![
            Tag {
                label: "rust".into(),
            },
            Tag {
                label: "serde".into(),
            },
        ],
    }
}

fn post_decorator() -> std::sync::Arc<Decorator> {
    let author = Decorator::builder("Author").property("name").build().unwrap();
    Decorator::builder("Post")
        .property("title")
        .property("views")
        .belongs_to("author", ReflectionOptions::new().decorator(author))
        .has_many("tags", ReflectionOptions::new().undecorated())
        .build()
        .unwrap()
}

#[test]
fn typed_objects_can_be_decorated() {
    let output = decorate(
        &post(),
        &post_decorator(),
        Some(&json!(["tags", "author"])),
        &ExpandConfig::default(),
    )
    .unwrap();
    assert_eq!(
        Value::Object(output),
        json!({
            "title": "Hello",
            "views": 42,
            "author": { "name": "Jane" },
            "tags": [{ "label": "rust" }, { "label": "serde" }]
        })
    );
}

#[test]
fn absent_typed_associations_are_nil() {
    let mut post = post();
    post.author = None;

    let output = decorate(
        &post,
        &post_decorator(),
        Some(&json!(["author"])),
        &ExpandConfig::default(),
    )
    .unwrap();
    assert_eq!(
        Value::Object(output),
        json!({ "title": "Hello", "views": 42, "author": null })
    );
}

#[test]
fn getter_failures_are_propagated() {
    let decorator = Decorator::builder("Post")
        .property("title")
        .property("rating")
        .build()
        .unwrap();

    let err = decorate(&post(), &decorator, None, &ExpandConfig::default()).unwrap_err();
    assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    let DecorateError::Property(e) = &err else {
        panic!("Expected a property error, got {err:?}");
    };
    insta::assert_snapshot!(e, @"Failed to read `rating`");
    let source = std::error::Error::source(e).unwrap();
    insta::assert_snapshot!(source, @"The ratings service is unavailable");
}

#[test]
fn property_errors_win_over_expansion_errors() {
    let decorator = Decorator::builder("Post")
        .property("rating")
        .build()
        .unwrap();

    let err = decorate(
        &post(),
        &decorator,
        Some(&json!(["foo"])),
        &ExpandConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DecorateError::Property(_)));
}
