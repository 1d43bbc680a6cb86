use std::sync::Arc;

use serde_json::{Value, json};
use unfurl::{Decorator, ReflectionOptions};

/// The decorators for a small blog: articles, their author, their comments.
pub struct Blog {
    pub role: Arc<Decorator>,
    pub user: Arc<Decorator>,
    pub comment: Arc<Decorator>,
    pub article: Arc<Decorator>,
}

pub fn blog() -> Blog {
    let role = Decorator::builder("Role").property("name").build().unwrap();
    let user = Decorator::builder("User")
        .property("full_name")
        .belongs_to("role", ReflectionOptions::new().decorator(role.clone()))
        .build()
        .unwrap();
    let comment = Decorator::builder("Comment")
        .property("body")
        .belongs_to("author", ReflectionOptions::new().decorator(user.clone()))
        .build()
        .unwrap();
    let article = Decorator::builder("Article")
        .property("title")
        .belongs_to("user", ReflectionOptions::new().decorator(user.clone()))
        .has_many("comments", ReflectionOptions::new().decorator(comment.clone()))
        .build()
        .unwrap();
    Blog {
        role,
        user,
        comment,
        article,
    }
}

pub fn john() -> Value {
    json!({
        "id": 1,
        "full_name": "John Doe",
        "role": { "id": 7, "name": "Editor" }
    })
}

pub fn jane() -> Value {
    json!({
        "id": 2,
        "full_name": "Jane Roe",
        "role": null
    })
}

pub fn article() -> Value {
    json!({
        "id": 1,
        "title": "My Beautiful Article",
        "user": john(),
        "comments": [
            { "id": 10, "body": "Great read!", "author": jane() },
            { "id": 11, "body": "Thanks!", "author": john() }
        ]
    })
}
