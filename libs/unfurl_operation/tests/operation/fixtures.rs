use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use unfurl::{Decorator, ReflectionOptions};
use unfurl_operation::{Action, DestroyError, Destroyable, Finder};

pub struct User {
    pub id: u64,
}

/// Only the author of an article can see it. Nobody can destroy it.
pub fn article_policy(user: &User, article: &Value, action: Action) -> bool {
    match action {
        Action::Show => article["user_id"] == user.id,
        _ => false,
    }
}

pub fn articles() -> HashMap<u64, Value> {
    let article = json!({
        "id": 1,
        "user_id": 1,
        "title": "My Beautiful Article",
        "user": {
            "id": 1,
            "full_name": "John Doe",
            "role": { "name": "Editor" }
        }
    });
    HashMap::from([(1, article)])
}

pub fn article_decorator() -> Arc<Decorator> {
    let role = Decorator::builder("Role").property("name").build().unwrap();
    let user = Decorator::builder("User")
        .property("full_name")
        .belongs_to("role", ReflectionOptions::new().decorator(role))
        .build()
        .unwrap();
    Decorator::builder("Article")
        .property("title")
        .belongs_to("user", ReflectionOptions::new().decorator(user))
        .build()
        .unwrap()
}

/// A finder whose storage is always unavailable.
pub struct BrokenFinder;

impl Finder for BrokenFinder {
    type Id = u64;
    type Model = Value;

    fn find(&self, _id: &u64) -> Result<Option<Value>, anyhow::Error> {
        Err(anyhow::anyhow!("Connection refused"))
    }
}

#[derive(Clone)]
pub struct Comment {
    pub user_id: u64,
    pub pinned: bool,
    pub storage_is_down: bool,
    pub destroyed: Arc<AtomicBool>,
}

impl Comment {
    pub fn by(user_id: u64) -> Self {
        Self {
            user_id,
            pinned: false,
            storage_is_down: false,
            destroyed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl Destroyable for Comment {
    fn destroy(&mut self) -> Result<(), DestroyError> {
        if self.storage_is_down {
            return Err(DestroyError::failed(anyhow::anyhow!("Connection refused")));
        }
        if self.pinned {
            return Err(DestroyError::rejected(
                json!({ "pinned": ["pinned comments can't be destroyed"] }),
            ));
        }
        self.destroyed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub fn comment_policy(user: &User, comment: &Comment, action: Action) -> bool {
    action == Action::Destroy && comment.user_id == user.id
}
