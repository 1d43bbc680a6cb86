use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// The action a user wants to perform on a model.
pub enum Action {
    Show,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Show => "show",
            Action::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `User` can perform an [`Action`] on `Model`.
///
/// It's implemented for closures with the matching signature:
///
/// ```rust
/// use unfurl_operation::{Action, Policy};
///
/// struct User { id: u64 }
/// struct Article { author_id: u64 }
///
/// let policy = |user: &User, article: &Article, action: Action| match action {
///     Action::Show => true,
///     _ => user.id == article.author_id,
/// };
/// let (user, article) = (User { id: 1 }, Article { author_id: 2 });
/// assert!(policy.authorize(&user, &article, Action::Show));
/// assert!(!policy.authorize(&user, &article, Action::Destroy));
/// ```
pub trait Policy<User: ?Sized, Model: ?Sized> {
    fn authorize(&self, user: &User, model: &Model, action: Action) -> bool;
}

impl<User, Model, F> Policy<User, Model> for F
where
    User: ?Sized,
    Model: ?Sized,
    F: Fn(&User, &Model, Action) -> bool,
{
    fn authorize(&self, user: &User, model: &Model, action: Action) -> bool {
        self(user, model, action)
    }
}
