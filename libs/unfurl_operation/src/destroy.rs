use http::StatusCode;
use serde_json::{Value, json};
use tracing::Level;
use tracing_log_error::log_error;

use crate::finder::Finder;
use crate::outcome::Outcome;
use crate::policy::{Action, Policy};

/// A model that can be destroyed.
pub trait Destroyable {
    fn destroy(&mut self) -> Result<(), DestroyError>;
}

/// The error returned by [`Destroyable::destroy`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DestroyError {
    /// The model refused to be destroyed, e.g. because other records depend on it.
    ///
    /// `errors` is sent back to the client.
    #[error("The resource refused to be destroyed")]
    Rejected { errors: Value },
    #[error("Failed to destroy the resource")]
    Failed(#[source] anyhow::Error),
}

impl DestroyError {
    pub fn rejected(errors: Value) -> Self {
        Self::Rejected { errors }
    }

    pub fn failed<E>(source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Failed(source.into())
    }
}

/// Find a model, authorize the caller and destroy the model.
///
/// The possible outcomes are:
///
/// - `404 Not Found`, if the model doesn't exist;
/// - `403 Forbidden`, if the policy denies [`Action::Destroy`];
/// - `422 Unprocessable Entity`, if the model refused to be destroyed;
/// - `500 Internal Server Error`, if loading or destroying the model failed;
/// - `204 No Content` otherwise.
pub struct Destroy<F, P> {
    finder: F,
    policy: P,
}

impl<F, P> Destroy<F, P>
where
    F: Finder,
    F::Model: Destroyable,
{
    pub fn new(finder: F, policy: P) -> Self {
        Self { finder, policy }
    }

    /// Destroy the model identified by `id` on behalf of `user`.
    pub fn call<U>(&self, id: &F::Id, user: &U) -> Outcome
    where
        U: ?Sized,
        P: Policy<U, F::Model>,
    {
        let span = tracing::info_span!(
            "Destroy resource",
            http.response.status_code = tracing::field::Empty,
        );
        let _guard = span.enter();
        let outcome = self.run(id, user);
        span.record("http.response.status_code", outcome.status().as_u16());
        outcome
    }

    fn run<U>(&self, id: &F::Id, user: &U) -> Outcome
    where
        U: ?Sized,
        P: Policy<U, F::Model>,
    {
        let mut model = match self.finder.find(id) {
            Ok(Some(model)) => model,
            Ok(None) => return Outcome::not_found(),
            Err(e) => {
                log_error!(*e, "Failed to load the resource");
                return Outcome::internal_server_error();
            }
        };
        if !self.policy.authorize(user, &model, Action::Destroy) {
            tracing::debug!(action = %Action::Destroy, "The policy denied access to the resource");
            return Outcome::forbidden();
        }
        match model.destroy() {
            Ok(()) => Outcome::no_content(),
            Err(e) => match e {
                DestroyError::Rejected { ref errors } => {
                    log_error!(e, level: Level::WARN, "The resource refused to be destroyed");
                    Outcome::error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "unprocessable_entity",
                        "The resource could not be destroyed",
                        json!({ "errors": errors }),
                    )
                }
                DestroyError::Failed(_) => {
                    log_error!(e, "Failed to destroy the resource");
                    Outcome::internal_server_error()
                }
            },
        }
    }
}
