use std::sync::Arc;

use serde_json::Value;
use tracing::Level;
use tracing_log_error::log_error;
use unfurl::{DecorateError, Decorator, Resource, decorate};

use crate::config::OperationConfig;
use crate::finder::Finder;
use crate::outcome::Outcome;
use crate::policy::{Action, Policy};

/// Find a model, authorize the caller and render the model with a [`Decorator`].
///
/// The possible outcomes are:
///
/// - `404 Not Found`, if the model doesn't exist;
/// - `403 Forbidden`, if the policy denies [`Action::Show`];
/// - `422 Unprocessable Entity`, if the `expand` parameter is malformed;
/// - `400 Bad Request`, if some of the requested associations can't be expanded;
/// - `500 Internal Server Error`, if loading or rendering the model failed;
/// - `200 OK`, with the rendered model, otherwise.
pub struct Show<F, P> {
    finder: F,
    policy: P,
    decorator: Arc<Decorator>,
    config: OperationConfig,
}

impl<F, P> Show<F, P>
where
    F: Finder,
    F::Model: Resource,
{
    pub fn new(finder: F, policy: P, decorator: Arc<Decorator>) -> Self {
        Self {
            finder,
            policy,
            decorator,
            config: OperationConfig::default(),
        }
    }

    pub fn config(mut self, config: OperationConfig) -> Self {
        self.config = config;
        self
    }

    /// Show the model identified by `id` to `user`.
    ///
    /// `raw_expand` is the `expand` parameter, as sent by the client.
    pub fn call<U>(&self, id: &F::Id, user: &U, raw_expand: Option<&Value>) -> Outcome
    where
        U: ?Sized,
        P: Policy<U, F::Model>,
    {
        let span = tracing::info_span!(
            "Show resource",
            decorator.name = %self.decorator.name(),
            http.response.status_code = tracing::field::Empty,
        );
        let _guard = span.enter();
        let outcome = self.run(id, user, raw_expand);
        span.record("http.response.status_code", outcome.status().as_u16());
        outcome
    }

    fn run<U>(&self, id: &F::Id, user: &U, raw_expand: Option<&Value>) -> Outcome
    where
        U: ?Sized,
        P: Policy<U, F::Model>,
    {
        let model = match self.finder.find(id) {
            Ok(Some(model)) => model,
            Ok(None) => return Outcome::not_found(),
            Err(e) => {
                log_error!(*e, "Failed to load the resource");
                return Outcome::internal_server_error();
            }
        };
        if !self.policy.authorize(user, &model, Action::Show) {
            tracing::debug!(action = %Action::Show, "The policy denied access to the resource");
            return Outcome::forbidden();
        }
        match decorate(&model, &self.decorator, raw_expand, &self.config.expand) {
            Ok(output) => Outcome::ok(Value::Object(output)),
            Err(e) => decorate_failure(e),
        }
    }
}

fn decorate_failure(e: DecorateError) -> Outcome {
    match &e {
        DecorateError::Property(source) => {
            log_error!(source, "Failed to render the resource");
            Outcome::internal_server_error()
        }
        _ => {
            log_error!(e, level: Level::WARN, "The requested expansion is invalid");
            Outcome::with_status(e.status_code(), Some(e.to_body()))
        }
    }
}
