//! Splitting a stream of requests into a value channel and an error
//! channel.
//!
//! Each inner stream of the higher-order input stands for one operation
//! (typically one request). [`drop_errors`] follows only the newest
//! operation and hides its failure; [`extract_errors`] reports the failure
//! of every operation, superseded ones included, so a UI can surface it
//! without losing it to a later switch.

use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use crate::error::ResponseError;

use super::flatten::{merge_all, switch_latest};
use super::notification::{first_error, until_error};

// ==============================================================================
// Extracted Error
// ==============================================================================

/// A source failure normalized for display.
///
/// Preference order: the response body's `message` field, the response
/// body itself, the raw response text, then the original error.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedError<E> {
    Message(String),
    Body(Value),
    Text(String),
    Raw(E),
}

impl<E: ResponseError> ExtractedError<E> {
    pub fn from_error(err: E) -> Self {
        let extracted = err.response().and_then(|response| {
            let body = response.body.as_ref().filter(|body| is_truthy(body));
            if let Some(message) = body
                .and_then(|body| body.get("message"))
                .filter(|message| is_truthy(message))
            {
                return Some(match message {
                    Value::String(message) => Self::Message(message.clone()),
                    other => Self::Message(other.to_string()),
                });
            }
            if let Some(body) = body {
                return Some(Self::Body(body.clone()));
            }
            response
                .text
                .as_ref()
                .filter(|text| !text.is_empty())
                .map(|text| Self::Text(text.clone()))
        });

        match extracted {
            Some(extracted) => extracted,
            None => Self::Raw(err),
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for ExtractedError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Body(Value::String(body)) => f.write_str(body),
            Self::Body(body) => write!(f, "{body}"),
            Self::Text(text) => f.write_str(text),
            Self::Raw(err) => write!(f, "{err}"),
        }
    }
}

/// Missing-ness as a JSON client sees it: `null`, `false`, `0` and `""`
/// carry no information.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ==============================================================================
// Splitter
// ==============================================================================

/// Values of the most recent inner stream, errors absorbed.
///
/// A newly arrived inner stream replaces the current one. An inner error
/// ends that inner stream quietly; the output keeps waiting for the next
/// one and never fails itself.
pub fn drop_errors<O, S, T, E>(outer: O) -> impl Stream<Item = T>
where
    O: Stream<Item = S>,
    S: Stream<Item = Result<T, E>>,
{
    switch_latest(outer.map(until_error::<S, T, E>))
}

/// One [`ExtractedError`] per failed inner stream, values discarded.
///
/// Every inner stream is followed until it finishes on its own; none is
/// cancelled when a newer one arrives.
pub fn extract_errors<O, S, T, E>(outer: O) -> impl Stream<Item = ExtractedError<E>>
where
    O: Stream<Item = S>,
    S: Stream<Item = Result<T, E>>,
    E: ResponseError,
{
    merge_all(outer.map(first_error::<S, T, E>)).map(|err| {
        tracing::trace!("inner stream error extracted");
        ExtractedError::from_error(err)
    })
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;
    use futures::{stream, StreamExt};
    use serde_json::json;

    use super::*;
    use crate::error::{ErrorResponse, SourceError};
    use crate::test_util::*;

    // -- normalization tests --------------------------------------------------

    #[test]
    fn body_message_wins() {
        let err = response_error(Some(json!({ "message": "X", "code": 4 })), Some("raw"));
        assert_eq!(
            ExtractedError::from_error(err),
            ExtractedError::Message("X".into())
        );
    }

    #[test]
    fn body_without_message_is_used_whole() {
        let err = response_error(Some(json!("Y")), Some("raw"));
        let extracted = ExtractedError::from_error(err);
        assert_eq!(extracted, ExtractedError::Body(json!("Y")));
        assert_eq!(extracted.to_string(), "Y");

        let err = response_error(Some(json!({ "error": "bad txid" })), None);
        assert_eq!(
            ExtractedError::from_error(err),
            ExtractedError::Body(json!({ "error": "bad txid" }))
        );
    }

    #[test]
    fn text_is_used_when_there_is_no_body() {
        let err = response_error(None, Some("Z"));
        assert_eq!(
            ExtractedError::from_error(err),
            ExtractedError::Text("Z".into())
        );
    }

    #[test]
    fn empty_fields_fall_through() {
        let err = response_error(Some(json!({ "message": "" })), None);
        assert_eq!(
            ExtractedError::from_error(err),
            ExtractedError::Body(json!({ "message": "" }))
        );

        let err = response_error(Some(json!(null)), Some(""));
        assert_eq!(ExtractedError::from_error(err.clone()), ExtractedError::Raw(err));
    }

    #[test]
    fn errors_without_response_are_kept_raw() {
        let err = transport_error("connection refused");
        let extracted = ExtractedError::from_error(err.clone());
        assert_eq!(extracted, ExtractedError::Raw(err));
        assert_eq!(extracted.to_string(), "transport failure: connection refused");
    }

    #[test]
    fn bare_response_normalizes_through_its_body() {
        let response = ErrorResponse {
            status: 400,
            body: Some(json!({ "message": "invalid address" })),
            text: None,
        };
        assert_eq!(
            ExtractedError::from_error(response),
            ExtractedError::Message("invalid address".into())
        );
    }

    // -- drop_errors tests ----------------------------------------------------

    #[tokio::test]
    async fn drop_errors_keeps_only_the_recovered_operation() {
        let operations = stream::iter(vec![
            stream::iter(vec![Err(transport_error("timeout"))]),
            stream::iter(vec![Ok(1), Ok(2)]),
        ]);
        let values: Vec<i32> = drop_errors(operations).collect().await;
        assert_eq!(values, vec![1, 2]);
    }

    #[tokio::test]
    async fn drop_errors_passes_values_before_the_error() {
        let operations = stream::iter(vec![stream::iter(vec![
            Ok(1),
            Err(transport_error("reset")),
            Ok(2),
        ])]);
        let values: Vec<i32> = drop_errors(operations).collect().await;
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn drop_errors_waits_for_the_next_operation_after_a_failure() {
        let (outer_tx, outer_rx) = mpsc::unbounded();
        let (first_tx, first_rx) = mpsc::unbounded::<Result<i32, SourceError>>();
        let (second_tx, second_rx) = mpsc::unbounded::<Result<i32, SourceError>>();
        let mut values = Box::pin(drop_errors(outer_rx));

        outer_tx.unbounded_send(first_rx).unwrap();
        first_tx.unbounded_send(Err(transport_error("boom"))).unwrap();
        assert_eq!(next_ready(&mut values), None);

        outer_tx.unbounded_send(second_rx).unwrap();
        second_tx.unbounded_send(Ok(42)).unwrap();
        assert_eq!(next_ready(&mut values), Some(Some(42)));
    }

    #[test]
    fn drop_errors_ignores_values_of_superseded_operations() {
        let (outer_tx, outer_rx) = mpsc::unbounded();
        let (first_tx, first_rx) = mpsc::unbounded::<Result<i32, SourceError>>();
        let (second_tx, second_rx) = mpsc::unbounded::<Result<i32, SourceError>>();
        let mut values = Box::pin(drop_errors(outer_rx));

        outer_tx.unbounded_send(first_rx).unwrap();
        first_tx.unbounded_send(Ok(1)).unwrap();
        assert_eq!(next_ready(&mut values), Some(Some(1)));

        outer_tx.unbounded_send(second_rx).unwrap();
        assert_eq!(next_ready(&mut values), None);
        assert!(first_tx.unbounded_send(Ok(2)).is_err());

        second_tx.unbounded_send(Ok(3)).unwrap();
        assert_eq!(next_ready(&mut values), Some(Some(3)));
    }

    // -- extract_errors tests -------------------------------------------------

    #[tokio::test]
    async fn extract_errors_reports_each_failed_operation_once() {
        let operations = stream::iter(vec![
            stream::iter(vec![Ok(1), Err(response_error(None, Some("first")))]),
            stream::iter(vec![Ok(2), Ok(3)]),
            stream::iter(vec![Err(transport_error("second")), Err(transport_error("ignored"))]),
        ]);
        let errors: Vec<_> = extract_errors(operations).collect().await;
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ExtractedError::Text("first".into())));
        assert!(errors.contains(&ExtractedError::Raw(transport_error("second"))));
    }

    #[tokio::test]
    async fn plain_errors_are_reported_raw() {
        let operations = stream::iter(vec![stream::iter(vec![Err::<i32, _>("plain")])]);
        let errors: Vec<_> = extract_errors(operations).collect().await;
        assert_eq!(errors, vec![ExtractedError::Raw("plain")]);
    }

    #[test]
    fn extract_errors_surfaces_failures_of_superseded_operations() {
        let (outer_tx, outer_rx) = mpsc::unbounded();
        let (first_tx, first_rx) = mpsc::unbounded::<Result<i32, SourceError>>();
        let (second_tx, second_rx) = mpsc::unbounded::<Result<i32, SourceError>>();
        let mut errors = Box::pin(extract_errors(outer_rx));

        outer_tx.unbounded_send(first_rx).unwrap();
        outer_tx.unbounded_send(second_rx).unwrap();
        second_tx.unbounded_send(Ok(5)).unwrap();
        assert_eq!(next_ready(&mut errors), None);

        first_tx
            .unbounded_send(Err(response_error(Some(json!({ "message": "late" })), None)))
            .unwrap();
        assert_eq!(
            next_ready(&mut errors),
            Some(Some(ExtractedError::Message("late".into())))
        );
    }
}
