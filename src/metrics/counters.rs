//! Counter helpers

use super::labels;
use crate::error::ErrorKind;

/// A connection was accepted
pub fn connection_accepted() {
    metrics::counter!(labels::CONNECTIONS_ACCEPTED).increment(1);
}

/// A session ended (`outcome` is one of the `OUTCOME_*` labels)
pub fn connection_closed(outcome: &'static str) {
    metrics::counter!(labels::CONNECTIONS_CLOSED, "outcome" => outcome).increment(1);
}

/// An SSLRequest was refused
pub fn ssl_refused() {
    metrics::counter!(labels::SSL_REQUESTS_REFUSED).increment(1);
}

/// A query was answered (`source` is one of the `SOURCE_*` labels)
pub fn query_answered(source: &'static str) {
    metrics::counter!(labels::QUERIES, "source" => source).increment(1);
}

/// A session failed
pub fn session_error(kind: ErrorKind) {
    metrics::counter!(labels::SESSION_ERRORS, "kind" => kind.as_str()).increment(1);
}
