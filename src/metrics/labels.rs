//! Metric names and label values

/// Connections accepted by the listener
pub const CONNECTIONS_ACCEPTED: &str = "pg_fortune_connections_accepted_total";

/// Sessions that ended, by outcome
pub const CONNECTIONS_CLOSED: &str = "pg_fortune_connections_closed_total";

/// SSLRequests answered with `N`
pub const SSL_REQUESTS_REFUSED: &str = "pg_fortune_ssl_requests_refused_total";

/// Queries answered, by source
pub const QUERIES: &str = "pg_fortune_queries_total";

/// Sessions that ended with an error, by kind
pub const SESSION_ERRORS: &str = "pg_fortune_session_errors_total";

/// Outcome: client sent Terminate
pub const OUTCOME_TERMINATED: &str = "terminated";

/// Outcome: session failed
pub const OUTCOME_ERROR: &str = "error";

/// Source: built-in command table
pub const SOURCE_BUILTIN: &str = "builtin";

/// Source: injected responder
pub const SOURCE_RESPONDER: &str = "responder";
