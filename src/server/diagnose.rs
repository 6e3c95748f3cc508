//! Classify database connection failures for the startup log.

use std::fmt;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectFailure {
    Refused,
    HostNotFound,
    Timeout,
    Authentication,
    AccessDenied,
    Network,
    Other,
}

impl ConnectFailure {
    pub fn classify(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => ConnectFailure::Timeout,
            sqlx::Error::Io(e) => Self::classify_io(e),
            sqlx::Error::Tls(_) => ConnectFailure::Network,
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // invalid_password
                Some("28P01") => ConnectFailure::Authentication,
                // invalid_authorization_specification; pg_hba rejections carry this code too
                Some("28000") if db.message().contains("pg_hba.conf") => ConnectFailure::AccessDenied,
                Some("28000") => ConnectFailure::Authentication,
                _ => ConnectFailure::Other,
            },
            _ => ConnectFailure::Other,
        }
    }

    fn classify_io(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::ConnectionRefused => ConnectFailure::Refused,
            io::ErrorKind::TimedOut => ConnectFailure::Timeout,
            io::ErrorKind::PermissionDenied
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::NotConnected => ConnectFailure::Network,
            _ => {
                // Resolver failures have no dedicated ErrorKind.
                let message = e.to_string().to_ascii_lowercase();
                if [
                    "failed to lookup address",
                    "name or service not known",
                    "nodename nor servname",
                    "no such host",
                ]
                .iter()
                .any(|needle| message.contains(needle))
                {
                    ConnectFailure::HostNotFound
                } else {
                    ConnectFailure::Network
                }
            }
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            ConnectFailure::Refused => "start the database server or check the port in the database URL",
            ConnectFailure::HostNotFound => "check the host name in DATABASE_URL",
            ConnectFailure::Timeout => {
                "check that the database server is running and reachable, or raise TODO_DB_SELECT_TIMEOUT_MS"
            }
            ConnectFailure::Authentication => "check the user name and password in DATABASE_URL",
            ConnectFailure::AccessDenied => {
                "the server rejected this client; check pg_hba.conf or the network access list"
            }
            ConnectFailure::Network => "check network connectivity to the database server",
            ConnectFailure::Other => "see the error above",
        }
    }
}

impl fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectFailure::Refused => "connection refused",
            ConnectFailure::HostNotFound => "host not found",
            ConnectFailure::Timeout => "connection timed out",
            ConnectFailure::Authentication => "authentication failed",
            ConnectFailure::AccessDenied => "access rejected by server",
            ConnectFailure::Network => "network error",
            ConnectFailure::Other => "unexpected error",
        })
    }
}
