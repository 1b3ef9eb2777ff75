//! The error taxonomy of the client.

use irbis_res::ResourceError;
use irbis_transport::TransportError;

/// Synthetic code recorded in [`Connection::last_error`] when the
/// transport itself fails.
///
/// [`Connection::last_error`]: crate::Connection::last_error
pub const NETWORK_FAILURE: i32 = -100_000;

/// Everything a session operation can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The socket exchange failed; the session stays formally connected
    /// and records [`NETWORK_FAILURE`].
    #[error("network failure: {0}")]
    Transport(#[from] TransportError),

    /// The server closed the connection without sending anything.
    #[error("empty server response")]
    EmptyResponse,

    /// The server answered with a negative return code that the command
    /// does not tolerate.
    #[error("server error {code}: {}", describe_error(*code))]
    Protocol {
        /// The return code as received.
        code: i32,
    },

    /// The operation needs a registered session.
    #[error("not connected")]
    NotConnected,

    /// Required connection settings are missing.
    #[error("incomplete connection settings: {0} is not set")]
    Incomplete(&'static str),

    /// A connection string carried an unknown key or unusable value.
    #[error("bad connection string element: {0}")]
    ConnectionString(String),

    /// A one-letter workstation code outside the known set.
    #[error("unknown workstation code: {0}")]
    UnknownWorkstation(char),

    /// A malformed resource file that is not tolerated silently.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl Error {
    /// The protocol error for a return code.
    pub fn protocol(code: i32) -> Self {
        Error::Protocol { code }
    }

    /// The return code carried by this error, using the synthetic
    /// network-failure code for transport-level failures.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Protocol { code } => Some(*code),
            Error::Transport(_) | Error::EmptyResponse => Some(NETWORK_FAILURE),
            _ => None,
        }
    }
}

/// Soft-failure adapter: collapse an operation outcome into its natural
/// empty value.
///
/// Callers that prefer the source library's chain-without-checking style
/// append `.or_empty()` to any command; the code remains available in
/// [`Connection::last_error`].
///
/// [`Connection::last_error`]: crate::Connection::last_error
pub trait OrEmpty<T> {
    fn or_empty(self) -> T;
}

impl<T: Default> OrEmpty<T> for Result<T, Error> {
    fn or_empty(self) -> T {
        self.unwrap_or_default()
    }
}

/// Human description of a server return code.
pub fn describe_error(code: i32) -> &'static str {
    match code {
        code if code >= 0 => "normal return",
        -100 => "the given MFN is outside the database range",
        -101 => "bad shelf size",
        -102 => "bad shelf number",
        -140 => "read past the end of the database",
        -141 => "read error",
        -200 => "the field is absent",
        -201 => "no previous version of the record",
        -202 => "the term does not exist",
        -203 => "the last term of the dictionary",
        -204 => "the first term of the dictionary",
        -300 | -301 => "the database is exclusively locked",
        -400 => "master file error",
        -401 => "inverted file error",
        -402 => "write error",
        -403 => "actualization error",
        -600 | -603 => "the record is logically deleted",
        -601 | -605 => "the record is physically deleted",
        -602 => "the record is locked",
        -607 => "autoin.gbl error",
        -608 => "record version mismatch",
        -700 => "backup creation error",
        -701 => "backup restore error",
        -702 => "sort error",
        -703 => "bad term",
        -704 => "dictionary creation error",
        -705 => "dictionary load error",
        -800 => "bad global correction parameters",
        -801 => "global correction repetition error",
        -802 => "global correction method error",
        -1111 => "server execution error",
        -2222 => "protocol error",
        -3333 => "the client is not registered",
        -3334 => "the client did not register",
        -3335 => "bad client identifier",
        -3336 => "no access to the workstation commands",
        -3337 => "the client is already registered",
        -3338 => "bad client",
        -4444 => "bad password",
        -5555 => "the file does not exist",
        -6666 => "the server is overloaded",
        -7777 => "worker process failure",
        -8888 => "general failure",
        NETWORK_FAILURE => "network failure",
        _ => "unknown error",
    }
}
