use std::error::Error;
use std::io;

/// Returns `true` if `error`, or any error in its source chain, is an
/// `io::Error` describing a transient network condition.
///
/// Protocol-level failures (invalid data, unsupported features, permission
/// problems) are permanent and return `false`.
pub fn is_temporary_error(error: &(dyn Error + 'static)) -> bool {
    std::iter::successors(Some(error), |&err| err.source()).any(|err| {
        err.downcast_ref::<io::Error>()
            .is_some_and(|io| is_temporary_kind(io.kind()))
    })
}

fn is_temporary_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::UnexpectedEof
    )
}
