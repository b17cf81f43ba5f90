use std::error::Error as StdError;
use std::io::ErrorKind;

use super::ProviderError;

fn error_chain_matches(
    err: &(dyn StdError + 'static),
    kind: ErrorKind,
    needle: &str,
) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == kind
        {
            return true;
        }

        if source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::ConnectionRefused, "connection refused")
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::TimedOut, "timed out")
}

/// Maps a transport failure to an actionable [`ProviderError`].
///
/// `base_url_var` names the variable the user should check when the host
/// cannot be reached.
pub(crate) fn model_api_request_error(
    err: reqwest::Error,
    api_url: &str,
    base_url_var: &'static str,
    timeout_secs: u64,
) -> ProviderError {
    let api_url = api_url.to_string();

    if err.is_timeout() || error_chain_has_timeout(&err) {
        return ProviderError::Timeout {
            api_url,
            timeout_secs,
        };
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return ProviderError::ConnectionRefused {
                api_url,
                base_url_var,
            };
        }
        return ProviderError::Connect {
            api_url,
            base_url_var,
        };
    }

    ProviderError::Request {
        api_url,
        source: err,
    }
}
