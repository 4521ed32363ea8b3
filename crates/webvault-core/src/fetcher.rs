//! Blocking HTTP GET that streams the response body into a destination file.
//!
//! Uses the curl crate (libcurl). Redirects are followed and TLS peer/host
//! verification is switched off: the target hosts are a fixed, known list.
//! The status code is reported but never treated as a failure.
//! Runs in the current thread; call from `spawn_blocking` if used from async code.

use crate::error::FetchError;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Transfer settings for a single GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout_secs: u64,
    /// Whole-transfer deadline; None leaves the transfer unbounded.
    pub transfer_timeout_secs: Option<u64>,
    pub max_redirects: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            transfer_timeout_secs: None,
            max_redirects: 10,
        }
    }
}

/// What a completed transfer produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome {
    pub bytes_written: u64,
    /// Final HTTP status after redirects (0 if the protocol has none).
    pub status: u32,
}

impl FetchOutcome {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &str,
    options: &FetchOptions,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(options.max_redirects)?;
    easy.ssl_verify_peer(false)?;
    easy.ssl_verify_host(false)?;
    easy.connect_timeout(Duration::from_secs(options.connect_timeout_secs))?;
    if let Some(secs) = options.transfer_timeout_secs {
        easy.timeout(Duration::from_secs(secs))?;
    }
    Ok(())
}

/// GET `url` and write the body to `destination` (created or truncated).
///
/// On a transport failure the partial destination file is removed.
pub fn fetch(
    url: &str,
    destination: &Path,
    options: &FetchOptions,
) -> Result<FetchOutcome, FetchError> {
    let file = File::create(destination).map_err(|e| FetchError::file(destination, e))?;
    let mut out = BufWriter::new(file);
    let mut written: u64 = 0;
    let mut write_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    if let Err(e) = configure(&mut easy, url, options) {
        drop(out);
        discard_partial(destination);
        return Err(FetchError::transport(url, e));
    }

    tracing::debug!(url, destination = %destination.display(), "GET");

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(|e| FetchError::transport(url, e))?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if e.is_write_error() {
            if let Some(io_err) = write_error.take() {
                return Err(FetchError::file(destination, io_err));
            }
        }
        drop(out);
        discard_partial(destination);
        return Err(FetchError::transport(url, e));
    }

    out.flush().map_err(|e| FetchError::file(destination, e))?;
    drop(out);

    let status = easy
        .response_code()
        .map_err(|e| FetchError::transport(url, e))?;

    let outcome = FetchOutcome {
        bytes_written: written,
        status,
    };
    if !outcome.is_success_status() {
        tracing::warn!(url, status, "non-2xx response stored as content");
    }
    Ok(outcome)
}

fn discard_partial(destination: &Path) {
    if let Err(e) = fs::remove_file(destination) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::debug!("could not remove partial {}: {}", destination.display(), e);
        }
    }
}
