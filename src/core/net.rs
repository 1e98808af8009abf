// src/core/net.rs

// Blocking HTTP GET with bounded retry. Requests are issued one at a time by
// the fetch loop, so there is no connection sharing to worry about.

use std::{thread, time::Duration};

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::RETRY_AFTER;

use crate::config::consts::{BACKOFF_CAP_MS, USER_AGENT};
use crate::config::options::FetchOptions;
use crate::error::FetchError;

pub struct HttpClient {
    client: Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpClient {
    pub fn new(opts: &FetchOptions) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(opts.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            max_retries: opts.max_retries,
            backoff_base: opts.backoff_base,
        })
    }

    /// GET `url` and return the body.
    ///
    /// Transport errors, 429 and 5xx are retried up to `max_retries` times.
    /// Any other non-success status fails at once.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            let (last, retry_after) = match self.client.get(url).send() {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .text()
                        .map_err(|source| FetchError::Transport { url: s!(url), source });
                }
                Ok(resp) if is_retryable(resp.status()) => {
                    (format!("HTTP {}", resp.status().as_u16()), retry_after(&resp))
                }
                Ok(resp) => {
                    return Err(FetchError::Status { url: s!(url), status: resp.status().as_u16() });
                }
                Err(e) => (e.to_string(), None),
            };

            if attempt >= self.max_retries {
                return Err(FetchError::RetriesExhausted {
                    url: s!(url),
                    attempts: attempt + 1,
                    last,
                });
            }

            let wait = retry_after.unwrap_or_else(|| backoff(self.backoff_base, attempt));
            tracing::debug!(url, attempt = attempt + 1, error = %last, ?wait, "retrying");
            thread::sleep(wait);
            attempt += 1;
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// `Retry-After` in whole seconds; HTTP-date values are ignored.
fn retry_after(resp: &Response) -> Option<Duration> {
    let secs: u64 = resp.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs).min(Duration::from_millis(BACKOFF_CAP_MS)))
}

/// base · 2^attempt, capped.
fn backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(Duration::from_millis(BACKOFF_CAP_MS))
}
