//! Deadline-bounded execution of provider calls.
//!
//! # Responsibility
//! - Race one provider call against a fixed deadline.
//! - Unblock the caller at the deadline even when the provider hangs.
//!
//! # Invariants
//! - The caller never waits past the configured deadline.
//! - Downstream abort is best-effort only; a late result is dropped with
//!   the channel, never delivered.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::generation::{GenerationProvider, ProviderError, ProviderResult};

/// Default hard deadline for one generation call.
pub const DEFAULT_GENERATION_DEADLINE: Duration = Duration::from_secs(30);

/// Gateway failure taxonomy.
#[derive(Debug)]
pub enum GatewayError {
    /// The deadline elapsed before the provider produced a result.
    DeadlineExceeded(Duration),
    /// The provider reported a failure within the deadline.
    Provider(ProviderError),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeadlineExceeded(deadline) => {
                write!(f, "generation deadline of {}ms exceeded", deadline.as_millis())
            }
            Self::Provider(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DeadlineExceeded(_) => None,
            Self::Provider(err) => Some(err),
        }
    }
}

/// Runs provider calls on a worker thread, racing a deadline timer.
pub struct GenerationGateway {
    provider: Arc<dyn GenerationProvider>,
    deadline: Duration,
}

impl GenerationGateway {
    pub fn new(provider: Arc<dyn GenerationProvider>, deadline: Duration) -> Self {
        Self { provider, deadline }
    }

    pub fn with_default_deadline(provider: Arc<dyn GenerationProvider>) -> Self {
        Self::new(provider, DEFAULT_GENERATION_DEADLINE)
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Sends one prompt to the provider and returns its reply, or fails as
    /// soon as the deadline elapses.
    ///
    /// The provider call keeps running on its worker thread after a
    /// timeout; its eventual result (and the send error it hits on the
    /// dropped channel) is discarded.
    pub fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let (result_tx, result_rx) = mpsc::channel::<ProviderResult<String>>();
        let provider = Arc::clone(&self.provider);
        let prompt = prompt.to_string();

        thread::spawn(move || {
            let _ = result_tx.send(provider.generate(&prompt));
        });

        match result_rx.recv_timeout(self.deadline) {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(err)) => Err(GatewayError::Provider(err)),
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "event=generation_call module=generation status=timeout deadline_ms={}",
                    self.deadline.as_millis()
                );
                Err(GatewayError::DeadlineExceeded(self.deadline))
            }
            Err(RecvTimeoutError::Disconnected) => Err(GatewayError::Provider(ProviderError::new(
                "worker_lost",
                "provider worker exited without producing a result",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GatewayError, GenerationGateway};
    use crate::generation::{GenerationProvider, ProviderError, ProviderResult};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    struct SlowProvider {
        delay: Duration,
    }

    impl GenerationProvider for SlowProvider {
        fn generate(&self, _prompt: &str) -> ProviderResult<String> {
            thread::sleep(self.delay);
            Ok("late reply".to_string())
        }
    }

    struct EchoProvider;

    impl GenerationProvider for EchoProvider {
        fn generate(&self, prompt: &str) -> ProviderResult<String> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct FailingProvider;

    impl GenerationProvider for FailingProvider {
        fn generate(&self, _prompt: &str) -> ProviderResult<String> {
            Err(ProviderError::new("upstream_http", "model overloaded"))
        }
    }

    #[test]
    fn returns_reply_within_deadline() {
        let gateway =
            GenerationGateway::new(Arc::new(EchoProvider), Duration::from_millis(500));
        let reply = gateway.generate("hello").expect("fast provider should reply");
        assert_eq!(reply, "echo: hello");
    }

    #[test]
    fn reports_timeout_when_provider_outlasts_deadline() {
        let gateway = GenerationGateway::new(
            Arc::new(SlowProvider {
                delay: Duration::from_millis(400),
            }),
            Duration::from_millis(30),
        );

        let err = gateway.generate("hello").expect_err("deadline should win");
        assert!(matches!(err, GatewayError::DeadlineExceeded(_)));
    }

    #[test]
    fn preserves_provider_error_message() {
        let gateway =
            GenerationGateway::new(Arc::new(FailingProvider), Duration::from_millis(500));
        let err = gateway.generate("hello").expect_err("provider fails");
        match err {
            GatewayError::Provider(provider_err) => {
                assert_eq!(provider_err.code, "upstream_http");
                assert!(provider_err.message.contains("model overloaded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
