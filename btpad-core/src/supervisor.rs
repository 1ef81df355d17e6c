//! ConnectionSupervisor: drives the read loop for one connected controller.

use core::fmt;

use embedded_hal_async::delay::DelayNs;

use crate::accumulator::{FrameAccumulator, DEFAULT_BUFFER_CAPACITY};
use crate::decoder::ProtocolDecoder;
use crate::sink::EventSink;
use crate::source::{ByteSource, ReadError};

/// Retry policy for transient read failures.
///
/// Customize this at compile-time by creating your own const.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SupervisorConfig {
    /// Consecutive failures tolerated before the connection is abandoned.
    pub max_consecutive_errors: u32,
    /// Backoff unit; the wait after `n` consecutive failures is `n` units.
    pub backoff_step_ms: u32,
}

impl SupervisorConfig {
    /// Delay before the next read after `errors` consecutive failures.
    ///
    /// The first failure is retried immediately.
    #[inline]
    #[must_use]
    pub const fn backoff_ms(&self, errors: u32) -> u32 {
        if errors > 1 {
            self.backoff_step_ms.saturating_mul(errors)
        } else {
            0
        }
    }
}

/// Default policy: 100 ms per consecutive failure, give up after 10.
pub const DEFAULT_SUPERVISOR_CONFIG: SupervisorConfig = SupervisorConfig {
    max_consecutive_errors: 10,
    backoff_step_ms: 100,
};

impl Default for SupervisorConfig {
    fn default() -> Self {
        DEFAULT_SUPERVISOR_CONFIG
    }
}

/// Lifecycle of a controller connection.
///
/// `Connecting -> Connected` on the first successful read,
/// `Connected -> Error` when the retry budget runs out and
/// `Error -> Disconnected` once the failure has been reported.
/// [`ConnectionSupervisor::reconnect`] starts over at `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Error type for supervisor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupervisorError {
    /// Transient read failure; the next poll retries.
    Read(ReadError),
    /// Retry budget exhausted, the connection is abandoned.
    RetriesExhausted { last: ReadError, attempts: u32 },
}

impl SupervisorError {
    /// Whether the connection has been abandoned.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, SupervisorError::RetriesExhausted { .. })
    }
}

impl fmt::Display for SupervisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorError::Read(e) => write!(f, "read failed: {}", e),
            SupervisorError::RetriesExhausted { last, attempts } => {
                write!(f, "connection abandoned after {} failures: {}", attempts, last)
            }
        }
    }
}

/// Reads from a byte source, stitches chunks and feeds a decoder.
///
/// Owns exactly one decoder and one frame buffer; run one supervisor per
/// connected controller. Decoding runs to completion on every chunk, so the
/// supervisor can be dropped or [`disconnect`](Self::disconnect)ed at any
/// await point without splitting a frame.
pub struct ConnectionSupervisor<S, D, K, T, const N: usize = DEFAULT_BUFFER_CAPACITY> {
    source: S,
    decoder: D,
    sink: K,
    delay: T,
    accumulator: FrameAccumulator<N>,
    config: SupervisorConfig,
    state: ConnectionState,
    errors: u32,
    last_error: Option<ReadError>,
}

impl<S, D, K, T, const N: usize> ConnectionSupervisor<S, D, K, T, N>
where
    S: ByteSource,
    D: ProtocolDecoder,
    K: EventSink,
    T: DelayNs,
{
    /// Take over an established connection with the default retry policy.
    pub fn new(source: S, decoder: D, sink: K, delay: T) -> Self {
        Self::with_config(source, decoder, sink, delay, DEFAULT_SUPERVISOR_CONFIG)
    }

    /// Take over an established connection with a custom retry policy.
    pub fn with_config(
        source: S,
        mut decoder: D,
        sink: K,
        delay: T,
        config: SupervisorConfig,
    ) -> Self {
        decoder.reset();
        info!("{} connecting", decoder.driver_name());
        Self {
            source,
            decoder,
            sink,
            delay,
            accumulator: FrameAccumulator::new(),
            config,
            state: ConnectionState::Connecting,
            errors: 0,
            last_error: None,
        }
    }

    /// Read and decode until the connection is abandoned.
    ///
    /// Returns the terminal error with the state `Disconnected`; transient
    /// failures are retried internally.
    pub async fn run(&mut self) -> SupervisorError {
        loop {
            match self.poll_once().await {
                Ok(()) | Err(SupervisorError::Read(_)) => {}
                Err(e) => {
                    self.state = ConnectionState::Disconnected;
                    return e;
                }
            }
        }
    }

    /// Perform a single read and decode whatever it completed.
    ///
    /// On a transient failure the backoff delay has already elapsed when this
    /// returns `Err(SupervisorError::Read(_))`.
    pub async fn poll_once(&mut self) -> Result<(), SupervisorError> {
        if matches!(
            self.state,
            ConnectionState::Error | ConnectionState::Disconnected
        ) {
            self.state = ConnectionState::Disconnected;
            return Err(SupervisorError::RetriesExhausted {
                last: self.last_error.unwrap_or(ReadError::Disconnected),
                attempts: self.errors,
            });
        }

        match self.source.read(self.accumulator.spare_mut()).await {
            Ok(count) => {
                if self.state == ConnectionState::Connecting {
                    info!("{} connected", self.decoder.driver_name());
                    self.state = ConnectionState::Connected;
                }
                self.errors = 0;
                self.accumulator.commit(count);
                self.accumulator.decode(&mut self.decoder, &mut self.sink);
                Ok(())
            }
            Err(e) => {
                self.errors = self.errors.saturating_add(1);
                self.last_error = Some(e);

                if self.errors > self.config.max_consecutive_errors {
                    error!(
                        "{}: giving up after {} consecutive read errors",
                        self.decoder.driver_name(),
                        self.errors
                    );
                    self.state = ConnectionState::Error;
                    self.decoder.reset();
                    self.accumulator.clear();
                    return Err(SupervisorError::RetriesExhausted {
                        last: e,
                        attempts: self.errors,
                    });
                }

                let wait = self.config.backoff_ms(self.errors);
                warn!("read error {:?} (#{}), retrying in {} ms", e, self.errors, wait);
                if wait > 0 {
                    self.delay.delay_ms(wait).await;
                }
                Err(SupervisorError::Read(e))
            }
        }
    }

    /// Start a fresh connection over the same source and sink.
    ///
    /// Decoder state, buffered bytes and the error count are dropped.
    pub fn reconnect(&mut self) {
        self.decoder.reset();
        self.accumulator.clear();
        self.errors = 0;
        self.last_error = None;
        self.state = ConnectionState::Connecting;
        info!("{} reconnecting", self.decoder.driver_name());
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of consecutive failed reads.
    pub fn consecutive_errors(&self) -> u32 {
        self.errors
    }

    /// Times the frame buffer was dropped for protocol desync.
    pub fn desync_count(&self) -> u32 {
        self.accumulator.desync_count()
    }

    /// Get a reference to the decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Get a reference to the byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the byte source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get a reference to the event sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get a mutable reference to the event sink.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Tear down the connection, dropping the decoder and its state.
    ///
    /// Returns the byte source and event sink for reuse.
    pub fn disconnect(self) -> (S, K) {
        info!("{} disconnected", self.decoder.driver_name());
        (self.source, self.sink)
    }
}
