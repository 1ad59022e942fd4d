//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Transmitter lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fmt;

use moveol_common::config::{AppConfig, SerialConfig, TransmitConfig};
use moveol_logging::{log_lifecycle_event, moveol_debug, moveol_error, moveol_info};
use moveol_logging::{LifecycleOutcome, LogContext};
use moveol_sim::{encode_line, Reading, SampleGenerator};
use moveol_transport::{SerialTransport, Transport, TransportError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::error::TransmitError;

/// Remediation hint printed after a port-open failure.
pub const PORT_HINT: &str =
    "Hint: check that the bluetooth device is paired and connected to this port.";

/// `Connecting -> Streaming`. There is no way back to `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitterState {
    Connecting,
    Streaming,
}

impl TransmitterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransmitterState::Connecting => "connecting",
            TransmitterState::Streaming => "streaming",
        }
    }
}

/// Result of one send cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SentFrame {
    /// 1-based position of the frame within the session.
    pub tick: u64,
    pub reading: Reading,
    /// The JSON payload exactly as written, without the trailing newline.
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown channel fired or its sender went away.
    Cancelled,
    /// `transmit.max_frames` frames were sent.
    BudgetReached,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Cancelled => f.write_str("cancelled"),
            StopReason::BudgetReached => f.write_str("frame budget reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_sent: u64,
    pub reason: StopReason,
}

/// Owns the link and the generator, and drives the send cycle.
#[derive(Debug)]
pub struct Transmitter<T: Transport> {
    config: TransmitConfig,
    generator: SampleGenerator,
    transport: T,
    state: TransmitterState,
    frames_sent: u64,
}

impl<T: Transport> Transmitter<T> {
    /// Open the link through `open`, then wait out the settle delay.
    ///
    /// A port-open failure is logged together with [`PORT_HINT`] and returned;
    /// nothing is retried.
    pub async fn connect<F>(
        serial: &SerialConfig,
        config: TransmitConfig,
        generator: SampleGenerator,
        open: F,
    ) -> Result<Self, TransmitError>
    where
        F: FnOnce(&SerialConfig) -> Result<T, TransportError>,
    {
        let state = TransmitterState::Connecting;
        let ctx = LogContext::new()
            .with_port(&serial.port)
            .with_state(state.as_str());
        moveol_info!(context = ctx, "MovEol sender starting on {}...", serial.port);

        let transport = match open(serial) {
            Ok(transport) => transport,
            Err(err) => {
                log_lifecycle_event(
                    Some(&ctx),
                    "port.open",
                    &err.to_string(),
                    LifecycleOutcome::Fault,
                );
                moveol_error!(context = ctx, "{}", PORT_HINT);
                return Err(err.into());
            }
        };

        if !config.settle_delay.is_zero() {
            moveol_debug!(
                context = ctx,
                "waiting {} ms for the device to settle",
                config.settle_delay.as_millis()
            );
            tokio::time::sleep(config.settle_delay).await;
        }

        let transmitter = Self {
            config,
            generator,
            transport,
            state: TransmitterState::Streaming,
            frames_sent: 0,
        };
        log_lifecycle_event(
            Some(&transmitter.context()),
            "port.open",
            "Connected. Sending data...",
            LifecycleOutcome::Success,
        );
        Ok(transmitter)
    }

    pub fn state(&self) -> TransmitterState {
        self.state
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn context(&self) -> LogContext<'_> {
        LogContext::new()
            .with_port(self.transport.port_name())
            .with_state(self.state.as_str())
    }

    /// Generate, encode, write and log a single frame. Does not sleep.
    pub fn step(&mut self) -> Result<SentFrame, TransmitError> {
        let reading = self.generator.sample();
        let line = encode_line(&reading)?;
        self.transport.send(&line)?;
        self.frames_sent += 1;

        let payload = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
        moveol_info!(
            context = self.context().with_tick(self.frames_sent),
            "Sent: {}",
            payload
        );
        Ok(SentFrame {
            tick: self.frames_sent,
            reading,
            payload,
        })
    }

    /// Stream frames one interval apart until `shutdown` fires, its sender is
    /// dropped, or the frame budget is spent.
    ///
    /// A write failure ends the loop: it is logged and returned, and no further
    /// frames are attempted.
    pub async fn run(
        &mut self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<RunSummary, TransmitError> {
        loop {
            if !matches!(shutdown.try_recv(), Err(TryRecvError::Empty)) {
                return Ok(self.finish(StopReason::Cancelled));
            }

            if let Err(err) = self.step() {
                log_lifecycle_event(
                    Some(&self.context().with_tick(self.frames_sent)),
                    "stream.end",
                    &format!("{err}; stopping after {} frames", self.frames_sent),
                    LifecycleOutcome::Fault,
                );
                return Err(err);
            }

            if self
                .config
                .max_frames
                .is_some_and(|limit| self.frames_sent >= limit)
            {
                return Ok(self.finish(StopReason::BudgetReached));
            }

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    return Ok(self.finish(StopReason::Cancelled));
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    fn finish(&self, reason: StopReason) -> RunSummary {
        log_lifecycle_event(
            Some(&self.context().with_tick(self.frames_sent)),
            "stream.end",
            &format!("Stopped after {} frames ({reason})", self.frames_sent),
            LifecycleOutcome::Success,
        );
        RunSummary {
            frames_sent: self.frames_sent,
            reason,
        }
    }
}

/// Open the configured serial port and stream until `shutdown` fires.
pub async fn run_serial(
    config: &AppConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<RunSummary, TransmitError> {
    let generator = SampleGenerator::from_config(&config.simulation);
    let mut transmitter = Transmitter::connect(
        &config.serial,
        config.transmit.clone(),
        generator,
        SerialTransport::open,
    )
    .await?;
    transmitter.run(shutdown).await
}
