//! Session loop driven until shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tether_client::{CommandHandler, Engine};
use tether_core::{Clock, Transport};

/// Poll `engine` every `tick` until `stop` is set, then close the link
///
/// The flag is checked between polls only.
pub fn run_until_stopped<T, H, C>(engine: &mut Engine<T, H, C>, stop: &AtomicBool, tick: Duration)
where
    T: Transport,
    H: CommandHandler,
    C: Clock,
{
    while !stop.load(Ordering::Relaxed) {
        engine.poll();
        std::thread::sleep(tick);
    }

    tracing::debug!("Closing session");
    engine.transport_mut().disconnect();
}
