//! Application handler used by the agent

use tether_client::{CommandHandler, Responder};
use tether_protocol::Body;

/// Logs every application message; answers `ping` with `pong`
#[derive(Debug, Default)]
pub struct LoggingHandler {
    received: u64,
}

impl LoggingHandler {
    /// Create a handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages handled
    pub fn received(&self) -> u64 {
        self.received
    }
}

impl CommandHandler for LoggingHandler {
    fn handle(&mut self, responder: &mut Responder<'_>, body: Body<'_>) {
        self.received += 1;

        let params: Vec<String> = body
            .params()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .collect();
        tracing::info!(
            msg_id = responder.reply_id().unwrap_or_default(),
            "Hardware message: {}",
            params.join(" ")
        );

        if params.first().map(String::as_str) == Some("ping") {
            responder.send(b"pong");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_client::Engine;
    use tether_core::testing::{ManualClock, ScriptedTransport};
    use tether_core::SessionConfig;
    use tether_protocol::{Command, FrameHeader};

    fn engine() -> (Engine<ScriptedTransport, LoggingHandler, ManualClock>, ScriptedTransport) {
        let script = ScriptedTransport::new();
        let mut engine = Engine::with_clock(
            script.clone(),
            LoggingHandler::new(),
            ManualClock::new(0),
            SessionConfig::new("token"),
        );
        script.push_login_reply(200);
        engine.poll();
        script.take_outbound();
        (engine, script)
    }

    #[test]
    fn test_ping_param_gets_pong() {
        let (mut engine, script) = engine();
        script.push_frame(FrameHeader::new(Command::Hardware, 12, 4), b"ping");
        engine.poll();

        assert_eq!(engine.handler().received(), 1);
        let frames = script.take_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].header, FrameHeader::new(Command::Hardware, 12, 4));
        assert_eq!(frames[0].body, b"pong");
    }

    #[test]
    fn test_other_messages_are_only_logged() {
        let (mut engine, script) = engine();
        script.push_frame(FrameHeader::new(Command::Hardware, 13, 6), b"vw\x001\x001");
        engine.poll();

        assert_eq!(engine.handler().received(), 1);
        assert!(script.take_outbound().is_empty());
    }
}
