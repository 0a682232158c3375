//! The outbound boundary to the conversational shell.
//!
//! The core never initiates speech on its own transport; it hands text to a
//! [`SpeechSink`] and treats the call as fire-and-forget. Real deployments
//! bridge this to a TTS pipeline; tests capture the utterances.

use async_trait::async_trait;

/// Where spoken text goes.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Speak one utterance. Fire-and-forget: the core ignores failures here.
    async fn speak(&self, text: &str);
}

/// A sink that discards speech, for observer-only deployments and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

#[async_trait]
impl SpeechSink for SilentSink {
    async fn speak(&self, _text: &str) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn silent_sink_accepts_speech() {
        let sink = SilentSink;
        sink.speak("hello").await;
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let sink: Arc<dyn SpeechSink> = Arc::new(SilentSink);
        sink.speak("hello").await;
    }
}
