use crate::asr::{Transcriber, Transcript, MIN_AUDIO_BYTES};
use crate::error::HandlerError;
use crate::repository::CommandRepository;
use crate::voice_commands::{match_command, MatchResult};
use serde::Serialize;

/// Match result for spoken input, with what was heard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceMatch {
    pub transcript: Transcript,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Match typed or already transcribed text against the user's commands
pub fn handle_text(
    repo: &dyn CommandRepository,
    user_id: &str,
    text: &str,
) -> Result<MatchResult, HandlerError> {
    let commands = repo.list_commands(user_id)?;
    let result = match_command(text, &commands);
    if result.success {
        log::info!(
            "[{user_id}] \"{}\" → {} (parameter: {:?})",
            text.trim(),
            result.workflow_id.as_deref().unwrap_or_default(),
            result.parameter_value
        );
    } else {
        log::info!("[{user_id}] \"{}\": {}", text.trim(), result.message);
    }
    Ok(result)
}

/// Reject uploads the transcription server cannot use
pub fn check_audio(audio: &[u8], max_bytes: usize) -> Result<(), HandlerError> {
    if audio.len() < MIN_AUDIO_BYTES {
        return Err(HandlerError::InvalidAudio(format!(
            "audio file too small: {} bytes",
            audio.len()
        )));
    }
    if audio.len() > max_bytes {
        return Err(HandlerError::InvalidAudio(format!(
            "audio file too large: {} bytes (limit {max_bytes})",
            audio.len()
        )));
    }
    Ok(())
}

/// Transcribe audio, then match the transcript
pub async fn handle_audio<T: Transcriber>(
    repo: &dyn CommandRepository,
    transcriber: &T,
    user_id: &str,
    file_name: &str,
    audio: Vec<u8>,
    max_bytes: usize,
) -> Result<VoiceMatch, HandlerError> {
    check_audio(&audio, max_bytes)?;
    let transcript = transcriber
        .transcribe(file_name, audio)
        .await
        .map_err(HandlerError::Transcription)?;
    log::info!(
        "[{user_id}] heard \"{}\" (language: {:?}, confidence: {:?})",
        transcript.text,
        transcript.language,
        transcript.confidence
    );
    let result = handle_text(repo, user_id, &transcript.text)?;
    Ok(VoiceMatch { transcript, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repository::InMemoryCommandRepository;
    use crate::voice_commands::{Command, MatchOutcome};

    struct FixedTranscriber(Result<&'static str, &'static str>);

    impl Transcriber for FixedTranscriber {
        async fn transcribe(
            &self,
            _file_name: &str,
            _audio: Vec<u8>,
        ) -> Result<Transcript, String> {
            self.0
                .map(|text| Transcript {
                    text: text.to_string(),
                    language: Some("en".to_string()),
                    confidence: Some(0.9),
                    processing_time_ms: Some(120),
                })
                .map_err(str::to_string)
        }
    }

    struct BrokenRepository;

    impl CommandRepository for BrokenRepository {
        fn list_commands(&self, _user_id: &str) -> Result<Vec<Command>, RepositoryError> {
            Err(RepositoryError::Io(std::io::Error::other("disk gone")))
        }
    }

    fn repo() -> InMemoryCommandRepository {
        InMemoryCommandRepository::new(vec![
            Command::with_parameter("alice", "Search Example On Youtube", "Example", "wf-yt"),
            Command::new("alice", "good night", "wf-night"),
            Command::new("bob", "good night", "wf-bob"),
        ])
    }

    async fn transcribe_and_match(
        transcriber: &FixedTranscriber,
        audio_len: usize,
    ) -> Result<VoiceMatch, HandlerError> {
        let audio = vec![0; audio_len];
        handle_audio(&repo(), transcriber, "alice", "clip.wav", audio, 1 << 20).await
    }

    #[test]
    fn test_text_scoped_to_user() {
        let result = handle_text(&repo(), "bob", "Good night!").unwrap();
        assert_eq!(result.workflow_id.as_deref(), Some("wf-bob"));

        let result = handle_text(&repo(), "carol", "good night").unwrap();
        assert_eq!(result.outcome, MatchOutcome::NoCommands);
    }

    #[test]
    fn test_repository_fault_propagates() {
        let err = handle_text(&BrokenRepository, "alice", "good night").unwrap_err();
        assert!(matches!(err, HandlerError::Repository(_)));
    }

    #[test]
    fn test_check_audio_bounds() {
        assert!(check_audio(&[0; 999], 5000).is_err());
        assert!(check_audio(&[0; 1000], 5000).is_ok());
        assert!(matches!(check_audio(&[0; 5001], 5000), Err(HandlerError::InvalidAudio(_))));
    }

    #[tokio::test]
    async fn test_audio_transcribed_then_matched() {
        let transcriber = FixedTranscriber(Ok("Search Batman on YouTube."));
        let voice = transcribe_and_match(&transcriber, 2048).await.unwrap();
        assert_eq!(voice.transcript.text, "Search Batman on YouTube.");
        assert!(voice.result.success);
        assert_eq!(voice.result.parameter_value.as_deref(), Some("Batman"));

        let json = serde_json::to_value(&voice).unwrap();
        assert_eq!(json["workflow_id"], "wf-yt");
        assert_eq!(json["transcript"]["language"], "en");
    }

    #[tokio::test]
    async fn test_audio_transcription_failure() {
        let transcriber = FixedTranscriber(Err("No speech detected in audio"));
        let err = transcribe_and_match(&transcriber, 2048).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Transcription(ref m) if m == "No speech detected in audio"
        ));
    }

    #[tokio::test]
    async fn test_small_audio_never_reaches_transcriber() {
        let transcriber = FixedTranscriber(Ok("good night"));
        let err = transcribe_and_match(&transcriber, 10).await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidAudio(_)));
    }
}
