//! Voice wrapper integration tests
//!
//! Runs the HTTP providers against a local mock server

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use cadence::speech::{Emotion, VoiceSettings};
use cadence::voice::{SpokenClip, Synthesizer, Voice, VoiceProvider};

mod common;

const FAKE_MP3: &[u8] = b"ID3fake-mp3-bytes";

/// Requests seen by the mock server: (path, headers, body)
type Seen = Arc<Mutex<Vec<(String, HeaderMap, String)>>>;

/// Start a mock TTS server answering every provider route with `status`
async fn mock_tts(status: StatusCode) -> (SocketAddr, Seen) {
    let seen: Seen = Arc::default();

    let record = |path: &'static str, seen: Seen| {
        post(move |headers: HeaderMap, body: Bytes| async move {
            seen.lock()
                .unwrap()
                .push((path.to_string(), headers, String::from_utf8_lossy(&body).into_owned()));
            (status, FAKE_MP3)
        })
    };

    let app = Router::new()
        .route("/v1/audio/speech", record("openai", seen.clone()))
        .route("/v1/text-to-speech/{voice}", record("elevenlabs", seen.clone()))
        .route("/cognitiveservices/v1", record("azure", seen.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, seen)
}

#[tokio::test]
async fn test_openai_clip_is_saved() {
    let (addr, seen) = mock_tts(StatusCode::OK).await;
    let out = tempfile::tempdir().unwrap();

    let synthesizer = Synthesizer::new_openai("sk-test".into(), "nova".into(), "tts-1".into())
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    let voice = Voice::with_synthesizer(synthesizer, out.path());
    assert_eq!(voice.provider(), VoiceProvider::OpenAi);

    let clip = voice
        .speak("Hello there", Emotion::Frustrated.voice_settings())
        .await;

    let SpokenClip::Saved { path, bytes } = clip else {
        panic!("expected a saved clip, got {clip:?}");
    };
    assert_eq!(bytes, FAKE_MP3.len());
    assert_eq!(path.extension().unwrap(), "mp3");
    assert!(path.starts_with(out.path()));
    assert_eq!(std::fs::read(&path).unwrap(), FAKE_MP3);

    let seen = seen.lock().unwrap();
    let (route, headers, body) = &seen[0];
    assert_eq!(route, "openai");
    assert_eq!(headers["authorization"], "Bearer sk-test");
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["voice"], "nova");
    assert_eq!(json["input"], "Hello there");
    assert_eq!(json["response_format"], "mp3");
}

#[tokio::test]
async fn test_elevenlabs_request_shape() {
    let (addr, seen) = mock_tts(StatusCode::OK).await;

    let synthesizer = Synthesizer::new_elevenlabs(
        "xi-test".into(),
        "EXAVITQu4vr4xnSDxMaL".into(),
        "eleven_multilingual_v2".into(),
    )
    .unwrap()
    .with_base_url(format!("http://{addr}"));

    let audio = synthesizer
        .synthesize("Hi", VoiceSettings::default())
        .await
        .unwrap();
    assert_eq!(audio, FAKE_MP3);

    let seen = seen.lock().unwrap();
    let (route, headers, body) = &seen[0];
    assert_eq!(route, "elevenlabs");
    assert_eq!(headers["xi-api-key"], "xi-test");
    assert_eq!(headers["accept"], "audio/mpeg");
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["model_id"], "eleven_multilingual_v2");
    assert_eq!(json["voice_settings"]["use_speaker_boost"], true);
}

#[tokio::test]
async fn test_azure_sends_ssml() {
    let (addr, seen) = mock_tts(StatusCode::OK).await;

    let synthesizer = Synthesizer::new_azure(
        "az-test".into(),
        "en-US-JennyMultilingualNeural".into(),
        "eastus",
    )
    .unwrap()
    .with_base_url(format!("http://{addr}"));

    synthesizer
        .synthesize("Is my card safe?", Emotion::Worried.voice_settings())
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    let (route, headers, body) = &seen[0];
    assert_eq!(route, "azure");
    assert_eq!(headers["ocp-apim-subscription-key"], "az-test");
    assert_eq!(headers["content-type"], "application/ssml+xml");
    assert!(body.contains("<prosody"));
    assert!(body.contains("Is my card safe?"));
}

#[tokio::test]
async fn test_provider_error_falls_back_to_console() {
    let (addr, _seen) = mock_tts(StatusCode::INTERNAL_SERVER_ERROR).await;
    let out = tempfile::tempdir().unwrap();

    let synthesizer = Synthesizer::new_openai("sk-test".into(), "alloy".into(), "tts-1".into())
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    let voice = Voice::with_synthesizer(synthesizer, out.path());

    let clip = voice.speak("Still here", VoiceSettings::default()).await;
    assert_eq!(
        clip,
        SpokenClip::Console {
            text: "Still here".into()
        }
    );
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_synthesis_error_status() {
    let (addr, _seen) = mock_tts(StatusCode::UNAUTHORIZED).await;

    let synthesizer = Synthesizer::new_openai("bad".into(), "alloy".into(), "tts-1".into())
        .unwrap()
        .with_base_url(format!("http://{addr}"));

    let err = synthesizer
        .synthesize("Hi", VoiceSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, cadence::Error::Tts(_)));
    assert!(err.to_string().contains("401"));
}

#[test]
fn test_missing_key_in_config_is_error() {
    let mut config = cadence::Config::default();
    config.voice.provider = VoiceProvider::ElevenLabs;
    assert!(Voice::from_config(&config).is_err());

    config.api_keys.elevenlabs = Some("xi-test".into());
    let voice = Voice::from_config(&config).unwrap();
    assert_eq!(voice.provider(), VoiceProvider::ElevenLabs);
}
