//! Integration tests for the advice boundary: prompt content and fallbacks on remote failure.

use futsal_coach::advice::{
    request_source_analysis, request_substitution_advice, substitution_prompt, with_sources,
    Advice, AdviceProvider, AdviceSource, RemoteError, SourceKind, ADVICE_EMPTY_FALLBACK,
    ADVICE_ERROR_FALLBACK, ANALYSIS_ERROR_FALLBACK,
};
use futsal_coach::{start_match, tick, Session};
use std::sync::Mutex;

/// Replies with a fixed outcome and remembers the last prompt.
struct FakeProvider {
    reply: Option<String>,
    last_prompt: Mutex<Option<String>>,
}

impl FakeProvider {
    fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            last_prompt: Mutex::new(None),
        }
    }

    fn outcome(&self) -> Result<String, RemoteError> {
        self.reply.clone().ok_or(RemoteError::Status {
            code: 429,
            body: "quota exceeded".to_string(),
        })
    }
}

impl AdviceProvider for FakeProvider {
    async fn generate_advice(&self, prompt: &str) -> Result<String, RemoteError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.outcome()
    }

    async fn analyze_source(
        &self,
        _kind: SourceKind,
        payload: &str,
        _mime_type: Option<&str>,
    ) -> Result<String, RemoteError> {
        *self.last_prompt.lock().unwrap() = Some(payload.to_string());
        self.outcome()
    }
}

fn session_after_minutes(minutes: u32) -> Session {
    let mut s = Session::with_default_roster("Team");
    start_match(&mut s);
    for _ in 0..minutes * 60 {
        tick(&mut s);
    }
    s
}

#[test]
fn prompt_lists_pitch_and_bench_with_minutes() {
    let s = session_after_minutes(3);
    let prompt = substitution_prompt(&s.players, s.match_state.elapsed_time);
    assert!(prompt.contains("Current Match Time: 3 minutes."));
    assert!(prompt.contains("- Jordan: total played 3m"));
    assert!(prompt.contains("- Skyler: total played 0m"));
    let bench = prompt.split("Bench Players:").nth(1).unwrap();
    assert!(bench.contains("Riley"));
    assert!(!bench.contains("Alex"));
}

#[tokio::test]
async fn generated_advice_is_passed_through() {
    let s = session_after_minutes(1);
    let provider = FakeProvider::replying("Sub Jordan for Skyler.");
    let advice = request_substitution_advice(&provider, &s.players, s.match_state.elapsed_time).await;
    assert_eq!(
        advice,
        Advice {
            text: "Sub Jordan for Skyler.".to_string(),
            source: AdviceSource::Generated,
        }
    );
    let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Current Match Time: 1 minutes."));
}

#[tokio::test]
async fn remote_failure_falls_back_to_error_message() {
    let s = session_after_minutes(2);
    let provider = FakeProvider::failing();
    let advice = request_substitution_advice(&provider, &s.players, 120).await;
    assert_eq!(advice.text, ADVICE_ERROR_FALLBACK);
    assert_eq!(advice.source, AdviceSource::Fallback);
    let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Current Match Time: 2 minutes."));
}

#[tokio::test]
async fn empty_reply_uses_observing_message() {
    let advice = request_substitution_advice(&FakeProvider::replying("  "), &[], 0).await;
    assert_eq!(advice.text, ADVICE_EMPTY_FALLBACK);
    assert_eq!(advice.source, AdviceSource::Fallback);
}

#[tokio::test]
async fn analysis_failure_falls_back() {
    let provider = FakeProvider::failing();
    let advice =
        request_source_analysis(&provider, SourceKind::Url, "https://example.org/table", None).await;
    assert_eq!(advice.text, ANALYSIS_ERROR_FALLBACK);
}

#[test]
fn sources_are_listed_once() {
    let uris = vec![
        "https://a.example".to_string(),
        "https://b.example".to_string(),
        "https://a.example".to_string(),
    ];
    let text = with_sources("Report".to_string(), &uris);
    assert_eq!(
        text,
        "Report\n\n**Sources:**\n- [https://a.example](https://a.example)\n- [https://b.example](https://b.example)"
    );
    assert_eq!(with_sources("Report".to_string(), &[]), "Report");
}
