//! Assistant session controller: owns the chat transcript and drives the
//! request/response exchange with the assistant endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use super::message::ChatMessage;
use super::suggestions::suggestions;
use crate::assistant::{AssistantEndpoint, AssistantRequest};
use crate::cases::{Case, Selection};
use crate::error::SendRejected;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// State changes pushed to front ends.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MessageAppended(ChatMessage),
    LoadingChanged(bool),
    UnreadChanged(u32),
}

#[derive(Debug, Default)]
struct SessionState {
    messages: Vec<ChatMessage>,
    visible: bool,
    unread: u32,
}

/// One analyst's chat with the assistant.
///
/// At most one query is in flight. The flag is claimed before the user
/// message is appended and released when the reply (or failure) has been
/// appended, or when the `send` future is dropped.
pub struct AssistantSession {
    endpoint: Arc<dyn AssistantEndpoint>,
    cases: Arc<Vec<Case>>,
    selection: Selection,
    state: RwLock<SessionState>,
    in_flight: AtomicBool,
    tx: broadcast::Sender<SessionEvent>,
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a> {
    session: &'a AssistantSession,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.in_flight.store(false, Ordering::Release);
        let _ = self.session.tx.send(SessionEvent::LoadingChanged(false));
    }
}

impl AssistantSession {
    pub fn new(
        endpoint: Arc<dyn AssistantEndpoint>,
        cases: Arc<Vec<Case>>,
        selection: Selection,
    ) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            endpoint,
            cases,
            selection,
            state: RwLock::new(SessionState::default()),
            in_flight: AtomicBool::new(false),
            tx,
        })
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Show the session: seed the welcome message on first open, clear unread.
    pub async fn open(&self) {
        let mut events = Vec::new();
        {
            let mut state = self.state.write().await;
            state.visible = true;
            if state.messages.is_empty() {
                let welcome = ChatMessage::welcome();
                state.messages.push(welcome.clone());
                events.push(SessionEvent::MessageAppended(welcome));
            }
            if state.unread != 0 {
                state.unread = 0;
                events.push(SessionEvent::UnreadChanged(0));
            }
        }
        debug!("Assistant session opened");
        for event in events {
            let _ = self.tx.send(event);
        }
    }

    /// Hide the session. The transcript is untouched.
    pub async fn close(&self) {
        self.state.write().await.visible = false;
        debug!("Assistant session closed");
    }

    /// Send a query and wait for it to settle.
    ///
    /// Returns the assistant message appended for it: the endpoint's reply,
    /// or an error-kind message when the request failed. Blank text and
    /// sends while another query is in flight are rejected without touching
    /// the transcript.
    pub async fn send(&self, text: &str) -> Result<ChatMessage, SendRejected> {
        if text.trim().is_empty() {
            debug!("Ignoring empty query");
            return Err(SendRejected::EmptyQuery);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Query rejected: another query is in flight");
            return Err(SendRejected::InFlight);
        }
        let _guard = InFlightGuard { session: self };
        let _ = self.tx.send(SessionEvent::LoadingChanged(true));

        let question = ChatMessage::user(text);
        self.state.write().await.messages.push(question.clone());
        let _ = self.tx.send(SessionEvent::MessageAppended(question));

        let selected = self.selection.borrow().clone();
        let request = AssistantRequest {
            query: text,
            cases: &self.cases,
            selected_case: selected.as_ref(),
        };

        info!(
            query = %text.chars().take(80).collect::<String>(),
            selected = selected.as_ref().map(|c| c.case_number.as_str()).unwrap_or("-"),
            "Sending assistant query"
        );

        let (answer, succeeded) = match self.endpoint.query(&request).await {
            Ok(reply) => {
                info!(
                    chars = reply.response.len(),
                    referenced = reply.metadata.as_ref().map_or(0, |m| m.case_ids.len()),
                    "Assistant replied"
                );
                (ChatMessage::reply(reply), true)
            }
            Err(e) => {
                warn!(error = %e, "Assistant query failed");
                (ChatMessage::failure(&e), false)
            }
        };

        let unread = {
            let mut state = self.state.write().await;
            state.messages.push(answer.clone());
            if succeeded && !state.visible {
                state.unread += 1;
                Some(state.unread)
            } else {
                None
            }
        };

        let _ = self.tx.send(SessionEvent::MessageAppended(answer.clone()));
        if let Some(unread) = unread {
            let _ = self.tx.send(SessionEvent::UnreadChanged(unread));
        }

        Ok(answer)
    }

    /// Suggested queries for the current cases and selection.
    pub fn suggestions(&self) -> Vec<String> {
        let selected = self.selection.borrow();
        suggestions(&self.cases, selected.as_ref())
    }

    /// Send the suggestion at `index` of [`Self::suggestions`] right away.
    pub async fn choose_suggestion(&self, index: usize) -> Result<ChatMessage, SendRejected> {
        let query = self
            .suggestions()
            .into_iter()
            .nth(index)
            .ok_or(SendRejected::NoSuchSuggestion { index })?;
        self.send(&query).await
    }

    /// Snapshot of the transcript in display order.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.read().await.messages.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.messages.is_empty()
    }

    /// Whether a query is awaiting its response.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn unread(&self) -> u32 {
        self.state.read().await.unread
    }

    pub async fn is_open(&self) -> bool {
        self.state.read().await.visible
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{Notify, watch};

    use super::*;
    use crate::assistant::AssistantReply;
    use crate::cases::demo_cases;
    use crate::error::AssistantError;
    use crate::session::message::{MessageKind, Role};

    /// Stub endpoint that records request bodies.
    struct StubEndpoint {
        outcome: fn() -> Result<AssistantReply, AssistantError>,
        seen: Mutex<Vec<serde_json::Value>>,
        gate: Option<Arc<Notify>>,
    }

    impl StubEndpoint {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                outcome: || Ok(AssistantReply::text("stub reply").with_case_ids(["FCRM-2025-001234"])),
                seen: Mutex::new(Vec::new()),
                gate: None,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                outcome: || {
                    Err(AssistantError::Status {
                        status: 500,
                        body: "boom".into(),
                    })
                },
                seen: Mutex::new(Vec::new()),
                gate: None,
            })
        }

        fn gated(gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                gate: Some(gate),
                ..Arc::into_inner(Self::ok()).unwrap()
            })
        }

        fn requests(&self) -> Vec<serde_json::Value> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssistantEndpoint for StubEndpoint {
        async fn query(
            &self,
            request: &AssistantRequest<'_>,
        ) -> Result<AssistantReply, AssistantError> {
            self.seen
                .lock()
                .unwrap()
                .push(serde_json::to_value(request).unwrap());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.outcome)()
        }
    }

    fn session_with(endpoint: Arc<StubEndpoint>) -> (Arc<AssistantSession>, watch::Sender<Option<Case>>) {
        let (tx, rx) = watch::channel(None);
        let session = AssistantSession::new(endpoint, Arc::new(demo_cases()), rx);
        (session, tx)
    }

    #[tokio::test]
    async fn open_seeds_welcome_once() {
        let (session, _tx) = session_with(StubEndpoint::ok());
        assert!(session.is_empty().await);

        session.open().await;
        let transcript = session.transcript().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].kind, MessageKind::Welcome);
        assert_eq!(transcript[0].role, Role::Assistant);

        session.close().await;
        session.open().await;
        assert_eq!(session.len().await, 1);
        assert!(session.is_open().await);
    }

    #[tokio::test]
    async fn blank_queries_are_rejected() {
        let endpoint = StubEndpoint::ok();
        let (session, _tx) = session_with(Arc::clone(&endpoint));

        assert_eq!(session.send("").await.unwrap_err(), SendRejected::EmptyQuery);
        assert_eq!(session.send("   ").await.unwrap_err(), SendRejected::EmptyQuery);
        assert!(session.is_empty().await);
        assert!(endpoint.requests().is_empty());
    }

    #[tokio::test]
    async fn send_appends_question_and_reply() {
        let endpoint = StubEndpoint::ok();
        let (session, _tx) = session_with(Arc::clone(&endpoint));
        session.open().await;

        let answer = session.send("Summarize all cases").await.unwrap();
        assert_eq!(answer.content, "stub reply");
        assert_eq!(answer.referenced_cases(), ["FCRM-2025-001234"]);

        let transcript = session.transcript().await;
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[1].content, "Summarize all cases");
        assert_eq!(transcript[2].kind, MessageKind::Reply);
        assert!(!session.is_loading());

        let requests = endpoint.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["query"], "Summarize all cases");
        assert_eq!(requests[0]["cases"].as_array().unwrap().len(), 3);
        assert!(requests[0]["selectedCase"].is_null());
    }

    #[tokio::test]
    async fn selection_is_read_at_send_time() {
        let endpoint = StubEndpoint::ok();
        let (session, tx) = session_with(Arc::clone(&endpoint));

        tx.send_replace(Some(demo_cases().remove(2)));
        session.send("Why?").await.unwrap();

        tx.send_replace(None);
        session.send("And now?").await.unwrap();

        let requests = endpoint.requests();
        assert_eq!(requests[0]["selectedCase"]["case_number"], "FCRM-2025-001256");
        assert!(requests[1]["selectedCase"].is_null());
    }

    #[tokio::test]
    async fn failure_becomes_error_message() {
        let (session, _tx) = session_with(StubEndpoint::failing());

        let answer = session.send("test").await.unwrap();
        assert!(answer.is_error());
        assert_eq!(answer.role, Role::Assistant);
        assert!(answer.content.contains("HTTP 500"));

        assert_eq!(session.len().await, 2);
        assert!(!session.is_loading());
        // Failures do not count as unread replies.
        assert_eq!(session.unread().await, 0);

        // The session stays usable.
        assert!(session.send("again").await.is_ok());
        assert_eq!(session.len().await, 4);
    }

    #[tokio::test]
    async fn unread_counts_replies_while_hidden() {
        let (session, _tx) = session_with(StubEndpoint::ok());

        session.send("one").await.unwrap();
        session.send("two").await.unwrap();
        assert_eq!(session.unread().await, 2);

        session.open().await;
        assert_eq!(session.unread().await, 0);

        session.send("three").await.unwrap();
        assert_eq!(session.unread().await, 0);

        session.close().await;
        session.send("four").await.unwrap();
        assert_eq!(session.unread().await, 1);
    }

    #[tokio::test]
    async fn second_send_while_in_flight_is_rejected() {
        let gate = Arc::new(Notify::new());
        let endpoint = StubEndpoint::gated(Arc::clone(&gate));
        let (session, _tx) = session_with(Arc::clone(&endpoint));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.send("first").await })
        };

        // Wait until the first request reaches the endpoint.
        tokio::time::timeout(Duration::from_secs(2), async {
            while endpoint.requests().is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(session.is_loading());
        assert_eq!(session.send("second").await.unwrap_err(), SendRejected::InFlight);
        assert_eq!(session.len().await, 1);

        gate.notify_one();
        let answer = first.await.unwrap().unwrap();
        assert_eq!(answer.content, "stub reply");
        assert_eq!(session.len().await, 2);
        assert_eq!(endpoint.requests().len(), 1);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn dropped_send_releases_in_flight() {
        let gate = Arc::new(Notify::new());
        let (session, _tx) = session_with(StubEndpoint::gated(gate));

        let pending = tokio::time::timeout(Duration::from_millis(50), session.send("stalls")).await;
        assert!(pending.is_err());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn events_follow_state_changes() {
        let (session, _tx) = session_with(StubEndpoint::ok());
        let mut rx = session.subscribe();

        session.send("hello").await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event {
                SessionEvent::MessageAppended(m) => format!("message:{:?}", m.kind),
                SessionEvent::LoadingChanged(b) => format!("loading:{b}"),
                SessionEvent::UnreadChanged(n) => format!("unread:{n}"),
            });
        }
        assert_eq!(
            kinds,
            [
                "loading:true",
                "message:Query",
                "message:Reply",
                "unread:1",
                "loading:false",
            ]
        );
    }

    #[tokio::test]
    async fn choose_suggestion_sends_it() {
        let endpoint = StubEndpoint::ok();
        let (session, tx) = session_with(Arc::clone(&endpoint));
        tx.send_replace(Some(demo_cases().remove(0)));

        let expected = session.suggestions()[1].clone();
        assert_eq!(expected, "Why was Global Innovations B.V. flagged?");

        session.choose_suggestion(1).await.unwrap();
        assert_eq!(endpoint.requests()[0]["query"], expected);

        assert_eq!(
            session.choose_suggestion(6).await.unwrap_err(),
            SendRejected::NoSuchSuggestion { index: 6 }
        );
    }
}
