//! Turn sequencing: resolve the input, ask for a graph and a summary,
//! commit to the session, then write to the store.

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use graphwise_llm::SummaryDecoder;
use graphwise_persist::SessionStore;
use graphwise_types::{
    ComposeMode, ExpansionPolicy, GraphDocument, OrchestratorConfig, PersistIntentKind,
    SessionRecord, SummaryPolicy, TurnEvent,
};
use tokio::sync::mpsc;

use crate::collaborators::{
    DocumentExtractor, GraphEndpoint, ResourceResolver, SummaryEndpoint, TurnInput, TurnRequest,
};
use crate::composer::{compose, compose_summary, PromptMode};
use crate::error::{Result, TurnError};
use crate::session::{PersistIntent, SharedSession, TurnTicket};
use crate::validator::{check_superset, validate};

pub type EventSender = mpsc::Sender<TurnEvent>;

/// Result of a committed turn
#[derive(Debug, Clone)]
pub struct TurnOutput {
    pub turn: u64,
    pub mode: ComposeMode,
    pub prompt: String,
    pub graph: GraphDocument,
    /// Summary produced by this turn, if the policy asked for one
    pub summary: Option<String>,
    pub intent: PersistIntentKind,
    /// False for guests and when no store is configured
    pub persisted: bool,
}

/// Sequences user turns against a [`SharedSession`].
///
/// The session lock is held only to begin a turn and to commit its result;
/// model requests run without it.
#[derive(Clone)]
pub struct Orchestrator {
    graph_endpoint: Arc<dyn GraphEndpoint>,
    summary_endpoint: Arc<dyn SummaryEndpoint>,
    resolver: Option<Arc<dyn ResourceResolver>>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
    store: Option<Arc<dyn SessionStore>>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        graph_endpoint: Arc<dyn GraphEndpoint>,
        summary_endpoint: Arc<dyn SummaryEndpoint>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            graph_endpoint,
            summary_endpoint,
            resolver: None,
            extractor: None,
            store: None,
            config,
        }
    }

    pub(crate) fn with_collaborators(
        mut self,
        resolver: Option<Arc<dyn ResourceResolver>>,
        extractor: Option<Arc<dyn DocumentExtractor>>,
        store: Option<Arc<dyn SessionStore>>,
    ) -> Self {
        self.resolver = resolver;
        self.extractor = extractor;
        self.store = store;
        self
    }

    pub fn builder() -> crate::builder::OrchestratorBuilder {
        crate::builder::OrchestratorBuilder::new()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Spawn a turn in the background, return its event receiver
    pub fn spawn_submit(
        &self,
        session: SharedSession,
        request: TurnRequest,
    ) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel(1000);
        let orchestrator = self.clone();

        tokio::spawn(async move {
            // Failures are reported on the channel as TurnFailed
            let _ = orchestrator.submit(&session, request, &tx).await;
        });

        rx
    }

    /// Run one turn to completion, emitting progress on `events`
    pub async fn submit(
        &self,
        session: &SharedSession,
        request: TurnRequest,
        events: &EventSender,
    ) -> Result<TurnOutput> {
        if let TurnInput::Text(text) = &request.input {
            if text.trim().is_empty() {
                let err = TurnError::EmptyPrompt;
                emit(events, TurnEvent::TurnFailed { turn: 0, message: err.to_string() }).await;
                return Err(err);
            }
        }

        let ticket = session.write().await.begin_turn();
        let turn = ticket.turn;
        let start_time = Instant::now();

        tracing::info!(
            turn,
            mode = ?ticket.mode(),
            user_id = request.user_id.as_deref().unwrap_or("guest"),
            "Turn started"
        );
        emit(events, TurnEvent::TurnStarted { turn, mode: ticket.mode() }).await;

        match self.execute_turn(session, &ticket, request, events).await {
            Ok(output) => {
                let total_duration_ms = start_time.elapsed().as_millis() as u64;
                tracing::info!(
                    turn,
                    nodes = output.graph.nodes.len(),
                    links = output.graph.links.len(),
                    duration_ms = total_duration_ms,
                    "Turn completed"
                );
                emit(events, TurnEvent::TurnCompleted { turn, total_duration_ms }).await;
                Ok(output)
            }
            Err(e) => {
                match &e {
                    TurnError::Superseded { .. } => tracing::info!(turn, "Turn superseded"),
                    other => tracing::warn!(turn, error = %other, "Turn failed"),
                }
                emit(events, TurnEvent::TurnFailed { turn, message: e.to_string() }).await;
                Err(e)
            }
        }
    }

    async fn execute_turn(
        &self,
        session: &SharedSession,
        ticket: &TurnTicket,
        request: TurnRequest,
        events: &EventSender,
    ) -> Result<TurnOutput> {
        let prompt = self.effective_prompt(request.input).await?;
        let mode = PromptMode::from(ticket.prior.as_ref());
        let messages = compose(mode, &prompt);

        let want_summary = match self.config.summary_policy {
            SummaryPolicy::FirstTurnOnly => ticket.first_turn,
            SummaryPolicy::EveryTurn => true,
        };

        let summary_task = async {
            if want_summary {
                Some(self.run_summary(&prompt, events).await)
            } else {
                None
            }
        };
        let (graph_result, summary_result) =
            tokio::join!(self.graph_endpoint.generate_graph(messages), summary_task);

        let graph = validate(&graph_result?)?;
        if let (ExpansionPolicy::RequireSuperset, Some(prior)) =
            (self.config.expansion_policy, ticket.prior.as_ref())
        {
            check_superset(prior, &graph)?;
        }
        if graph.root_count() != 1 {
            tracing::warn!(
                turn = ticket.turn,
                roots = graph.root_count(),
                "Graph does not have exactly one root node"
            );
        }
        let summary = summary_result.transpose()?;

        let intent = session
            .write()
            .await
            .apply(ticket, &prompt, graph.clone(), summary.clone())?;

        emit(
            events,
            TurnEvent::GraphUpdated {
                turn: ticket.turn,
                nodes: graph.nodes.len(),
                links: graph.links.len(),
            },
        )
        .await;

        // The session keeps the committed graph even if this write fails;
        // an unconfirmed Create is issued again by the next turn
        let persisted = self.persist(request.user_id.as_deref(), &intent).await?;
        if persisted {
            if let PersistIntent::Create { created_at, .. } = &intent {
                session.write().await.mark_persisted(*created_at);
            }
            emit(
                events,
                TurnEvent::Persisted { turn: ticket.turn, intent: intent.kind() },
            )
            .await;
        }

        Ok(TurnOutput {
            turn: ticket.turn,
            mode: mode.kind(),
            prompt,
            graph,
            summary,
            intent: intent.kind(),
            persisted,
        })
    }

    /// Free text as-is, locators resolved, documents extracted
    async fn effective_prompt(&self, input: TurnInput) -> Result<String> {
        let prompt = match input {
            TurnInput::Text(text) => match &self.resolver {
                Some(resolver) if resolver.is_locator(&text) => {
                    tracing::debug!(locator = %text.trim(), "Resolving locator");
                    resolver.resolve(text.trim()).await?
                }
                _ => text,
            },
            TurnInput::Document(document) => {
                let extractor = self.extractor.as_ref().ok_or_else(|| {
                    TurnError::Extraction("no document extractor configured".to_string())
                })?;
                extractor.extract(&document).await?
            }
        };

        let prompt = prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(TurnError::EmptyPrompt);
        }
        Ok(prompt)
    }

    async fn run_summary(&self, prompt: &str, events: &EventSender) -> Result<String> {
        let mut stream = self
            .summary_endpoint
            .stream_summary(compose_summary(prompt))
            .await?;
        let mut decoder = SummaryDecoder::new();

        while let Some(chunk) = stream.next().await {
            for delta in decoder.feed(&chunk?) {
                emit(events, TurnEvent::SummaryDelta { content: delta }).await;
            }
        }

        if decoder.skipped_lines() > 0 {
            tracing::warn!(skipped = decoder.skipped_lines(), "Summary stream had malformed lines");
        }
        Ok(decoder.finish())
    }

    /// Perform the store write for a committed turn; `Ok(false)` when skipped
    async fn persist(&self, user_id: Option<&str>, intent: &PersistIntent) -> Result<bool> {
        let (Some(store), Some(user_id)) = (&self.store, user_id) else {
            return Ok(false);
        };

        match intent {
            PersistIntent::Create {
                created_at,
                prompt,
                summary,
                graph,
            } => {
                store
                    .insert(user_id, prompt, summary, graph, *created_at)
                    .await?;
            }
            PersistIntent::Update {
                created_at,
                graph,
                summary,
            } => {
                store.update(user_id, *created_at, graph).await?;
                if let Some(summary) = summary {
                    store.update_summary(user_id, *created_at, summary).await?;
                }
            }
        }

        tracing::debug!(user_id, intent = ?intent.kind(), "Session persisted");
        Ok(true)
    }

    /// Stored sessions of `user_id`, newest first
    pub async fn history(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<SessionRecord>> {
        match &self.store {
            Some(store) => Ok(store.query_history(user_id, limit).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn load(&self, session: &SharedSession, record: &SessionRecord) -> Result<()> {
        session.write().await.load(record)?;
        tracing::info!(created_at = %record.created_at, "Session loaded from history");
        Ok(())
    }

    pub async fn reset(&self, session: &SharedSession) {
        session.write().await.reset();
        tracing::debug!("Session reset");
    }
}

async fn emit(events: &EventSender, event: TurnEvent) {
    // A closed receiver only means nobody is rendering this turn
    let _ = events.send(event).await;
}
