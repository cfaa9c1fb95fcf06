use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use common::types::EventDefinition;
use common::types::EventProperty;
use common::types::PropertyType;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::catalog::EventCatalogSource;
use crate::consumer::FilterConsumer;
use crate::document::FilterDocument;
use crate::error::FilterError;
use crate::error::Result;

pub fn sign_up_event() -> EventDefinition {
    EventDefinition::new("SignUp", vec![
        EventProperty::new("email", PropertyType::String),
        EventProperty::new("age", PropertyType::Number),
    ])
}

pub fn purchase_event() -> EventDefinition {
    EventDefinition::new("Purchase", vec![
        EventProperty::new("sku", PropertyType::String),
        EventProperty::new("amount", PropertyType::Number),
        EventProperty::new("currency", PropertyType::String),
    ])
}

pub fn test_catalog() -> Vec<EventDefinition> {
    vec![sign_up_event(), purchase_event()]
}

struct ScriptedResponse {
    delay: Duration,
    result: std::result::Result<Vec<EventDefinition>, String>,
}

/// Answers each fetch with the next queued response.
#[derive(Default)]
pub struct ScriptedCatalogSource {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    calls: AtomicUsize,
}

impl ScriptedCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, events: Vec<EventDefinition>) -> Self {
        self.delayed_ok(Duration::ZERO, events)
    }

    pub fn delayed_ok(self, delay: Duration, events: Vec<EventDefinition>) -> Self {
        self.push(delay, Ok(events))
    }

    pub fn err(self, msg: &str) -> Self {
        self.push(Duration::ZERO, Err(msg.to_string()))
    }

    fn push(
        mut self,
        delay: Duration,
        result: std::result::Result<Vec<EventDefinition>, String>,
    ) -> Self {
        self.responses
            .get_mut()
            .push_back(ScriptedResponse { delay, result });
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventCatalogSource for ScriptedCatalogSource {
    async fn fetch_catalog(&self) -> Result<Vec<EventDefinition>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().await.pop_front();
        let Some(resp) = next else {
            return Err(FilterError::Catalog("no scripted response left".to_string()));
        };

        if !resp.delay.is_zero() {
            sleep(resp.delay).await;
        }

        resp.result.map_err(FilterError::Catalog)
    }
}

/// Keeps every document it receives.
#[derive(Default)]
pub struct RecordingConsumer {
    docs: Mutex<Vec<FilterDocument>>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<FilterDocument> {
        self.docs.lock().await.clone()
    }
}

#[async_trait]
impl FilterConsumer for RecordingConsumer {
    async fn consume(&self, doc: &FilterDocument) -> Result<()> {
        self.docs.lock().await.push(doc.clone());

        Ok(())
    }
}
