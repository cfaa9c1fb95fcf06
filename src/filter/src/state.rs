use std::sync::Arc;

use common::types::EventDefinition;
use common::types::EventProperty;
use common::types::PropertyType;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::catalog::EventCatalogSource;
use crate::command::FilterCommand;
use crate::consumer::FilterConsumer;
use crate::document::FilterDocument;
use crate::error::FilterError;
use crate::error::Result;
use crate::input::sanitize_range;
use crate::input::sanitize_single;
use crate::input::RangePart;
use crate::operators::find_option;
use crate::operators::operator_options;
use crate::operators::AttributeOperator;
use crate::operators::OperatorOption;
use crate::operators::ValueRequirement;
use crate::types::AttributeFilter;
use crate::types::AttributeValue;
use crate::types::FilterStep;
use crate::types::RangeValue;

const CHANGES_CAPACITY: usize = 64;

/// Emitted to subscribers after the state changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateChange {
    Steps,
    Loading,
    Catalog,
}

#[derive(Debug, Default)]
struct Sequence(u64);

impl Sequence {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    fn reset(&mut self) {
        self.0 = 0;
    }
}

struct CatalogFetch {
    handle: JoinHandle<()>,
    rx: oneshot::Receiver<Result<Vec<EventDefinition>>>,
}

impl CatalogFetch {
    // the receiver is dropped with self, so a late result has nowhere to go
    fn cancel(self) {
        self.handle.abort();
    }
}

/// Steps of a customer filter together with the event catalog they are built against.
///
/// All mutations are synchronous. The only asynchronous part is the catalog fetch,
/// which runs as a spawned task; its result is applied by [`FilterState::wait_for_catalog`]
/// or [`FilterState::poll_catalog`]. Starting a new fetch cancels the previous one, so a
/// stale catalog never overwrites a newer request.
pub struct FilterState {
    source: Arc<dyn EventCatalogSource>,
    consumer: Arc<dyn FilterConsumer>,
    events: Vec<EventDefinition>,
    loading: bool,
    loading_error: bool,
    steps: Vec<FilterStep>,
    step_seq: Sequence,
    attribute_seq: Sequence,
    initialized: bool,
    fetch: Option<CatalogFetch>,
    changes: broadcast::Sender<StateChange>,
}

impl FilterState {
    pub fn new(source: Arc<dyn EventCatalogSource>, consumer: Arc<dyn FilterConsumer>) -> Self {
        let (changes, _) = broadcast::channel(CHANGES_CAPACITY);
        FilterState {
            source,
            consumer,
            events: vec![],
            loading: false,
            loading_error: false,
            steps: vec![],
            step_seq: Sequence::default(),
            attribute_seq: Sequence::default(),
            initialized: false,
            fetch: None,
            changes,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn loading_error(&self) -> bool {
        self.loading_error
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    pub fn step(&self, step_id: u64) -> Option<&FilterStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch.is_some()
    }

    /// False only while the filter is a single step with nothing selected.
    pub fn can_discard(&self) -> bool {
        match self.steps.as_slice() {
            [step] => !step.is_empty(),
            _ => true,
        }
    }

    /// Starts the model. Must run inside a tokio runtime for the catalog fetch to start.
    /// Calling it again does nothing.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        self.step_seq.reset();
        self.attribute_seq.reset();
        self.steps = vec![self.new_step()];
        self.notify(StateChange::Steps);

        self.fetch_events();
    }

    /// Cancels the in-flight catalog fetch, if any.
    pub fn stop(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            debug!("cancelling in-flight catalog fetch");
            fetch.cancel();
            self.loading = false;
            self.notify(StateChange::Loading);
        }
    }

    pub fn fetch_events(&mut self) {
        if !self.initialized {
            debug!("catalog fetch requested before initialization");
            return;
        }

        if let Some(prev) = self.fetch.take() {
            debug!("superseding in-flight catalog fetch");
            prev.cancel();
        }

        self.loading = true;
        self.loading_error = false;
        self.notify(StateChange::Loading);

        let rt = match Handle::try_current() {
            Ok(rt) => rt,
            Err(err) => {
                self.settle(Err(FilterError::Catalog(format!(
                    "no runtime to fetch the catalog on: {err}"
                ))));
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let source = self.source.clone();
        let handle = rt.spawn(async move {
            let res = source.fetch_catalog().await;
            // the receiver is gone when the fetch was superseded
            let _ = tx.send(res);
        });

        self.fetch = Some(CatalogFetch { handle, rx });
    }

    /// Waits for the in-flight catalog fetch and applies its outcome.
    pub async fn wait_for_catalog(&mut self) {
        let Some(fetch) = self.fetch.as_mut() else {
            return;
        };

        let res = match (&mut fetch.rx).await {
            Ok(res) => res,
            Err(_) => Err(FilterError::Catalog(
                "catalog fetch ended without a result".to_string(),
            )),
        };
        self.fetch = None;
        self.settle(res);
    }

    /// Applies the outcome of the in-flight fetch if it is ready. Returns true if it was.
    pub fn poll_catalog(&mut self) -> bool {
        let Some(fetch) = self.fetch.as_mut() else {
            return false;
        };

        let res = match fetch.rx.try_recv() {
            Ok(res) => res,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(FilterError::Catalog(
                "catalog fetch ended without a result".to_string(),
            )),
        };
        self.fetch = None;
        self.settle(res);

        true
    }

    fn settle(&mut self, res: Result<Vec<EventDefinition>>) {
        match res {
            Ok(events) => {
                info!("loaded {} event definitions", events.len());
                self.events = events;
            }
            Err(err) => {
                warn!("catalog fetch failed: {err}");
                self.loading_error = true;
                self.events.clear();
            }
        }

        self.loading = false;
        self.notify(StateChange::Catalog);
    }

    pub fn add_step(&mut self) -> u64 {
        let step = self.new_step();
        let id = step.id;
        self.steps.push(step);
        self.notify(StateChange::Steps);

        id
    }

    /// Appends a copy of the step with fresh step and attribute ids.
    pub fn duplicate_step(&mut self, step_id: u64) -> Option<u64> {
        let Some(source) = self.steps.iter().find(|s| s.id == step_id) else {
            debug!("step {step_id} not found");
            return None;
        };

        let id = self.step_seq.next();
        let attribute_seq = &mut self.attribute_seq;
        let clone = FilterStep {
            id,
            event_type: source.event_type.clone(),
            attributes: source
                .attributes
                .iter()
                .map(|attr| attr.duplicate(attribute_seq.next()))
                .collect(),
        };
        self.steps.push(clone);
        self.notify(StateChange::Steps);

        Some(id)
    }

    pub fn remove_step(&mut self, step_id: u64) {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != step_id);
        if self.steps.len() == before {
            debug!("step {step_id} not found");
            return;
        }

        if self.steps.is_empty() {
            let step = self.new_step();
            self.steps.push(step);
        }
        self.notify(StateChange::Steps);
    }

    /// Selecting a different event drops the step's attributes.
    /// An empty event type clears the selection.
    pub fn on_event_select(&mut self, step_id: u64, event_type: Option<String>) {
        let event_type = event_type.filter(|e| !e.is_empty());
        let Some(step) = self.steps.iter_mut().find(|s| s.id == step_id) else {
            debug!("step {step_id} not found");
            return;
        };

        if step.event_type != event_type {
            step.attributes.clear();
        }
        step.event_type = event_type;
        self.notify(StateChange::Steps);
    }

    /// Adds an empty attribute. Steps without an event can't have attributes.
    pub fn add_attribute(&mut self, step_id: u64) -> Option<u64> {
        let Some(step) = self.steps.iter_mut().find(|s| s.id == step_id) else {
            debug!("step {step_id} not found");
            return None;
        };
        if step.event_type.as_deref().map_or(true, str::is_empty) {
            debug!("step {step_id} has no event, not adding attribute");
            return None;
        }

        let id = self.attribute_seq.next();
        step.attributes.push(AttributeFilter::new(id));
        self.notify(StateChange::Steps);

        Some(id)
    }

    pub fn remove_attribute(&mut self, step_id: u64, attribute_id: u64) {
        let Some(step) = self.steps.iter_mut().find(|s| s.id == step_id) else {
            debug!("step {step_id} not found");
            return;
        };

        let before = step.attributes.len();
        step.attributes.retain(|a| a.id != attribute_id);
        if step.attributes.len() == before {
            debug!("attribute {attribute_id} not found in step {step_id}");
            return;
        }
        self.notify(StateChange::Steps);
    }

    /// Binds the attribute to a property of the step's event. Operator and value are reset.
    /// An empty property name unbinds it.
    pub fn on_attribute_property_change(
        &mut self,
        step_id: u64,
        attribute_id: u64,
        property: Option<String>,
    ) {
        let property = property.filter(|p| !p.is_empty());
        let events = &self.events;
        let Some(step) = self.steps.iter_mut().find(|s| s.id == step_id) else {
            debug!("step {step_id} not found");
            return;
        };

        let property_type =
            resolve_property_type(events, step.event_type.as_deref(), property.as_deref());
        let Some(attr) = step.attribute_mut(attribute_id) else {
            debug!("attribute {attribute_id} not found in step {step_id}");
            return;
        };

        attr.property = property;
        attr.property_type = property_type;
        attr.operator = None;
        attr.value = AttributeValue::Empty;
        self.notify(StateChange::Steps);
    }

    /// Sets the operator and resets the value to what the operator expects: an empty
    /// range for range operators, nothing otherwise.
    pub fn on_attribute_operator_change(
        &mut self,
        step_id: u64,
        attribute_id: u64,
        operator: Option<AttributeOperator>,
    ) {
        let Some(attr) = self.attribute_mut(step_id, attribute_id) else {
            return;
        };

        let value = match find_option(attr.property_type, operator) {
            Some(option) if option.value_requirement == ValueRequirement::Range => {
                AttributeValue::Range(RangeValue::default())
            }
            _ => AttributeValue::Empty,
        };

        attr.operator = operator;
        attr.value = value;
        self.notify(StateChange::Steps);
    }

    /// Stores the value as given.
    pub fn on_attribute_value_change(
        &mut self,
        step_id: u64,
        attribute_id: u64,
        value: AttributeValue,
    ) {
        let Some(attr) = self.attribute_mut(step_id, attribute_id) else {
            return;
        };

        attr.value = value;
        self.notify(StateChange::Steps);
    }

    /// Back to a single empty step. Ids keep counting.
    pub fn discard_filters(&mut self) {
        self.steps = vec![self.new_step()];
        self.notify(StateChange::Steps);
    }

    pub fn to_document(&self) -> FilterDocument {
        FilterDocument::from_steps(&self.steps)
    }

    /// Builds the normalized document and hands it to the consumer.
    pub async fn apply_filters(&self) -> Result<FilterDocument> {
        let doc = self.to_document();
        info!(
            "applying filters: {} steps, {} attributes",
            doc.steps.len(),
            doc.attributes_count()
        );
        self.consumer.consume(&doc).await?;

        Ok(doc)
    }

    /// Properties of the step's selected event.
    pub fn available_properties(&self, step_id: u64) -> &[EventProperty] {
        self.step(step_id)
            .and_then(|s| s.event_type.as_deref())
            .and_then(|typ| self.events.iter().find(|e| e.typ == typ))
            .map(|e| e.properties.as_slice())
            .unwrap_or_default()
    }

    /// Catalog events whose type contains `query`, ignoring case.
    pub fn search_events(&self, query: &str) -> Vec<&EventDefinition> {
        let query = query.to_lowercase();
        self.events
            .iter()
            .filter(|e| e.typ.to_lowercase().contains(&query))
            .collect()
    }

    pub fn search_properties(&self, step_id: u64, query: &str) -> Vec<&EventProperty> {
        let query = query.to_lowercase();
        self.available_properties(step_id)
            .iter()
            .filter(|p| p.property.to_lowercase().contains(&query))
            .collect()
    }

    pub fn operator_options(&self, typ: Option<PropertyType>) -> &'static [OperatorOption] {
        operator_options(typ)
    }

    /// Resolved operator option of an attribute; decides which value input applies.
    pub fn attribute_option(
        &self,
        step_id: u64,
        attribute_id: u64,
    ) -> Option<&'static OperatorOption> {
        self.step(step_id)?.attribute(attribute_id)?.option()
    }

    pub fn dispatch(&mut self, cmd: FilterCommand) {
        debug!("dispatching {cmd:?}");
        match cmd {
            FilterCommand::AddStep => {
                self.add_step();
            }
            FilterCommand::DuplicateStep { step_id } => {
                self.duplicate_step(step_id);
            }
            FilterCommand::RemoveStep { step_id } => self.remove_step(step_id),
            FilterCommand::SelectEvent {
                step_id,
                event_type,
            } => self.on_event_select(step_id, event_type),
            FilterCommand::AddAttribute { step_id } => {
                self.add_attribute(step_id);
            }
            FilterCommand::RemoveAttribute {
                step_id,
                attribute_id,
            } => self.remove_attribute(step_id, attribute_id),
            FilterCommand::ChangeProperty {
                step_id,
                attribute_id,
                property,
            } => self.on_attribute_property_change(step_id, attribute_id, property),
            FilterCommand::ChangeOperator {
                step_id,
                attribute_id,
                operator,
            } => self.on_attribute_operator_change(step_id, attribute_id, operator),
            FilterCommand::ChangeValue {
                step_id,
                attribute_id,
                value,
            } => self.on_attribute_value_change(step_id, attribute_id, value),
            FilterCommand::EnterValue {
                step_id,
                attribute_id,
                raw,
                part,
            } => self.enter_value(step_id, attribute_id, &raw, part),
            FilterCommand::Discard => self.discard_filters(),
        }
    }

    fn enter_value(
        &mut self,
        step_id: u64,
        attribute_id: u64,
        raw: &str,
        part: Option<RangePart>,
    ) {
        let Some(attr) = self.step(step_id).and_then(|s| s.attribute(attribute_id)) else {
            debug!("attribute {attribute_id} not found in step {step_id}");
            return;
        };
        let Some(option) = attr.option() else {
            debug!("attribute {attribute_id} has no operator, ignoring entered value");
            return;
        };

        let value = match (option.value_requirement, part) {
            (ValueRequirement::None, _) => {
                debug!("operator {} takes no value", option.value);
                return;
            }
            (ValueRequirement::Single, _) => sanitize_single(raw, option.input_type),
            (ValueRequirement::Range, Some(part)) => sanitize_range(&attr.value, part, raw),
            (ValueRequirement::Range, None) => {
                debug!("operator {} needs a range part", option.value);
                return;
            }
        };

        self.on_attribute_value_change(step_id, attribute_id, value);
    }

    fn attribute_mut(&mut self, step_id: u64, attribute_id: u64) -> Option<&mut AttributeFilter> {
        let Some(step) = self.steps.iter_mut().find(|s| s.id == step_id) else {
            debug!("step {step_id} not found");
            return None;
        };
        let attr = step.attribute_mut(attribute_id);
        if attr.is_none() {
            debug!("attribute {attribute_id} not found in step {step_id}");
        }

        attr
    }

    fn new_step(&mut self) -> FilterStep {
        FilterStep::new(self.step_seq.next())
    }

    fn notify(&self, change: StateChange) {
        // no subscribers is fine
        let _ = self.changes.send(change);
    }
}

impl Drop for FilterState {
    fn drop(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.cancel();
        }
    }
}

fn resolve_property_type(
    events: &[EventDefinition],
    event_type: Option<&str>,
    property: Option<&str>,
) -> Option<PropertyType> {
    let (event_type, property) = (event_type?, property?);
    if event_type.is_empty() || property.is_empty() {
        return None;
    }
    events
        .iter()
        .find(|e| e.typ == event_type)?
        .property(property)
        .map(|p| p.typ)
}
