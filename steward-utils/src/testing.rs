//! Test doubles for driving the engine without Discord.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use twilight_model::id::Id;

use crate::{
    clock::Clock,
    event::{ComponentEvent, ComponentKind},
    transport::{InteractionRef, MessagePayload, MessageRef, Modal, ResponseTarget, Transport},
};

pub(crate) const CHANNEL_ID: u64 = 4_000;

/// Clock that only moves when told to.
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Mutex::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Send(ResponseTarget, MessagePayload),
    Update(ResponseTarget, MessagePayload),
    Acknowledge(InteractionRef),
    Notify(InteractionRef, String),
    Modal(InteractionRef, Modal),
}

/// Transport that records every call and can be switched to fail.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
    next_message_id: AtomicU64,
}

impl RecordingTransport {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Notify(_, content) => Some(content),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("transport unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        target: &ResponseTarget,
        payload: &MessagePayload,
    ) -> anyhow::Result<Option<MessageRef>> {
        self.record(Call::Send(target.clone(), payload.clone()))?;
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;

        Ok(Some(MessageRef {
            channel_id: Id::new(CHANNEL_ID),
            message_id: Id::new(message_id),
        }))
    }

    async fn update(
        &self,
        target: &ResponseTarget,
        payload: &MessagePayload,
    ) -> anyhow::Result<()> {
        self.record(Call::Update(target.clone(), payload.clone()))
    }

    async fn acknowledge(&self, interaction: &InteractionRef) -> anyhow::Result<()> {
        self.record(Call::Acknowledge(interaction.clone()))
    }

    async fn notify(&self, interaction: &InteractionRef, content: &str) -> anyhow::Result<()> {
        self.record(Call::Notify(interaction.clone(), content.to_owned()))
    }

    async fn open_modal(&self, interaction: &InteractionRef, modal: &Modal) -> anyhow::Result<()> {
        self.record(Call::Modal(interaction.clone(), modal.clone()))
    }
}

pub(crate) fn interaction_ref(seq: u64) -> InteractionRef {
    InteractionRef {
        application_id: Id::new(1),
        interaction_id: Id::new(seq),
        token: format!("token-{seq}"),
    }
}

pub(crate) fn button(custom_id: &str, user_id: u64) -> ComponentEvent {
    ComponentEvent {
        interaction: interaction_ref(user_id),
        custom_id: custom_id.to_owned(),
        user_id: Some(user_id),
        guild_id: Some(9),
        message: None,
        kind: ComponentKind::Button,
    }
}

pub(crate) fn modal_submit(custom_id: &str, user_id: u64, page: &str) -> ComponentEvent {
    ComponentEvent {
        kind: ComponentKind::ModalSubmit {
            fields: vec![("page".to_owned(), page.to_owned())],
        },
        ..button(custom_id, user_id)
    }
}
