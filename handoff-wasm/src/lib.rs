//! WASM bridge between the clinical assistant engine and the dashboard's
//! JavaScript front end.

use handoff_assistant::{ConversationSession, SessionState, SubmitOutcome};
use handoff_core::{AssistantConfig, AssistantError, ChatMessage, PatientRecord};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsAssistantConfig {
    #[serde(default)]
    response_delay_ms: Option<u64>,
    #[serde(default)]
    auto_close_delay_ms: Option<u64>,
}

impl From<JsAssistantConfig> for AssistantConfig {
    fn from(cfg: JsAssistantConfig) -> Self {
        let mut base = AssistantConfig::default();
        if let Some(delay) = cfg.response_delay_ms {
            base.response_delay_ms = delay;
        }
        if let Some(delay) = cfg.auto_close_delay_ms {
            base.auto_close_delay_ms = delay;
        }
        base
    }
}

/// Result of `AssistantSession.submit`, shaped for the chat view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsSubmitResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<ChatMessage>,
    /// Set when the caller should close the dialog after this delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_close_delay_ms: Option<u64>,
}

fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn read_patient(patient: JsValue) -> Result<PatientRecord, JsValue> {
    let value = from_value::<serde_json::Value>(patient)
        .map_err(|err| JsValue::from_str(&format!("could not read patient JSON: {err}")))?;
    handoff_assistant::parse_patient_value(&value).map_err(format_assistant_error)
}

fn read_config(config: Option<JsValue>) -> Result<AssistantConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsAssistantConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("could not read config: {err}")))?;
            Ok(AssistantConfig::from(cfg))
        }
        _ => Ok(AssistantConfig::default()),
    }
}

fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("could not serialize result: {err}")))
}

fn format_assistant_error(err: AssistantError) -> JsValue {
    JsValue::from_str(&format!("Assistant error: {err}"))
}

/// Stateless reply to one message. `undefined` for blank input.
#[wasm_bindgen]
pub fn assistant_reply(patient: JsValue, message: &str) -> Result<Option<String>, JsValue> {
    init();
    let patient = read_patient(patient)?;
    Ok(handoff_assistant::respond(message, &patient))
}

#[wasm_bindgen]
pub fn welcome_message(patient: JsValue) -> Result<String, JsValue> {
    init();
    let patient = read_patient(patient)?;
    Ok(handoff_assistant::welcome_message(&patient))
}

#[wasm_bindgen]
pub fn vitals_alerts(patient: JsValue) -> Result<JsValue, JsValue> {
    init();
    let patient = read_patient(patient)?;
    serialize(&handoff_assistant::vitals_alerts(&patient))
}

#[wasm_bindgen]
pub fn classify_message(message: &str) -> Result<JsValue, JsValue> {
    serialize(&handoff_assistant::classify(message))
}

/// A chat dialog bound to one patient. The JS side owns the timers: it
/// waits `responseDelayMs` before showing a reply and calls `close()`
/// once `autoCloseDelayMs` has passed after a farewell.
#[wasm_bindgen]
pub struct AssistantSession {
    inner: ConversationSession,
}

#[wasm_bindgen]
impl AssistantSession {
    #[wasm_bindgen(constructor)]
    pub fn new(patient: JsValue, config: Option<JsValue>) -> Result<AssistantSession, JsValue> {
        init();
        let patient = read_patient(patient)?;
        let config = read_config(config)?;
        let inner = ConversationSession::open(patient, config).map_err(format_assistant_error)?;
        Ok(Self { inner })
    }

    pub fn submit(&mut self, message: &str) -> Result<JsValue, JsValue> {
        let patient = self.inner.patient().clone();
        let outcome = self
            .inner
            .submit(&patient, message)
            .map_err(format_assistant_error)?;

        let result = match outcome {
            SubmitOutcome::Ignored => JsSubmitResult {
                status: "ignored",
                message: None,
                auto_close_delay_ms: None,
            },
            SubmitOutcome::Replied(reply) => JsSubmitResult {
                status: "replied",
                message: Some(reply),
                auto_close_delay_ms: None,
            },
            SubmitOutcome::Closing(farewell) => JsSubmitResult {
                status: "closing",
                message: Some(farewell),
                auto_close_delay_ms: Some(self.inner.config().auto_close_delay_ms),
            },
        };
        serialize(&result)
    }

    pub fn messages(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.messages())
    }

    /// Feed an updated record for the bound patient; returns new alerts.
    #[wasm_bindgen(js_name = vitalsChanged)]
    pub fn vitals_changed(&mut self, patient: JsValue) -> Result<JsValue, JsValue> {
        let patient = read_patient(patient)?;
        let alerts = self
            .inner
            .on_vitals_changed(&patient)
            .map_err(format_assistant_error)?;
        serialize(&alerts)
    }

    pub fn rebind(&mut self, patient: JsValue) -> Result<bool, JsValue> {
        let patient = read_patient(patient)?;
        self.inner.rebind(patient).map_err(format_assistant_error)
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    pub fn state(&self) -> String {
        match self.inner.state() {
            SessionState::Open => "open",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
        }
        .to_string()
    }

    #[wasm_bindgen(getter, js_name = responseDelayMs)]
    pub fn response_delay_ms(&self) -> u64 {
        self.inner.config().response_delay_ms
    }
}
