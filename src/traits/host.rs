//! Host connection trait and the service-call shape it carries.
//!
//! A dashboard host exposes exactly one outbound operation to a card:
//! call a service (`domain.service`) with a target entity and an optional
//! numeric value. The host owns all real I/O; to the card a call is a
//! single synchronous hand-off with no acknowledgment.

use core::fmt;

use crate::entity::Category;

/// Host service names used by the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Service {
    /// `number.set_value`
    SetValue,
    /// `button.press`
    Press,
    /// `switch.toggle`
    Toggle,
}

impl Service {
    /// Service name as the host spells it.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Service::SetValue => "set_value",
            Service::Press => "press",
            Service::Toggle => "toggle",
        }
    }

    /// Entity domain this service is called on.
    #[inline]
    pub const fn domain(&self) -> Category {
        match self {
            Service::SetValue => Category::Number,
            Service::Press => Category::Button,
            Service::Toggle => Category::Switch,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound command: `dispatchCommand(domain, service, {entity_id, value?})`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceCall {
    /// Entity domain (`number`, `button`, `switch`).
    pub domain: Category,
    /// Service to invoke.
    pub service: Service,
    /// Target entity identifier.
    pub entity_id: String,
    /// Value for `set_value` calls.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub value: Option<f32>,
}

impl ServiceCall {
    /// `number.set_value` on `entity_id`.
    pub fn set_value(entity_id: impl Into<String>, value: f32) -> Self {
        Self {
            domain: Service::SetValue.domain(),
            service: Service::SetValue,
            entity_id: entity_id.into(),
            value: Some(value),
        }
    }

    /// `button.press` on `entity_id`.
    pub fn press(entity_id: impl Into<String>) -> Self {
        Self {
            domain: Service::Press.domain(),
            service: Service::Press,
            entity_id: entity_id.into(),
            value: None,
        }
    }

    /// `switch.toggle` on `entity_id`.
    pub fn toggle(entity_id: impl Into<String>) -> Self {
        Self {
            domain: Service::Toggle.domain(),
            service: Service::Toggle,
            entity_id: entity_id.into(),
            value: None,
        }
    }
}

impl fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({}", self.domain, self.service, self.entity_id)?;
        if let Some(value) = self.value {
            write!(f, ", value={value}")?;
        }
        f.write_str(")")
    }
}

/// Outbound connection to the dashboard host.
///
/// Implementations forward the call to whatever actually reaches the train
/// (a websocket to the home-automation server, a test recorder, ...).
///
/// # Example Implementation
///
/// ```rust
/// use lionel_train_card::traits::{HostConnection, ServiceCall};
///
/// struct PrintHost;
///
/// impl HostConnection for PrintHost {
///     type Error = ();
///
///     fn call_service(&mut self, call: &ServiceCall) -> Result<(), ()> {
///         let _ = call.to_string();
///         Ok(())
///     }
/// }
/// ```
pub trait HostConnection {
    /// Error type for a rejected hand-off.
    type Error: fmt::Debug;

    /// Hand one service call to the host.
    fn call_service(&mut self, call: &ServiceCall) -> Result<(), Self::Error>;
}

impl<H: HostConnection + ?Sized> HostConnection for &mut H {
    type Error = H::Error;

    fn call_service(&mut self, call: &ServiceCall) -> Result<(), Self::Error> {
        (**self).call_service(call)
    }
}
