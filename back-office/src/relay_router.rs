//! Relay event routing
//!
//! Turns inbound relay messages into operator alerts. No route touches
//! reservation state: the relay carries no ordering or delivery guarantee,
//! so events are advisory and the list only changes through an explicit
//! refresh once the operator acts.

use serde::Serialize;
use shared::relay::{EventKind, NotificationPayload, RelayMessage, ReservationEventPayload};

/// Screens an alert can offer to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    TableAssignment,
}

/// A user-visible alert derived from a relay event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiAlert {
    pub title: String,
    pub body: String,
    /// Offered navigation target; following it is the operator's choice
    pub navigate: Option<Screen>,
}

/// Route a relay message to an alert
///
/// Returns `None` for messages that carry nothing for the operator:
/// handshakes, unparseable payloads, and the order-status hook (consumed as
/// a no-op by this console).
pub fn route(msg: &RelayMessage) -> Option<UiAlert> {
    match msg.kind {
        EventKind::Notification => {
            let payload: NotificationPayload = parse(msg)?;
            Some(UiAlert {
                title: payload.title,
                body: payload.message,
                navigate: None,
            })
        }
        EventKind::ReservationCreated => {
            let payload: ReservationEventPayload = parse(msg)?;
            Some(UiAlert {
                title: "New reservation".to_string(),
                body: format!(
                    "New reservation from {} for {} guests, phone {}",
                    payload.customer_name, payload.number_of_people, payload.phone_number
                ),
                navigate: Some(Screen::TableAssignment),
            })
        }
        EventKind::AssignTableForReservation => {
            let payload: ReservationEventPayload = parse(msg)?;
            Some(UiAlert {
                title: "Table assignment needed".to_string(),
                body: format!(
                    "{} ({} guests, phone {}) is arriving soon, please pick a table",
                    payload.customer_name, payload.number_of_people, payload.phone_number
                ),
                navigate: Some(Screen::TableAssignment),
            })
        }
        // Hook kept for the order flow; nothing to show on this console
        EventKind::OrderItemUpdatedStatus => None,
        EventKind::Handshake => None,
    }
}

fn parse<T: serde::de::DeserializeOwned>(msg: &RelayMessage) -> Option<T> {
    match msg.parse_payload() {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!(kind = %msg.kind, error = %e, "Unparseable relay payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reservation_payload() -> ReservationEventPayload {
        ReservationEventPayload {
            id: "res-9".to_string(),
            customer_name: "Vu Van F".to_string(),
            phone_number: "0911222333".to_string(),
            number_of_people: 5,
        }
    }

    #[test]
    fn test_notification_routes_without_navigation() {
        let payload = NotificationPayload {
            id: 3,
            kind: 1,
            title: "Maintenance".to_string(),
            message: "Store closes early today".to_string(),
            payload: None,
            created_at: Utc::now(),
        };
        let alert = route(&RelayMessage::notification(&payload)).unwrap();

        assert_eq!(alert.title, "Maintenance");
        assert_eq!(alert.body, "Store closes early today");
        assert!(alert.navigate.is_none());
    }

    #[test]
    fn test_reservation_created_offers_navigation() {
        let alert = route(&RelayMessage::reservation_created(&reservation_payload())).unwrap();

        assert_eq!(alert.title, "New reservation");
        assert!(alert.body.contains("Vu Van F"));
        assert!(alert.body.contains('5'));
        assert_eq!(alert.navigate, Some(Screen::TableAssignment));
    }

    #[test]
    fn test_assign_table_offers_navigation() {
        let alert = route(&RelayMessage::assign_table(&reservation_payload())).unwrap();
        assert_eq!(alert.navigate, Some(Screen::TableAssignment));
    }

    #[test]
    fn test_order_status_is_a_no_op() {
        let msg = RelayMessage::new(EventKind::OrderItemUpdatedStatus, Vec::new());
        assert!(route(&msg).is_none());
    }

    #[test]
    fn test_garbage_payload_is_dropped() {
        let msg = RelayMessage::new(EventKind::ReservationCreated, b"not json".to_vec());
        assert!(route(&msg).is_none());
    }
}
