//! Postback data.
//!
//! Buttons carry their action as urlencoded key/value pairs, e.g.
//! `action=search&direction=outbound`. [`PostbackAction`] parses that
//! form and formats back to it through `Display`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;
use crate::notify::NotificationId;
use crate::settings::StopField;

/// Errors from parsing postback data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostbackError {
    #[error("malformed postback data: {0}")]
    Malformed(String),

    #[error("unknown postback action: {0:?}")]
    UnknownAction(String),

    #[error("postback action {action} is missing {param}")]
    MissingParam {
        action: &'static str,
        param: &'static str,
    },

    #[error("postback action {action} has invalid {param}: {value:?}")]
    InvalidParam {
        action: &'static str,
        param: &'static str,
        value: String,
    },
}

/// A button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostbackAction {
    /// Next buses with the user's stops.
    Search { direction: Direction },
    Settings,
    ShowSettings,
    /// List stops to pick a new value for `field`.
    ChangeStop { field: StopField },
    /// Store `stop` in `field`.
    SetStop { field: StopField, stop: String },
    TimeSearchMenu,
    /// Arrive-by search with the user's stops; the picker supplies the
    /// deadline.
    ArriveBy { direction: Direction },
    /// Reminder at the picked date-time.
    SetNotification { direction: Direction },
    ListNotifications,
    DeleteNotification { id: NotificationId },
    DeleteAllNotifications,
    CustomSearchMenu,
    CustomOutboundDeparture,
    CustomInboundArrival,
    /// Arrive-by search between explicit stops.
    CustomArriveBy {
        direction: Direction,
        departure: String,
        arrival: String,
    },
    Help,
}

/// Wire form. Field order fixes the order of formatted pairs.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Fields {
    action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    departure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arrival: Option<String>,
}

impl PostbackAction {
    /// The `action` value.
    pub fn name(&self) -> &'static str {
        match self {
            PostbackAction::Search { .. } => "search",
            PostbackAction::Settings => "settings",
            PostbackAction::ShowSettings => "show_settings",
            PostbackAction::ChangeStop { .. } => "change_stop",
            PostbackAction::SetStop { field, .. } => match field {
                StopField::OutboundDeparture => "set_outbound_departure",
                StopField::OutboundArrival => "set_outbound_arrival",
                StopField::InboundDeparture => "set_inbound_departure",
                StopField::InboundArrival => "set_inbound_arrival",
            },
            PostbackAction::TimeSearchMenu => "time_search_menu",
            PostbackAction::ArriveBy { .. } => "arrive_by",
            PostbackAction::SetNotification { .. } => "set_notification",
            PostbackAction::ListNotifications => "list_notifications",
            PostbackAction::DeleteNotification { .. } => "delete_notification",
            PostbackAction::DeleteAllNotifications => "delete_all_notifications",
            PostbackAction::CustomSearchMenu => "custom_search_menu",
            PostbackAction::CustomOutboundDeparture => "custom_outbound_departure",
            PostbackAction::CustomInboundArrival => "custom_inbound_arrival",
            PostbackAction::CustomArriveBy { .. } => "custom_arrive_by",
            PostbackAction::Help => "help",
        }
    }

    fn fields(&self) -> Fields {
        let mut fields = Fields {
            action: Some(self.name().to_string()),
            ..Fields::default()
        };
        match self {
            PostbackAction::Search { direction }
            | PostbackAction::ArriveBy { direction }
            | PostbackAction::SetNotification { direction } => {
                fields.direction = Some(direction.to_string());
            }
            PostbackAction::ChangeStop { field } => fields.target = Some(field.to_string()),
            PostbackAction::SetStop { stop, .. } => fields.stop = Some(stop.clone()),
            PostbackAction::DeleteNotification { id } => fields.id = Some(id.to_string()),
            PostbackAction::CustomArriveBy {
                direction,
                departure,
                arrival,
            } => {
                fields.direction = Some(direction.to_string());
                fields.departure = Some(departure.clone());
                fields.arrival = Some(arrival.clone());
            }
            _ => {}
        }
        fields
    }
}

fn required(
    value: Option<String>,
    action: &'static str,
    param: &'static str,
) -> Result<String, PostbackError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(PostbackError::MissingParam { action, param })
}

fn parsed<T: FromStr>(
    value: Option<String>,
    action: &'static str,
    param: &'static str,
) -> Result<T, PostbackError> {
    let raw = required(value, action, param)?;
    raw.parse().map_err(|_| PostbackError::InvalidParam {
        action,
        param,
        value: raw,
    })
}

impl FromStr for PostbackAction {
    type Err = PostbackError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let f: Fields =
            serde_urlencoded::from_str(data).map_err(|e| PostbackError::Malformed(e.to_string()))?;

        let action = f.action.unwrap_or_default();
        let set_stop = |field: StopField, name: &'static str| -> Result<Self, PostbackError> {
            Ok(PostbackAction::SetStop {
                field,
                stop: required(f.stop.clone(), name, "stop")?,
            })
        };

        let parsed_action = match action.as_str() {
            "search" => PostbackAction::Search {
                direction: parsed(f.direction, "search", "direction")?,
            },
            "settings" => PostbackAction::Settings,
            "show_settings" => PostbackAction::ShowSettings,
            "change_stop" => PostbackAction::ChangeStop {
                field: parsed(f.target, "change_stop", "target")?,
            },
            "set_outbound_departure" => {
                set_stop(StopField::OutboundDeparture, "set_outbound_departure")?
            }
            "set_outbound_arrival" => set_stop(StopField::OutboundArrival, "set_outbound_arrival")?,
            "set_inbound_departure" => {
                set_stop(StopField::InboundDeparture, "set_inbound_departure")?
            }
            "set_inbound_arrival" => set_stop(StopField::InboundArrival, "set_inbound_arrival")?,
            "time_search_menu" => PostbackAction::TimeSearchMenu,
            "arrive_by" => PostbackAction::ArriveBy {
                direction: parsed(f.direction, "arrive_by", "direction")?,
            },
            "set_notification" => PostbackAction::SetNotification {
                direction: parsed(f.direction, "set_notification", "direction")?,
            },
            "list_notifications" => PostbackAction::ListNotifications,
            "delete_notification" => PostbackAction::DeleteNotification {
                id: parsed(f.id, "delete_notification", "id")?,
            },
            "delete_all_notifications" => PostbackAction::DeleteAllNotifications,
            "custom_search_menu" => PostbackAction::CustomSearchMenu,
            "custom_outbound_departure" => PostbackAction::CustomOutboundDeparture,
            "custom_inbound_arrival" => PostbackAction::CustomInboundArrival,
            "custom_arrive_by" => PostbackAction::CustomArriveBy {
                direction: parsed(f.direction, "custom_arrive_by", "direction")?,
                departure: required(f.departure, "custom_arrive_by", "departure")?,
                arrival: required(f.arrival, "custom_arrive_by", "arrival")?,
            },
            "help" => PostbackAction::Help,
            _ => return Err(PostbackError::UnknownAction(action)),
        };

        Ok(parsed_action)
    }
}

impl fmt::Display for PostbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_urlencoded::to_string(self.fields()).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str) -> Result<PostbackAction, PostbackError> {
        data.parse()
    }

    #[test]
    fn parses_menu_data() {
        assert_eq!(
            parse("action=search&direction=outbound"),
            Ok(PostbackAction::Search {
                direction: Direction::Outbound
            })
        );
        assert_eq!(parse("action=settings"), Ok(PostbackAction::Settings));
        assert_eq!(
            parse("action=change_stop&target=inbound_arrival"),
            Ok(PostbackAction::ChangeStop {
                field: StopField::InboundArrival
            })
        );
        assert_eq!(
            parse("action=delete_notification&id=12"),
            Ok(PostbackAction::DeleteNotification {
                id: NotificationId(12)
            })
        );
    }

    #[test]
    fn parses_percent_encoded_stops() {
        assert_eq!(
            parse(
                "action=custom_arrive_by&direction=inbound\
                 &departure=%E4%BC%9A%E7%A4%BE&arrival=%E6%B1%9F%E7%86%8A"
            ),
            Ok(PostbackAction::CustomArriveBy {
                direction: Direction::Inbound,
                departure: "会社".into(),
                arrival: "江熊".into()
            })
        );
    }

    #[test]
    fn parses_raw_utf8_stops() {
        assert_eq!(
            parse("action=set_outbound_departure&stop=西条駅"),
            Ok(PostbackAction::SetStop {
                field: StopField::OutboundDeparture,
                stop: "西条駅".into()
            })
        );
    }

    #[test]
    fn formats_in_wire_order() {
        assert_eq!(
            PostbackAction::Search {
                direction: Direction::Inbound
            }
            .to_string(),
            "action=search&direction=inbound"
        );
        assert_eq!(
            PostbackAction::DeleteAllNotifications.to_string(),
            "action=delete_all_notifications"
        );
    }

    #[test]
    fn display_then_parse_is_identity() {
        let actions = [
            PostbackAction::ShowSettings,
            PostbackAction::SetStop {
                field: StopField::InboundDeparture,
                stop: "ががら口".into(),
            },
            PostbackAction::CustomArriveBy {
                direction: Direction::Outbound,
                departure: "西条 昭和町&1".into(),
                arrival: "会社".into(),
            },
            PostbackAction::SetNotification {
                direction: Direction::Inbound,
            },
        ];
        for action in actions {
            assert_eq!(parse(&action.to_string()), Ok(action));
        }
    }

    #[test]
    fn unknown_action() {
        assert_eq!(
            parse("action=dance"),
            Err(PostbackError::UnknownAction("dance".into()))
        );
        assert_eq!(parse(""), Err(PostbackError::UnknownAction(String::new())));
    }

    #[test]
    fn missing_and_invalid_params() {
        assert_eq!(
            parse("action=search"),
            Err(PostbackError::MissingParam {
                action: "search",
                param: "direction"
            })
        );
        assert_eq!(
            parse("action=set_inbound_arrival&stop="),
            Err(PostbackError::MissingParam {
                action: "set_inbound_arrival",
                param: "stop"
            })
        );
        assert_eq!(
            parse("action=arrive_by&direction=up"),
            Err(PostbackError::InvalidParam {
                action: "arrive_by",
                param: "direction",
                value: "up".into()
            })
        );
        assert!(matches!(
            parse("action=delete_notification&id=x"),
            Err(PostbackError::InvalidParam { .. })
        ));
    }

    #[test]
    fn error_display() {
        let err = PostbackError::MissingParam {
            action: "search",
            param: "direction",
        };
        assert_eq!(err.to_string(), "postback action search is missing direction");
    }
}
