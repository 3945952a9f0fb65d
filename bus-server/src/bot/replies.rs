//! Reply builders.
//!
//! Every reply is plain text; menus attach quick-reply buttons whose
//! postback data round-trips through [`PostbackAction`].

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::postback::PostbackAction;
use crate::domain::{ClockTime, Direction};
use crate::messaging::{Action, MAX_QUICK_REPLY_ITEMS, Message};
use crate::notify::Notification;
use crate::query::TripResult;
use crate::settings::{StopField, StopSettings};

const WEEKDAYS: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// 「10月20日」
pub fn month_day(date: NaiveDate) -> String {
    format!("{}月{}日", date.month(), date.day())
}

/// 「10月20日(火)」
pub fn month_day_weekday(date: NaiveDate) -> String {
    format!(
        "{}({})",
        month_day(date),
        WEEKDAYS[date.weekday().num_days_from_monday() as usize]
    )
}

fn postback(label: &str, action: PostbackAction) -> Action {
    Action::postback(label, action.to_string())
}

fn picker(label: &str, action: PostbackAction) -> Action {
    Action::datetime_picker(label, action.to_string())
}

fn main_buttons() -> Vec<Action> {
    vec![
        postback(
            "🚌 行く",
            PostbackAction::Search {
                direction: Direction::Outbound,
            },
        ),
        postback(
            "🏠 帰る",
            PostbackAction::Search {
                direction: Direction::Inbound,
            },
        ),
        postback("⏰ 時刻指定", PostbackAction::TimeSearchMenu),
        postback("⚙️ 設定", PostbackAction::Settings),
    ]
}

fn badge(index: usize) -> &'static str {
    match index {
        0 => "先発",
        1 => "次発",
        _ => "次々発",
    }
}

/// Upcoming buses for a stop pair.
pub fn schedule(
    direction: Direction,
    departure: &str,
    arrival: &str,
    trips: &[TripResult],
) -> Message {
    let title = match direction {
        Direction::Outbound => "🚌 行きのバス",
        Direction::Inbound => "🏠 帰りのバス",
    };

    let mut text = format!("{title}\n{departure} → {arrival}");

    match trips.first() {
        None => text.push_str("\n本日のバスは終了しました"),
        Some(first) => {
            let schedule_type = if first.is_holiday { "土日祝" } else { "平日" };
            text.push_str(&format!("\n【{schedule_type}ダイヤ】"));
            for (i, trip) in trips.iter().enumerate() {
                text.push_str(&format!(
                    "\n{} {} → {}",
                    badge(i),
                    trip.departure_time,
                    trip.arrival_time
                ));
                if let Some(gate) = &trip.gate {
                    text.push_str(&format!("  🚏 {gate}"));
                }
            }
        }
    }

    Message::with_buttons(text, main_buttons())
}

pub fn welcome() -> Message {
    Message::with_buttons(
        "🚌 バス時刻案内へようこそ！\nボタンを押してバス時刻を確認できます。",
        main_buttons(),
    )
}

pub fn menu_hint() -> Message {
    Message::text("下のメニューから操作できます 👇")
}

pub fn main_menu() -> Message {
    Message::with_buttons("🚌 どちらのバスを検索しますか？", main_buttons())
}

pub fn settings_menu() -> Message {
    let mut buttons: Vec<Action> = StopField::ALL
        .into_iter()
        .map(|field| {
            postback(
                &format!("{}を変更", field.label()),
                PostbackAction::ChangeStop { field },
            )
        })
        .collect();
    buttons.push(postback("現在の設定を確認", PostbackAction::ShowSettings));
    buttons.push(postback("❓ ヘルプ", PostbackAction::Help));

    Message::with_buttons("⚙️ 設定\n変更したい項目を選んでください", buttons)
}

pub fn current_settings(stops: &StopSettings) -> Message {
    Message::text(format!(
        "📍 現在の設定\n\n🚌 行き\n  乗車: {}\n  降車: {}\n\n🏠 帰り\n  乗車: {}\n  降車: {}",
        stops.outbound_departure, stops.outbound_arrival, stops.inbound_departure, stops.inbound_arrival
    ))
}

/// Pick a stop for `field`.
pub fn stop_select(field: StopField, stops: &[String]) -> Message {
    let icon = match field.direction() {
        Direction::Outbound => "🚌",
        Direction::Inbound => "🏠",
    };
    let buttons = stops
        .iter()
        .map(|stop| {
            Action::postback_echo(
                stop,
                PostbackAction::SetStop {
                    field,
                    stop: stop.clone(),
                }
                .to_string(),
            )
        })
        .collect();

    Message::with_buttons(
        format!("{icon} {}を選んでください", field.label()),
        buttons,
    )
}

pub fn stop_changed(field: StopField, stop: &str) -> Message {
    Message::text(format!("✅ {}を「{stop}」に変更しました！", field.label()))
}

pub fn time_search_menu() -> Message {
    Message::with_buttons(
        "⏰ 日時指定検索\n到着したい日時を指定して検索できます",
        vec![
            picker(
                "🚌 行き（設定のバス停）",
                PostbackAction::ArriveBy {
                    direction: Direction::Outbound,
                },
            ),
            picker(
                "🏠 帰り（設定のバス停）",
                PostbackAction::ArriveBy {
                    direction: Direction::Inbound,
                },
            ),
            postback("📍 バス停を指定して検索", PostbackAction::CustomSearchMenu),
            picker(
                "🔔 リマインダーを設定",
                PostbackAction::SetNotification {
                    direction: Direction::Inbound,
                },
            ),
            postback("📋 リマインダー一覧", PostbackAction::ListNotifications),
        ],
    )
}

pub fn help() -> Message {
    Message::with_buttons(
        "❓ 使い方ガイド\n\n\
         📱 メニュー\n\
         • 行き：次の行きバスを表示\n\
         • 帰り：次の帰りバスを表示\n\
         • 時刻指定：到着時刻で検索\n\
         • 設定：バス停変更など\n\n\
         💬 テキストでも操作可能\n\
         • 「行く」「出発」→ 行きバス\n\
         • 「帰る」「帰り」→ 帰りバス\n\
         • 「9時に会社に着きたい」→ 到着時刻で検索\n\
         • 「18時に会社を出たい」→ 出発時刻で検索\n\
         • 「設定」→ 設定メニュー\n\n\
         🔔 リマインダー\n\
         時刻指定メニューから設定した日時に通知を送信します。",
        main_buttons(),
    )
}

pub fn notification_list(notifications: &[Notification]) -> Message {
    if notifications.is_empty() {
        return Message::text("🔔 通知一覧\n設定されている通知はありません");
    }

    let mut text = String::from("🔔 通知一覧\n設定されている通知");
    let mut buttons = Vec::with_capacity(notifications.len().min(MAX_QUICK_REPLY_ITEMS));

    for n in notifications {
        let when = format!(
            "{} {}",
            month_day(n.notify_at.date()),
            ClockTime::from(n.notify_at)
        );
        text.push_str(&format!("\n{} {when}", n.direction.label()));
        // One slot stays free for delete-all; later reminders get a button
        // once earlier ones are gone
        if buttons.len() < MAX_QUICK_REPLY_ITEMS - 1 {
            buttons.push(postback(
                &format!("削除 {when}"),
                PostbackAction::DeleteNotification { id: n.id },
            ));
        }
    }
    buttons.push(postback(
        "🗑️ すべて削除",
        PostbackAction::DeleteAllNotifications,
    ));

    Message::with_buttons(text, buttons)
}

pub fn custom_search_menu() -> Message {
    Message::with_buttons(
        "📍 バス停を指定して検索\nまず方向を選んでください",
        vec![
            postback(
                "🚌 行き（出発駅を選択）",
                PostbackAction::CustomOutboundDeparture,
            ),
            postback(
                "🏠 帰り（到着駅を選択）",
                PostbackAction::CustomInboundArrival,
            ),
        ],
    )
}

/// Pick where to board; the destination is the fixed terminal.
pub fn custom_departure_select(stops: &[String], terminal: &str) -> Message {
    let buttons = stops
        .iter()
        .map(|stop| {
            picker(
                stop,
                PostbackAction::CustomArriveBy {
                    direction: Direction::Outbound,
                    departure: stop.clone(),
                    arrival: terminal.to_string(),
                },
            )
        })
        .collect();
    Message::with_buttons(
        format!("📍 乗車バス停を選択\n到着: {terminal}（固定）"),
        buttons,
    )
}

/// Pick where to alight; the origin is the fixed terminal.
pub fn custom_arrival_select(stops: &[String], terminal: &str) -> Message {
    let buttons = stops
        .iter()
        .map(|stop| {
            picker(
                stop,
                PostbackAction::CustomArriveBy {
                    direction: Direction::Inbound,
                    departure: terminal.to_string(),
                    arrival: stop.clone(),
                },
            )
        })
        .collect();
    Message::with_buttons(
        format!("📍 降車バス停を選択\n乗車: {terminal}（固定）"),
        buttons,
    )
}

/// Header above arrive-by results. `date` is omitted for same-day text
/// queries.
pub fn arrive_by_header(date: Option<NaiveDate>, deadline: ClockTime) -> Message {
    match date {
        Some(date) => Message::text(format!(
            "⏰ {} {deadline}までに到着するバス:",
            month_day_weekday(date)
        )),
        None => Message::text(format!("{deadline}までに到着するバス:")),
    }
}

/// Nothing arrives in time. `arrival` names the stop for custom searches.
pub fn arrive_by_none(date: Option<NaiveDate>, deadline: ClockTime, arrival: Option<&str>) -> Message {
    let when = match date {
        Some(date) => format!("{} {deadline}", month_day_weekday(date)),
        None => deadline.to_string(),
    };
    let target = arrival.map(|a| format!("{a}に")).unwrap_or_default();
    Message::text(format!("{when}までに{target}到着するバスは見つかりませんでした。"))
}

/// Confirmation for a reminder set by typing a time.
pub fn notification_set(notify_at: NaiveDateTime) -> Message {
    Message::text(format!(
        "⏰ {} {} に通知をセットしました！",
        month_day(notify_at.date()),
        ClockTime::from(notify_at)
    ))
}

/// Confirmation for a reminder set from the date-time picker.
pub fn reminder_set(notify_at: NaiveDateTime) -> Message {
    Message::text(format!(
        "🔔 {} {} にリマインダーをセットしました！",
        month_day(notify_at.date()),
        ClockTime::from(notify_at)
    ))
}

pub fn choose_datetime() -> Message {
    Message::text("日時を選択してください")
}

pub fn past_datetime() -> Message {
    Message::text("過去の日時は設定できません。")
}

pub fn notification_deleted() -> Message {
    Message::text("🗑️ 通知を削除しました")
}

pub fn notification_not_found() -> Message {
    Message::text("通知が見つかりませんでした")
}

pub fn all_notifications_deleted() -> Message {
    Message::text("🗑️ すべての通知を削除しました")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationId, NotificationStatus};

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn trip(dep: &str, arr: &str, gate: Option<&str>, is_holiday: bool) -> TripResult {
        TripResult {
            departure_time: t(dep),
            arrival_time: t(arr),
            gate: gate.map(str::to_string),
            is_holiday,
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn japanese_dates() {
        assert_eq!(month_day(date(10, 20)), "10月20日");
        assert_eq!(month_day_weekday(date(10, 20)), "10月20日(火)");
        assert_eq!(month_day_weekday(date(10, 18)), "10月18日(日)");
    }

    #[test]
    fn schedule_lists_trips_with_badges() {
        let msg = schedule(
            Direction::Outbound,
            "西条駅",
            "会社",
            &[
                trip("07:30", "07:58", Some("1番のりば"), false),
                trip("07:45", "08:13", None, false),
                trip("08:00", "08:28", None, false),
            ],
        );
        assert_eq!(
            msg.body(),
            "🚌 行きのバス\n西条駅 → 会社\n【平日ダイヤ】\n\
             先発 07:30 → 07:58  🚏 1番のりば\n\
             次発 07:45 → 08:13\n\
             次々発 08:00 → 08:28"
        );
        assert!(msg.actions().count() > 0);
    }

    #[test]
    fn schedule_marks_holiday_timetable() {
        let msg = schedule(
            Direction::Inbound,
            "会社",
            "西条駅",
            &[trip("17:00", "17:28", None, true)],
        );
        assert!(msg.body().starts_with("🏠 帰りのバス"));
        assert!(msg.body().contains("【土日祝ダイヤ】"));
    }

    #[test]
    fn empty_schedule_says_service_is_over() {
        let msg = schedule(Direction::Outbound, "西条駅", "会社", &[]);
        assert!(msg.body().ends_with("本日のバスは終了しました"));
    }

    #[test]
    fn settings_menu_offers_every_field() {
        let data: Vec<String> = settings_menu()
            .actions()
            .map(|a| a.data().to_string())
            .collect();
        for field in StopField::ALL {
            let expected = format!("action=change_stop&target={field}");
            assert!(data.contains(&expected), "missing {expected}");
        }
        assert!(data.contains(&"action=show_settings".to_string()));
    }

    #[test]
    fn current_settings_text() {
        let msg = current_settings(&StopSettings::default());
        assert_eq!(
            msg.body(),
            "📍 現在の設定\n\n🚌 行き\n  乗車: 西条駅\n  降車: 会社\n\n🏠 帰り\n  乗車: 会社\n  降車: 西条駅"
        );
    }

    #[test]
    fn stop_select_buttons_set_the_field() {
        let stops = vec!["西条駅".to_string(), "江熊".to_string()];
        let msg = stop_select(StopField::OutboundDeparture, &stops);
        assert_eq!(msg.body(), "🚌 行きの乗車バス停を選んでください");

        let actions: Vec<&Action> = msg.actions().collect();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].label(), "江熊");
        assert_eq!(
            actions[1].data().parse::<PostbackAction>().unwrap(),
            PostbackAction::SetStop {
                field: StopField::OutboundDeparture,
                stop: "江熊".into()
            }
        );
    }

    #[test]
    fn stop_changed_text() {
        assert_eq!(
            stop_changed(StopField::InboundArrival, "図書館前").body(),
            "✅ 帰りの降車バス停を「図書館前」に変更しました！"
        );
    }

    #[test]
    fn notification_list_empty_and_filled() {
        assert!(
            notification_list(&[])
                .body()
                .contains("設定されている通知はありません")
        );

        let n = Notification {
            id: NotificationId(7),
            user_id: "U1".into(),
            direction: Direction::Inbound,
            notify_at: date(10, 20).and_hms_opt(18, 5, 0).unwrap(),
            one_time: true,
            status: NotificationStatus::Pending,
        };
        let msg = notification_list(&[n]);
        assert!(msg.body().contains("🏠 帰り 10月20日 18:05"));
        let data: Vec<&str> = msg.actions().map(Action::data).collect();
        assert_eq!(
            data,
            ["action=delete_notification&id=7", "action=delete_all_notifications"]
        );
    }

    #[test]
    fn long_notification_list_keeps_delete_all() {
        let pending: Vec<Notification> = (1..=15)
            .map(|i| Notification {
                id: NotificationId(i),
                user_id: "U1".into(),
                direction: Direction::Outbound,
                notify_at: date(10, 20).and_hms_opt(6, i as u32, 0).unwrap(),
                one_time: true,
                status: NotificationStatus::Pending,
            })
            .collect();

        let msg = notification_list(&pending);
        assert!(msg.body().contains("🚌 行き 10月20日 06:15"));

        let data: Vec<&str> = msg.actions().map(Action::data).collect();
        assert_eq!(data.len(), MAX_QUICK_REPLY_ITEMS);
        assert_eq!(data.first(), Some(&"action=delete_notification&id=1"));
        assert_eq!(data[MAX_QUICK_REPLY_ITEMS - 2], "action=delete_notification&id=12");
        assert_eq!(data.last(), Some(&"action=delete_all_notifications"));
    }

    #[test]
    fn custom_selects_fix_the_terminal() {
        let stops = vec!["江熊".to_string()];
        let msg = custom_departure_select(&stops, "会社");
        let action = msg.actions().next().unwrap();
        assert!(matches!(action, Action::DatetimePicker { .. }));
        assert_eq!(
            action.data().parse::<PostbackAction>().unwrap(),
            PostbackAction::CustomArriveBy {
                direction: Direction::Outbound,
                departure: "江熊".into(),
                arrival: "会社".into()
            }
        );

        let msg = custom_arrival_select(&stops, "会社");
        assert!(msg.body().contains("乗車: 会社（固定）"));
    }

    #[test]
    fn arrive_by_texts() {
        assert_eq!(
            arrive_by_header(None, t("09:00")).body(),
            "09:00までに到着するバス:"
        );
        assert_eq!(
            arrive_by_header(Some(date(10, 20)), t("09:00")).body(),
            "⏰ 10月20日(火) 09:00までに到着するバス:"
        );
        assert_eq!(
            arrive_by_none(None, t("06:00"), None).body(),
            "06:00までに到着するバスは見つかりませんでした。"
        );
        assert_eq!(
            arrive_by_none(Some(date(10, 20)), t("06:00"), Some("会社")).body(),
            "10月20日(火) 06:00までに会社に到着するバスは見つかりませんでした。"
        );
    }

    #[test]
    fn reminder_confirmations() {
        let at = date(10, 20).and_hms_opt(7, 0, 0).unwrap();
        assert_eq!(
            notification_set(at).body(),
            "⏰ 10月20日 07:00 に通知をセットしました！"
        );
        assert_eq!(
            reminder_set(at).body(),
            "🔔 10月20日 07:00 にリマインダーをセットしました！"
        );
    }
}
