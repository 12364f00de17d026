//! Projects the calendar state and the booking list into a view model that a
//! front end can draw without knowing any booking rules.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::db::BookingStore;
use crate::models::{Booking, CalendarState, CalendarView, ContactDetails, Modal, SlotTime};
use crate::services::availability::{
    available_count, check_slot, closed_day_message, is_fully_booked, time_slots, SlotStatus,
};
use crate::services::dates::{
    add_days, capitalise, end_of_week, first_of_month, format_card_date, format_day_label,
    format_day_month, format_day_month_year, format_full_date, format_month_year,
    is_business_day, is_same_month, start_of_day, start_of_week, DAY_HEADERS,
};

const MONTH_GRID_CELLS: i64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarViewModel {
    pub view: CalendarView,
    pub range_label: String,
    /// Weekday column headers; only filled in month view.
    pub day_labels: Vec<&'static str>,
    pub body: CalendarBody,
    pub slot_panel: SlotPanel,
    pub bookings: Vec<BookingCard>,
    pub modal: ModalView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarBody {
    Month {
        cells: Vec<MonthCell>,
    },
    Week {
        days: Vec<WeekDay>,
        rows: Vec<WeekRow>,
    },
    Day {
        title: String,
        summary: String,
        slots: Vec<SlotView>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub day_number: u32,
    pub closed: bool,
    pub inactive: bool,
    pub today: bool,
    pub selected: bool,
    pub fully_booked: bool,
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Booked,
    Available,
    Full,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub time: SlotTime,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotView {
    pub date: NaiveDate,
    pub time: SlotTime,
    pub status: SlotStatus,
    pub status_text: &'static str,
    pub booked: bool,
    pub past: bool,
    pub selected: bool,
    pub disabled: bool,
    pub aria_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotPanel {
    pub title: String,
    pub slots: Vec<SlotView>,
    pub closed_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingCard {
    pub id: String,
    pub title: String,
    pub time: SlotTime,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalView {
    Closed,
    Form {
        slot_label: Option<String>,
        prefill: ContactDetails,
        editing: bool,
    },
    Confirmation {
        message: String,
    },
}

pub fn render(
    state: &CalendarState,
    store: &BookingStore,
    now: NaiveDateTime,
) -> CalendarViewModel {
    let body = match state.view {
        CalendarView::Month => month_body(state, store, now),
        CalendarView::Week => week_body(state, store, now),
        CalendarView::Day => day_body(state, store, now),
    };
    let day_labels = if state.view == CalendarView::Month {
        DAY_HEADERS.to_vec()
    } else {
        Vec::new()
    };

    CalendarViewModel {
        view: state.view,
        range_label: range_label(state),
        day_labels,
        body,
        slot_panel: slot_panel(state, store, now),
        bookings: booking_cards(state, store),
        modal: modal_view(state),
    }
}

pub fn range_label(state: &CalendarState) -> String {
    match state.view {
        CalendarView::Month => capitalise(&format_month_year(state.current_date)),
        CalendarView::Week => format!(
            "{} - {}",
            format_day_month(start_of_week(state.current_date)),
            format_day_month_year(end_of_week(state.current_date))
        ),
        CalendarView::Day => capitalise(&format_full_date(state.current_date)),
    }
}

fn month_body(state: &CalendarState, store: &BookingStore, now: NaiveDateTime) -> CalendarBody {
    let first = first_of_month(state.current_date);
    let start = start_of_week(first);
    let today = start_of_day(now);

    let cells = (0..MONTH_GRID_CELLS)
        .map(|offset| {
            let date = add_days(start, offset);
            let business = is_business_day(date);
            let booked = store.count_on(date);

            let mut badges = Vec::new();
            if booked > 0 {
                badges.push(Badge {
                    kind: BadgeKind::Booked,
                    text: format!("{booked} bokad"),
                });
            }
            badges.push(if !business {
                Badge {
                    kind: BadgeKind::Closed,
                    text: "Stängt".to_string(),
                }
            } else {
                match available_count(store, date) {
                    0 => Badge {
                        kind: BadgeKind::Full,
                        text: "Fullbokad".to_string(),
                    },
                    free => Badge {
                        kind: BadgeKind::Available,
                        text: format!("{free} ledig"),
                    },
                }
            });

            MonthCell {
                date,
                day_number: date.day(),
                closed: !business,
                inactive: !is_same_month(date, first),
                today: date == today,
                selected: date == state.selected_date,
                fully_booked: is_fully_booked(store, date),
                badges,
            }
        })
        .collect();

    CalendarBody::Month { cells }
}

fn business_days_of_week(date: NaiveDate) -> Vec<NaiveDate> {
    let start = start_of_week(date);
    (0..7)
        .map(|offset| add_days(start, offset))
        .filter(|d| is_business_day(*d))
        .collect()
}

fn week_body(state: &CalendarState, store: &BookingStore, now: NaiveDateTime) -> CalendarBody {
    let dates = business_days_of_week(state.current_date);

    let days = dates
        .iter()
        .map(|date| WeekDay {
            date: *date,
            label: capitalise(&format_day_label(*date)),
        })
        .collect();

    let rows = time_slots()
        .iter()
        .map(|time| WeekRow {
            time: *time,
            slots: dates
                .iter()
                .map(|date| slot_view(state, store, *date, *time, now))
                .collect(),
        })
        .collect();

    CalendarBody::Week { days, rows }
}

fn day_body(state: &CalendarState, store: &BookingStore, now: NaiveDateTime) -> CalendarBody {
    let date = state.selected_date;
    CalendarBody::Day {
        title: capitalise(&format_full_date(date)),
        summary: free_slots_summary(available_count(store, date)),
        slots: slots_for(state, store, date, now),
    }
}

/// `1 ledig tid`, `5 lediga tider`
pub fn free_slots_summary(count: usize) -> String {
    if count == 1 {
        "1 ledig tid".to_string()
    } else {
        format!("{count} lediga tider")
    }
}

fn slot_panel(state: &CalendarState, store: &BookingStore, now: NaiveDateTime) -> SlotPanel {
    let date = state.selected_date;
    let title = capitalise(&format_full_date(date));

    if !is_business_day(date) {
        return SlotPanel {
            title,
            slots: Vec::new(),
            closed_message: Some(closed_day_message()),
        };
    }

    SlotPanel {
        title,
        slots: slots_for(state, store, date, now),
        closed_message: None,
    }
}

fn slots_for(
    state: &CalendarState,
    store: &BookingStore,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<SlotView> {
    time_slots()
        .iter()
        .map(|time| slot_view(state, store, date, *time, now))
        .collect()
}

fn slot_view(
    state: &CalendarState,
    store: &BookingStore,
    date: NaiveDate,
    time: SlotTime,
    now: NaiveDateTime,
) -> SlotView {
    let check = check_slot(store, date, time, state.booking_in_edit.as_ref(), now);
    let status = check.status();

    SlotView {
        date,
        time,
        status,
        status_text: status.label(),
        booked: check.booked,
        past: check.past,
        selected: state.is_pending(date, time),
        disabled: !check.is_available(),
        aria_label: format!(
            "{} {} {}",
            status.label(),
            time,
            capitalise(&format_full_date(date))
        ),
    }
}

fn booking_cards(state: &CalendarState, store: &BookingStore) -> Vec<BookingCard> {
    let editing = state.editing_id();
    store
        .get_all()
        .into_iter()
        .map(|b| card(b, editing))
        .collect()
}

fn card(booking: Booking, editing: Option<&str>) -> BookingCard {
    BookingCard {
        title: capitalise(&format_card_date(booking.date)),
        editing: editing == Some(booking.id.as_str()),
        time: booking.time,
        id: booking.id,
        name: booking.name,
        email: booking.email,
        phone: booking.phone,
    }
}

fn modal_view(state: &CalendarState) -> ModalView {
    match &state.modal {
        Modal::Closed => ModalView::Closed,
        Modal::Form => ModalView::Form {
            slot_label: state.pending_slot.map(|slot| {
                format!("{} ⋅ {}", capitalise(&format_full_date(slot.date)), slot.time)
            }),
            prefill: state
                .booking_in_edit
                .as_ref()
                .map(Booking::contact)
                .unwrap_or_default(),
            editing: state.booking_in_edit.is_some(),
        },
        Modal::Confirmation { message } => ModalView::Confirmation {
            message: message.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PendingSlot;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> SlotTime {
        s.parse().unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn state(view: CalendarView, current: &str, selected: &str) -> CalendarState {
        CalendarState {
            view,
            current_date: date(current),
            selected_date: date(selected),
            pending_slot: None,
            booking_in_edit: None,
            modal: Modal::Closed,
        }
    }

    fn badge(kind: BadgeKind, text: &str) -> Badge {
        Badge {
            kind,
            text: text.to_string(),
        }
    }

    fn add(store: &mut BookingStore, d: &str, t: &str, name: &str) -> Booking {
        store.add(Booking::new(
            date(d),
            time(t),
            ContactDetails {
                name: name.to_string(),
                email: "a@x.se".to_string(),
                phone: "070".to_string(),
            },
            chrono::Utc::now(),
        ))
    }

    #[test]
    fn test_range_labels() {
        let month = state(CalendarView::Month, "2024-01-01", "2024-01-10");
        assert_eq!(range_label(&month), "Januari 2024");

        let week = state(CalendarView::Week, "2024-01-01", "2024-01-03");
        assert_eq!(range_label(&week), "1 jan. - 7 jan. 2024");

        let day = state(CalendarView::Day, "2024-01-03", "2024-01-03");
        assert_eq!(range_label(&day), "Onsdag 3 januari 2024");
    }

    #[test]
    fn test_month_grid() {
        let mut store = BookingStore::in_memory();
        add(&mut store, "2024-01-02", "09:00", "Ann");
        add(&mut store, "2024-01-02", "09:30", "Bo");

        let vm = render(
            &state(CalendarView::Month, "2024-02-01", "2024-02-05"),
            &store,
            at("2024-02-02 10:00"),
        );
        assert_eq!(vm.day_labels, DAY_HEADERS.to_vec());

        let CalendarBody::Month { cells } = vm.body else {
            panic!("expected month body");
        };
        assert_eq!(cells.len(), 42);
        // February 2024 starts on a Thursday
        assert_eq!(cells[0].date, date("2024-01-29"));
        assert!(cells[0].inactive);
        assert!(!cells[3].inactive);
        assert_eq!(cells[3].day_number, 1);
        assert!(cells[4].today);
        assert!(cells[7].selected);

        let saturday = &cells[5];
        assert!(saturday.closed);
        assert_eq!(saturday.badges, vec![badge(BadgeKind::Closed, "Stängt")]);

        let free = &cells[3];
        assert_eq!(free.badges, vec![badge(BadgeKind::Available, "17 ledig")]);
    }

    #[test]
    fn test_month_badges_for_booked_and_full_days() {
        let mut store = BookingStore::in_memory();
        add(&mut store, "2024-01-02", "09:00", "Ann");
        for t in time_slots() {
            add(&mut store, "2024-01-03", &t.to_string(), "Full");
        }

        let vm = render(
            &state(CalendarView::Month, "2024-01-01", "2024-01-02"),
            &store,
            at("2023-12-28 10:00"),
        );
        let CalendarBody::Month { cells } = vm.body else {
            panic!("expected month body");
        };

        let tuesday = &cells[1];
        assert_eq!(tuesday.badges[0].text, "1 bokad");
        assert_eq!(tuesday.badges[1].text, "16 ledig");
        assert!(!tuesday.fully_booked);

        let wednesday = &cells[2];
        assert_eq!(wednesday.badges[0].text, "17 bokad");
        assert_eq!(wednesday.badges[1], badge(BadgeKind::Full, "Fullbokad"));
        assert!(wednesday.fully_booked);
    }

    #[test]
    fn test_week_grid() {
        let mut store = BookingStore::in_memory();
        add(&mut store, "2024-01-09", "13:00", "Ann");

        let vm = render(
            &state(CalendarView::Week, "2024-01-08", "2024-01-09"),
            &store,
            at("2024-01-08 12:00"),
        );
        assert!(vm.day_labels.is_empty());

        let CalendarBody::Week { days, rows } = vm.body else {
            panic!("expected week body");
        };
        let labels: Vec<_> = days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Mån 8", "Tis 9", "Ons 10", "Tors 11", "Fre 12"]);
        assert_eq!(rows.len(), 17);
        assert!(rows.iter().all(|r| r.slots.len() == 5));

        // Monday 08:00 already passed
        assert_eq!(rows[0].slots[0].status, SlotStatus::Past);
        let one_pm = rows.iter().find(|r| r.time == time("13:00")).unwrap();
        assert_eq!(one_pm.slots[0].status, SlotStatus::Available);
        assert_eq!(one_pm.slots[1].status, SlotStatus::Booked);
        assert!(one_pm.slots[1].disabled);
    }

    #[test]
    fn test_day_summary() {
        let mut store = BookingStore::in_memory();
        for t in time_slots().iter().skip(1) {
            add(&mut store, "2024-01-10", &t.to_string(), "X");
        }

        let vm = render(
            &state(CalendarView::Day, "2024-01-10", "2024-01-10"),
            &store,
            at("2024-01-01 08:00"),
        );
        let CalendarBody::Day { title, summary, slots } = vm.body else {
            panic!("expected day body");
        };
        assert_eq!(title, "Onsdag 10 januari 2024");
        assert_eq!(summary, "1 ledig tid");
        assert_eq!(slots.len(), 17);
        assert_eq!(free_slots_summary(17), "17 lediga tider");
        assert_eq!(free_slots_summary(0), "0 lediga tider");
    }

    #[test]
    fn test_slot_panel_on_closed_day() {
        let store = BookingStore::in_memory();
        let vm = render(
            &state(CalendarView::Month, "2024-01-01", "2024-01-06"),
            &store,
            at("2024-01-01 08:00"),
        );
        assert!(vm.slot_panel.slots.is_empty());
        assert_eq!(vm.slot_panel.title, "Lördag 6 januari 2024");
        assert_eq!(
            vm.slot_panel.closed_message.as_deref(),
            Some("Bokningar görs endast måndag till fredag mellan 08:00 och 17:00.")
        );
    }

    #[test]
    fn test_slot_view_flags_and_aria() {
        let mut store = BookingStore::in_memory();
        add(&mut store, "2024-01-02", "09:00", "Ann");
        let mut s = state(CalendarView::Month, "2024-01-01", "2024-01-02");
        s.pending_slot = Some(PendingSlot {
            date: date("2024-01-02"),
            time: time("10:00"),
        });

        let vm = render(&s, &store, at("2024-01-02 09:15"));
        let slots = &vm.slot_panel.slots;

        let nine = slots.iter().find(|v| v.time == time("09:00")).unwrap();
        assert!(nine.booked && nine.past);
        assert_eq!(nine.status_text, "Ej tillgänglig");
        assert_eq!(nine.aria_label, "Ej tillgänglig 09:00 Tisdag 2 januari 2024");

        let ten = slots.iter().find(|v| v.time == time("10:00")).unwrap();
        assert!(ten.selected);
        assert!(!ten.disabled);
        assert_eq!(ten.aria_label, "Ledig 10:00 Tisdag 2 januari 2024");
    }

    #[test]
    fn test_booking_cards_and_edit_modal() {
        let mut store = BookingStore::in_memory();
        add(&mut store, "2024-01-03", "09:00", "Bo");
        let ann = add(&mut store, "2024-01-02", "13:00", "Ann");

        let mut s = state(CalendarView::Day, "2024-01-02", "2024-01-02");
        s.booking_in_edit = Some(ann.clone());
        s.pending_slot = Some(PendingSlot {
            date: date("2024-01-02"),
            time: time("14:00"),
        });
        s.modal = Modal::Form;

        let vm = render(&s, &store, at("2024-01-01 08:00"));
        assert_eq!(vm.bookings.len(), 2);
        assert_eq!(vm.bookings[0].title, "Tisdag 2 jan.");
        assert!(vm.bookings[0].editing);
        assert!(!vm.bookings[1].editing);

        assert_eq!(
            vm.modal,
            ModalView::Form {
                slot_label: Some("Tisdag 2 januari 2024 ⋅ 14:00".to_string()),
                prefill: ann.contact(),
                editing: true,
            }
        );

        // The booking's own slot stays selectable during the edit.
        let own = vm.slot_panel.slots.iter().find(|v| v.time == time("13:00")).unwrap();
        assert_eq!(own.status, SlotStatus::Available);
    }

    #[test]
    fn test_view_model_json_shape() {
        let store = BookingStore::in_memory();
        let vm = render(
            &state(CalendarView::Day, "2024-01-02", "2024-01-02"),
            &store,
            at("2024-01-01 08:00"),
        );
        let json = serde_json::to_value(&vm).unwrap();
        assert_eq!(json["view"], "day");
        assert_eq!(json["body"]["kind"], "day");
        assert_eq!(json["modal"]["kind"], "closed");
        assert_eq!(json["slot_panel"]["slots"][0]["time"], "08:00");
        assert_eq!(json["slot_panel"]["slots"][0]["status"], "available");
    }
}
