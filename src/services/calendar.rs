//! The calendar widget as a state machine.
//!
//! `transition` is pure: it reads the current state and the store, and returns
//! the next state plus a list of effects. `CalendarApp` owns the state, the
//! store and a clock, applies the effects and hands the user-facing parts back
//! to the caller.

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::db::BookingStore;
use crate::models::{
    Booking, BookingUpdate, CalendarState, CalendarView, ContactDetails, Modal, PendingSlot,
    SlotTime,
};
use crate::services::clock::Clock;
use crate::services::dates::{
    add_days, add_months, adjacent_business_day, end_of_week, first_of_month, is_business_day,
    is_same_month, next_business_day, start_of_day, start_of_week,
};
use crate::services::form::{self, FormOutcome};
use crate::services::render::{self, CalendarViewModel};
use crate::services::scheduling::{validate_slot_selection, SchedulingError};

pub const CANCEL_PROMPT: &str = "Vill du avboka den här tiden?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SetView { view: CalendarView },
    Navigate { direction: Direction },
    GoToToday,
    SelectDate { date: NaiveDate },
    SelectSlot { date: NaiveDate, time: SlotTime },
    Submit { details: ContactDetails },
    CloseModal,
    StartEdit { id: String },
    CancelBooking { id: String },
    ConfirmCancel { id: String },
}

impl Action {
    /// Name of the action without its payload, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetView { .. } => "set_view",
            Action::Navigate { .. } => "navigate",
            Action::GoToToday => "go_to_today",
            Action::SelectDate { .. } => "select_date",
            Action::SelectSlot { .. } => "select_slot",
            Action::Submit { .. } => "submit",
            Action::CloseModal => "close_modal",
            Action::StartEdit { .. } => "start_edit",
            Action::CancelBooking { .. } => "cancel_booking",
            Action::ConfirmCancel { .. } => "confirm_cancel",
        }
    }
}

/// A transient message for the user. Nothing is changed when one is raised
/// for a rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Scheduling(SchedulingError),
    IncompleteForm,
    NoPendingSlot,
    BookingNotFound,
    PickNewSlot,
    BookingCancelled,
}

impl Notice {
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::Scheduling(SchedulingError::ClosedDay) => "closed_day",
            Notice::Scheduling(SchedulingError::OffGrid) => "off_grid",
            Notice::Scheduling(SchedulingError::Conflict) => "slot_conflict",
            Notice::Scheduling(SchedulingError::InPast) => "slot_in_past",
            Notice::IncompleteForm => "incomplete_form",
            Notice::NoPendingSlot => "no_pending_slot",
            Notice::BookingNotFound => "booking_not_found",
            Notice::PickNewSlot => "pick_new_slot",
            Notice::BookingCancelled => "booking_cancelled",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Scheduling(e) => write!(f, "{e}"),
            Notice::IncompleteForm => write!(f, "Fyll i alla uppgifter innan du bekräftar."),
            Notice::NoPendingSlot => write!(f, "Välj en tid innan du bekräftar."),
            Notice::BookingNotFound => write!(f, "Kunde inte hitta bokningen."),
            Notice::PickNewSlot => write!(f, "Välj en ny tid för att uppdatera bokningen."),
            Notice::BookingCancelled => write!(f, "Bokningen är avbokad."),
        }
    }
}

impl From<SchedulingError> for Notice {
    fn from(e: SchedulingError) -> Self {
        Notice::Scheduling(e)
    }
}

impl Serialize for Notice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Notice", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationRequest {
    pub id: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Notice),
    RequestConfirmation(ConfirmationRequest),
    Create {
        date: NaiveDate,
        time: SlotTime,
        details: ContactDetails,
    },
    Update {
        id: String,
        update: BookingUpdate,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: CalendarState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: CalendarState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn rejected(state: &CalendarState, notice: impl Into<Notice>) -> Self {
        Self {
            state: state.clone(),
            effects: vec![Effect::Notify(notice.into())],
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Today, or the next business day when today falls on a weekend.
pub fn business_today(now: NaiveDateTime) -> NaiveDate {
    next_business_day(start_of_day(now))
}

/// The state a fresh page starts in: month view on today's month.
pub fn initial_state(now: NaiveDateTime) -> CalendarState {
    let today = business_today(now);
    CalendarState {
        view: CalendarView::Month,
        current_date: first_of_month(today),
        selected_date: today,
        pending_slot: None,
        booking_in_edit: None,
        modal: Modal::Closed,
    }
}

fn anchor_for(view: CalendarView, date: NaiveDate) -> NaiveDate {
    match view {
        CalendarView::Month => first_of_month(date),
        CalendarView::Week => start_of_week(date),
        CalendarView::Day => date,
    }
}

pub fn transition(
    state: &CalendarState,
    store: &BookingStore,
    now: NaiveDateTime,
    action: Action,
) -> Transition {
    match action {
        Action::SetView { view } => set_view(state, view),
        Action::Navigate { direction } => navigate(state, direction),
        Action::GoToToday => go_to_today(state, now),
        Action::SelectDate { date } => select_date(state, date),
        Action::SelectSlot { date, time } => select_slot(state, store, now, date, time),
        Action::Submit { details } => submit(state, store, &details),
        Action::CloseModal => close_modal(state),
        Action::StartEdit { id } => start_edit(state, store, &id),
        Action::CancelBooking { id } => cancel_booking(state, store, id),
        Action::ConfirmCancel { id } => confirm_cancel(state, store, id),
    }
}

fn set_view(state: &CalendarState, view: CalendarView) -> Transition {
    let mut next = state.clone();
    next.view = view;
    next.current_date = anchor_for(view, state.selected_date);
    Transition::to(next)
}

fn go_to_today(state: &CalendarState, now: NaiveDateTime) -> Transition {
    let today = business_today(now);
    let mut next = state.clone();
    next.selected_date = today;
    next.current_date = anchor_for(state.view, today);
    next.pending_slot = None;
    Transition::to(next)
}

fn navigate(state: &CalendarState, direction: Direction) -> Transition {
    let step: i64 = match direction {
        Direction::Prev => -1,
        Direction::Next => 1,
    };

    let mut next = state.clone();
    match state.view {
        CalendarView::Month => {
            next.current_date = add_months(state.current_date, step as i32);
            next.selected_date = align_selected_date(&next);
        }
        CalendarView::Week => {
            next.current_date = add_days(state.current_date, 7 * step);
            next.selected_date = align_selected_date(&next);
        }
        CalendarView::Day => {
            let candidate = adjacent_business_day(state.current_date, step);
            next.current_date = candidate;
            next.selected_date = candidate;
        }
    }
    next.pending_slot = None;
    Transition::to(next)
}

/// Keeps the selection inside the visible month or week, on a business day.
fn align_selected_date(state: &CalendarState) -> NaiveDate {
    match state.view {
        CalendarView::Month => {
            let reference = first_of_month(state.current_date);
            if is_same_month(state.selected_date, reference) {
                state.selected_date
            } else {
                next_business_day(reference)
            }
        }
        CalendarView::Week => {
            let start = start_of_week(state.current_date);
            let end = end_of_week(state.current_date);
            let selected = state.selected_date;
            if selected < start || selected > end || !is_business_day(selected) {
                (0..7)
                    .map(|offset| add_days(start, offset))
                    .find(|d| is_business_day(*d))
                    .unwrap_or(start)
            } else {
                selected
            }
        }
        CalendarView::Day => state.selected_date,
    }
}

fn select_date(state: &CalendarState, date: NaiveDate) -> Transition {
    if !is_business_day(date) {
        return Transition::rejected(state, SchedulingError::ClosedDay);
    }

    let mut next = state.clone();
    next.selected_date = date;
    next.current_date = anchor_for(state.view, date);
    next.pending_slot = None;
    Transition::to(next)
}

fn select_slot(
    state: &CalendarState,
    store: &BookingStore,
    now: NaiveDateTime,
    date: NaiveDate,
    time: SlotTime,
) -> Transition {
    if let Err(e) = validate_slot_selection(store, date, time, state.booking_in_edit.as_ref(), now)
    {
        return Transition::rejected(state, e);
    }

    let mut next = state.clone();
    next.selected_date = date;
    next.pending_slot = Some(PendingSlot { date, time });
    next.modal = Modal::Form;
    Transition::to(next)
}

fn submit(state: &CalendarState, store: &BookingStore, details: &ContactDetails) -> Transition {
    let Some(slot) = state.pending_slot else {
        return Transition::rejected(state, Notice::NoPendingSlot);
    };
    let details = match form::validate(details) {
        Ok(details) => details,
        Err(e) => {
            tracing::debug!(error = %e, "booking form incomplete");
            return Transition::rejected(state, Notice::IncompleteForm);
        }
    };

    let mut next = state.clone();
    next.pending_slot = None;

    let effect = match &state.booking_in_edit {
        Some(editing) => {
            if store.find_by_id(&editing.id).is_none() {
                return Transition::rejected(state, Notice::BookingNotFound);
            }
            next.modal = Modal::Confirmation {
                message: form::updated_message(&details.name),
            };
            Effect::Update {
                id: editing.id.clone(),
                update: BookingUpdate::reschedule(slot.date, slot.time, details),
            }
        }
        None => {
            next.modal = Modal::Confirmation {
                message: form::created_message(&details.name),
            };
            Effect::Create {
                date: slot.date,
                time: slot.time,
                details,
            }
        }
    };

    Transition::to(next).with(effect)
}

fn close_modal(state: &CalendarState) -> Transition {
    let mut next = state.clone();
    next.pending_slot = None;
    next.booking_in_edit = None;
    next.modal = Modal::Closed;
    Transition::to(next)
}

fn start_edit(state: &CalendarState, store: &BookingStore, id: &str) -> Transition {
    let Some(booking) = store.find_by_id(id) else {
        return Transition::rejected(state, Notice::BookingNotFound);
    };

    let mut next = state.clone();
    next.booking_in_edit = Some(booking.clone());
    next.selected_date = booking.date;
    next.current_date = booking.date;
    next.pending_slot = None;
    next.view = CalendarView::Day;
    next.modal = Modal::Closed;
    Transition::to(next).with(Effect::Notify(Notice::PickNewSlot))
}

fn cancel_booking(state: &CalendarState, store: &BookingStore, id: String) -> Transition {
    if store.find_by_id(&id).is_none() {
        return Transition::rejected(state, Notice::BookingNotFound);
    }

    Transition::to(state.clone()).with(Effect::RequestConfirmation(ConfirmationRequest {
        id,
        prompt: CANCEL_PROMPT.to_string(),
    }))
}

fn confirm_cancel(state: &CalendarState, store: &BookingStore, id: String) -> Transition {
    if store.find_by_id(&id).is_none() {
        return Transition::rejected(state, Notice::BookingNotFound);
    }

    let mut next = state.clone();
    if next.editing_id() == Some(id.as_str()) {
        next.booking_in_edit = None;
    }
    Transition::to(next)
        .with(Effect::Remove { id })
        .with(Effect::Notify(Notice::BookingCancelled))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feedback {
    pub notices: Vec<Notice>,
    pub confirmation: Option<ConfirmationRequest>,
    pub outcome: Option<FormOutcome>,
}

/// One calendar widget: its state, the bookings and the clock it reads.
pub struct CalendarApp {
    state: CalendarState,
    store: BookingStore,
    clock: Box<dyn Clock>,
}

impl CalendarApp {
    pub fn new(store: BookingStore, clock: Box<dyn Clock>) -> Self {
        let state = initial_state(clock.now());
        Self {
            state,
            store,
            clock,
        }
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn store(&self) -> &BookingStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut BookingStore {
        &mut self.store
    }

    pub fn render(&self) -> CalendarViewModel {
        render::render(&self.state, &self.store, self.clock.now())
    }

    pub fn dispatch(&mut self, action: Action) -> Feedback {
        let now = self.clock.now();
        tracing::debug!(
            action = action.kind(),
            view = self.state.view.as_str(),
            "calendar action"
        );

        let Transition { state, effects } = transition(&self.state, &self.store, now, action);
        self.state = state;

        let mut feedback = Feedback::default();
        for effect in effects {
            match effect {
                Effect::Notify(notice) => {
                    tracing::debug!(kind = notice.kind(), "notice");
                    feedback.notices.push(notice);
                }
                Effect::RequestConfirmation(request) => feedback.confirmation = Some(request),
                Effect::Create {
                    date,
                    time,
                    details,
                } => {
                    let booking = Booking::new(date, time, details, self.clock.timestamp());
                    feedback.outcome = Some(FormOutcome::Created(self.store.add(booking)));
                }
                Effect::Update { id, update } => match self.store.update(&id, update) {
                    Some(booking) => feedback.outcome = Some(FormOutcome::Updated(booking)),
                    None => feedback.notices.push(Notice::BookingNotFound),
                },
                Effect::Remove { id } => self.store.remove(&id),
            }
        }

        feedback
    }
}
