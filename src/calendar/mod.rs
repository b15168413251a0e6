//! Calendar domain: the heartbeat of MFarm.
//!
//! Responsible for:
//! - Advancing game time from real time, at separate day and night rates
//! - Sending exactly one DayAdvanceEvent each time the clock passes midnight
//! - Providing a manual advance (sleep / debug) via ManualDayAdvanceEvent

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::shared::*;

/// Game minutes in each half of the day (06:00–18:00 and 18:00–06:00).
pub const MINUTES_PER_HALF_DAY: f32 = 720.0;
pub const DAY_START_HOUR: u32 = 6;
pub const NIGHT_START_HOUR: u32 = 18;

/// Skip straight to the next morning.
#[derive(Event, Debug, Clone, Default)]
pub struct ManualDayAdvanceEvent;

#[derive(Resource, Debug, Clone)]
pub struct GameClock {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub day_duration_secs: f32,
    pub night_duration_secs: f32,
    pub paused: bool,
    elapsed_real_seconds: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(600.0, 600.0)
    }
}

impl GameClock {
    pub fn new(day_duration_secs: f32, night_duration_secs: f32) -> Self {
        Self {
            day: 1,
            hour: DAY_START_HOUR,
            minute: 0,
            day_duration_secs,
            night_duration_secs,
            paused: false,
            elapsed_real_seconds: 0.0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.day_duration_secs, config.night_duration_secs)
    }

    pub fn is_day(&self) -> bool {
        (DAY_START_HOUR..NIGHT_START_HOUR).contains(&self.hour)
    }

    /// Game minutes that pass per real second in the current half of the day.
    pub fn minutes_per_second(&self) -> f32 {
        let duration = if self.is_day() {
            self.day_duration_secs
        } else {
            self.night_duration_secs
        };
        if duration > 0.0 {
            MINUTES_PER_HALF_DAY / duration
        } else {
            MINUTES_PER_HALF_DAY / 600.0
        }
    }

    /// `"HH:MM"` with minutes floored to the nearest ten.
    pub fn display_time(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute / 10 * 10)
    }

    /// Feed real seconds into the clock. Returns how many midnights passed.
    pub fn tick(&mut self, delta_secs: f32) -> u32 {
        if self.paused {
            return 0;
        }
        self.elapsed_real_seconds += delta_secs.max(0.0);

        let mut rollovers = 0;
        loop {
            // The rate can change mid-frame when the clock crosses 06:00 / 18:00.
            let secs_per_minute = 1.0 / self.minutes_per_second();
            if self.elapsed_real_seconds < secs_per_minute {
                break;
            }
            self.elapsed_real_seconds -= secs_per_minute;
            if self.advance_one_minute() {
                rollovers += 1;
            }
        }
        rollovers
    }

    /// Returns true when the minute crossed midnight.
    fn advance_one_minute(&mut self) -> bool {
        self.minute += 1;
        if self.minute < 60 {
            return false;
        }
        self.minute = 0;
        self.hour += 1;
        if self.hour < 24 {
            return false;
        }
        self.hour = 0;
        self.day += 1;
        true
    }

    /// Jump to 06:00 of the next day.
    pub fn skip_to_next_morning(&mut self) {
        self.day += 1;
        self.hour = DAY_START_HOUR;
        self.minute = 0;
        self.elapsed_real_seconds = 0.0;
    }
}

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameClock>()
            .add_event::<ManualDayAdvanceEvent>()
            .add_systems(OnEnter(GameState::Playing), resume_time)
            .add_systems(OnExit(GameState::Playing), pause_time)
            .add_systems(
                Update,
                (tick_time, handle_manual_day_advance)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─── State transition hooks ───────────────────────────────────────────────────

fn resume_time(mut clock: ResMut<GameClock>) {
    clock.paused = false;
    info!("[Calendar] Time resumed — Day {} {}", clock.day, clock.display_time());
}

fn pause_time(mut clock: ResMut<GameClock>) {
    clock.paused = true;
    info!("[Calendar] Time paused");
}

// ─── Main time-tick system ────────────────────────────────────────────────────

pub fn tick_time(
    time: Res<Time>,
    mut clock: ResMut<GameClock>,
    mut day_writer: EventWriter<DayAdvanceEvent>,
) {
    let was_day = clock.is_day();
    let rollovers = clock.tick(time.delta_secs());
    let first_new_day = clock.day + 1 - rollovers;
    for day in first_new_day..=clock.day {
        info!("[Calendar] Midnight — Day {} begins", day);
        day_writer.send(DayAdvanceEvent { day });
    }
    if was_day != clock.is_day() {
        debug!(
            "[Calendar] {} at {}",
            if clock.is_day() { "Sunrise" } else { "Nightfall" },
            clock.display_time()
        );
    }
}

pub fn handle_manual_day_advance(
    mut requests: EventReader<ManualDayAdvanceEvent>,
    mut clock: ResMut<GameClock>,
    mut day_writer: EventWriter<DayAdvanceEvent>,
) {
    for _ in requests.read() {
        clock.skip_to_next_morning();
        info!("[Calendar] Slept until Day {} {}", clock.day, clock.display_time());
        day_writer.send(DayAdvanceEvent { day: clock.day });
    }
}
