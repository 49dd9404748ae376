use crate::domain::ports::Clock;
use chrono::{Local, NaiveDateTime};

/// Reads the host's local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
