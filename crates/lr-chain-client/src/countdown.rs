//! Countdown computation, split from its 1 Hz driver so it can be tested
//! off-browser.

/// What the countdown slot should display at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownPhase {
    /// The auction is closed on-chain.
    Ended,
    /// End time reached but the close has not been observed yet.
    Closing,
    Remaining { hours: u64, minutes: u64, seconds: u64 },
}

impl CountdownPhase {
    /// Phase at `now` (seconds since epoch) for an auction ending at
    /// `end_time` with the given on-chain ended flag.
    pub fn at(end_time: u64, ended: bool, now: u64) -> Self {
        if ended {
            return CountdownPhase::Ended;
        }

        match end_time.checked_sub(now) {
            Some(diff) if diff > 0 => CountdownPhase::Remaining {
                hours: diff / 3600,
                minutes: diff % 3600 / 60,
                seconds: diff % 60,
            },
            _ => CountdownPhase::Closing,
        }
    }

    pub fn label(&self) -> String {
        match self {
            CountdownPhase::Ended => "Encerrado".to_string(),
            CountdownPhase::Closing => "Encerrando\u{2026}".to_string(),
            CountdownPhase::Remaining {
                hours,
                minutes,
                seconds,
            } => format!("{hours}h {minutes}m {seconds}s"),
        }
    }
}
