use jiff::Timestamp;
use std::time::Duration;

/// A token bucket that refills continuously.
///
/// The bucket starts full with `capacity` tokens and regains `capacity`
/// tokens per `period`, never holding more than `capacity`. Time is always
/// passed in by the caller, so the bucket itself never reads a clock.
///
/// Credit is kept as an integer in units of one nanosecond of one token's
/// refill: every elapsed nanosecond adds `capacity` units and a token costs
/// `period` (in nanoseconds) units. Waiting exactly one period therefore
/// always refills the whole bucket. A zero period counts as one nanosecond.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    /// Units one token costs, i.e. the period in nanoseconds.
    token_cost: u128,
    /// Units a full bucket holds.
    max_credit: u128,
    credit: u128,
    last_refill: Timestamp,
}

impl TokenBucket {
    pub fn new(capacity: u32, period: Duration, now: Timestamp) -> Self {
        let token_cost = period.as_nanos().max(1);
        let max_credit = token_cost.saturating_mul(u128::from(capacity));

        Self {
            capacity,
            token_cost,
            max_credit,
            credit: max_credit,
            last_refill: now,
        }
    }

    /// Takes one token if one is available at `now`.
    pub fn try_acquire(&mut self, now: Timestamp) -> bool {
        self.refill(now);
        if self.capacity > 0 && self.credit >= self.token_cost {
            self.credit -= self.token_cost;
            true
        } else {
            false
        }
    }

    /// Tokens available at `now`, rounded down.
    pub fn available(&mut self, now: Timestamp) -> u32 {
        self.refill(now);
        u32::try_from(self.credit / self.token_cost).unwrap_or(self.capacity)
    }

    fn refill(&mut self, now: Timestamp) {
        // a clock that steps backwards refills nothing
        if now <= self.last_refill {
            return;
        }

        let elapsed = u128::try_from(now.duration_since(self.last_refill).as_nanos()).unwrap_or(0);
        let regained = elapsed.saturating_mul(u128::from(self.capacity));
        self.credit = self.credit.saturating_add(regained).min(self.max_credit);
        self.last_refill = now;
    }
}
