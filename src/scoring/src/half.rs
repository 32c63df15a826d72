use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Half {
    FirstHalf,
    SecondHalf,
}

impl Half {
    pub fn other(self) -> Half {
        match self {
            Half::FirstHalf => Half::SecondHalf,
            Half::SecondHalf => Half::FirstHalf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Half::FirstHalf => "firstHalf",
            Half::SecondHalf => "secondHalf",
        }
    }
}

/// Non-negative counter split by half. Decrements clamp at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfStats {
    #[serde(default)]
    pub first_half: u32,
    #[serde(default)]
    pub second_half: u32,
}

impl HalfStats {
    pub fn new(first_half: u32, second_half: u32) -> Self {
        HalfStats {
            first_half,
            second_half,
        }
    }

    pub fn get(&self, half: Half) -> u32 {
        match half {
            Half::FirstHalf => self.first_half,
            Half::SecondHalf => self.second_half,
        }
    }

    fn slot_mut(&mut self, half: Half) -> &mut u32 {
        match half {
            Half::FirstHalf => &mut self.first_half,
            Half::SecondHalf => &mut self.second_half,
        }
    }

    pub fn increment(&mut self, half: Half) -> u32 {
        let slot = self.slot_mut(half);
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn decrement(&mut self, half: Half) -> u32 {
        let slot = self.slot_mut(half);
        *slot = slot.saturating_sub(1);
        *slot
    }

    /// Applies `delta` to one half and returns the change that actually
    /// happened, which differs from `delta` only when clamped at zero.
    pub fn adjust(&mut self, half: Half, delta: i32) -> i32 {
        adjust_counter(self.slot_mut(half), delta)
    }

    pub fn total(&self) -> u32 {
        self.first_half.saturating_add(self.second_half)
    }

    pub fn is_zero(&self) -> bool {
        self.first_half == 0 && self.second_half == 0
    }
}

/// Shared increment/decrement-with-clamp rule for every plain counter.
pub fn adjust_counter(value: &mut u32, delta: i32) -> i32 {
    let before = *value;

    *value = if delta >= 0 {
        before.saturating_add(delta.unsigned_abs())
    } else {
        before.saturating_sub(delta.unsigned_abs())
    };

    (*value as i64 - before as i64) as i32
}
