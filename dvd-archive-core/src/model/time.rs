use serde::{Deserialize, Serialize};

use crate::bits::{Bits, bcd};

/// Presentation time stamps on DVD tick at 90 kHz.
pub const TICKS_PER_SECOND: u64 = 90_000;

/// A playback time as stored on disc: hours, minutes, seconds and frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
    pub rate: FrameRate,
}

/// Frame rate code of a [`Time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameRate {
    /// 25 frames per second (PAL).
    Fps25,
    /// 30000/1001 frames per second (NTSC).
    Fps2997,
    /// Raw frame byte of a time that could not be decoded.
    Unexpected(u8),
}

impl FrameRate {
    pub fn frames_per_second(self) -> Option<f64> {
        match self {
            Self::Fps25 => Some(25.0),
            Self::Fps2997 => Some(30000.0 / 1001.0),
            Self::Unexpected(_) => None,
        }
    }

    /// Duration of one frame in 90 kHz ticks.
    fn ticks_per_frame(self) -> Option<u64> {
        match self {
            Self::Fps25 => Some(3600),
            Self::Fps2997 => Some(3003),
            Self::Unexpected(_) => None,
        }
    }
}

impl Time {
    pub const fn zero(rate: FrameRate) -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            frames: 0,
            rate,
        }
    }

    /// Decode the 4-byte `dvd_time_t` layout.
    ///
    /// Hours, minutes and seconds are BCD bytes. The last byte holds the rate
    /// code in bits 6-7 (`1` = 25 fps, `3` = 29.97 fps) and BCD frames in
    /// bits 0-5. Invalid digits or rate codes yield [`FrameRate::Unexpected`]
    /// carrying the raw frame byte; the digits that did decode are kept.
    pub fn decode(raw: [u8; 4]) -> Self {
        let [h, m, s, f] = raw;
        let frame_digits = f.bits(0..=5);
        let digits = [bcd(h), bcd(m), bcd(s), bcd(frame_digits)];

        let rate = match (f.bits(6..=7), digits.iter().all(Option::is_some)) {
            (1, true) => FrameRate::Fps25,
            (3, true) => FrameRate::Fps2997,
            _ => FrameRate::Unexpected(f),
        };

        Self {
            hours: digits[0].unwrap_or(0),
            minutes: digits[1].unwrap_or(0),
            seconds: digits[2].unwrap_or(0),
            frames: digits[3].unwrap_or(0),
            rate,
        }
    }

    /// Convert a 90 kHz tick count into a time at the given frame rate.
    ///
    /// With an undecodable rate the frame part is left at zero.
    pub fn from_ticks(ticks: u64, rate: FrameRate) -> Self {
        let total_seconds = ticks / TICKS_PER_SECOND;
        let remainder = ticks % TICKS_PER_SECOND;
        let frames = rate
            .ticks_per_frame()
            .map(|per_frame| remainder / per_frame)
            .unwrap_or(0);

        Self {
            hours: u8::try_from(total_seconds / 3600).unwrap_or(u8::MAX),
            minutes: ((total_seconds / 60) % 60) as u8,
            seconds: (total_seconds % 60) as u8,
            frames: frames as u8,
            rate,
        }
    }

    /// Total length in seconds, if the frame rate is known.
    pub fn as_seconds(&self) -> Option<f64> {
        let fps = self.rate.frames_per_second()?;
        let whole = u32::from(self.hours) * 3600 + u32::from(self.minutes) * 60 + u32::from(self.seconds);
        Some(f64::from(whole) + f64::from(self.frames) / fps)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

#[cfg(test)]
#[path = "../tests/time_tests.rs"]
mod tests;
