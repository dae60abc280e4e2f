//! Cumulative frame timing for animations
//!
//! Built once from the per-frame durations stored with an animation.
//! Lookups start from a guess that assumes uniform frame durations and walk
//! linearly from there, so they are fast for evenly timed animations and
//! degrade to a linear scan for very uneven ones.

use crate::error::{Error, Result};

/// A frame's duration and start time, in the animation's time unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub duration: u32,
    pub start: u32,
}

/// Cumulative start-time table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameIndex {
    frames: Vec<Frame>,
    total: u32,
}

impl FrameIndex {
    pub fn from_durations(durations: &[u32]) -> Self {
        let mut frames = Vec::with_capacity(durations.len());
        let mut start = 0u32;
        for &duration in durations {
            frames.push(Frame { duration, start });
            start = start.saturating_add(duration);
        }
        Self {
            frames,
            total: start,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of all durations
    pub fn total_length(&self) -> u32 {
        self.total
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<Frame> {
        self.frames.get(index).copied()
    }

    /// Index of the frame showing at time `t`
    ///
    /// Times at or past the last frame's start map to the last frame.
    pub fn frame_at(&self, t: u32) -> Result<usize> {
        let last = self.frames.len().checked_sub(1).ok_or(Error::NoFrames)?;
        if t >= self.frames[last].start {
            return Ok(last);
        }

        // t < start[last] <= total, so total is non-zero here
        let count = self.frames.len() as u64;
        let mut guess = ((u64::from(t) * count) / u64::from(self.total)) as usize;
        guess = guess.min(last);

        while guess > 0 && self.frames[guess].start > t {
            guess -= 1;
        }
        while guess < last && self.frames[guess + 1].start <= t {
            guess += 1;
        }
        Ok(guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_and_total() {
        let index = FrameIndex::from_durations(&[100, 50, 25]);
        let starts: Vec<u32> = index.frames().iter().map(|f| f.start).collect();
        assert_eq!(starts, vec![0, 100, 150]);
        assert_eq!(index.total_length(), 175);
    }

    #[test]
    fn test_empty_has_no_frames() {
        let index = FrameIndex::from_durations(&[]);
        assert!(matches!(index.frame_at(0), Err(Error::NoFrames)));
    }

    #[test]
    fn test_frame_starts_map_to_themselves() {
        let durations = [10, 300, 5, 5, 80, 1, 1, 200];
        let index = FrameIndex::from_durations(&durations);
        for (i, frame) in index.frames().iter().enumerate() {
            assert_eq!(index.frame_at(frame.start).unwrap(), i);
        }
    }

    #[test]
    fn test_every_time_in_bracket() {
        let durations = [7, 1, 40, 3, 3, 90, 12];
        let index = FrameIndex::from_durations(&durations);
        let frames = index.frames();
        for i in 0..frames.len() - 1 {
            for t in frames[i].start..frames[i + 1].start {
                assert_eq!(index.frame_at(t).unwrap(), i, "t = {t}");
            }
        }
    }

    #[test]
    fn test_past_end_is_last_frame() {
        let index = FrameIndex::from_durations(&[10, 10, 10]);
        assert_eq!(index.frame_at(20).unwrap(), 2);
        assert_eq!(index.frame_at(29).unwrap(), 2);
        assert_eq!(index.frame_at(1_000).unwrap(), 2);
    }

    #[test]
    fn test_single_and_zero_length() {
        let single = FrameIndex::from_durations(&[50]);
        assert_eq!(single.frame_at(0).unwrap(), 0);
        assert_eq!(single.frame_at(70).unwrap(), 0);

        let zero = FrameIndex::from_durations(&[0, 0]);
        assert_eq!(zero.frame_at(0).unwrap(), 1);
    }
}
