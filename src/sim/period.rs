//! Time-of-day periods and the step schedule that maps them to matrices.

use std::fmt;

use serde::Serialize;

use crate::chain::{MarkovError, TransitionMatrix};

/// Time-of-day bucket sharing one transition matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Period {
    Early,
    RushHour,
    Late,
}

impl Period {
    /// All periods in chronological order.
    pub const ALL: [Period; 3] = [Self::Early, Self::RushHour, Self::Late];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Early => "Early",
            Self::RushHour => "RushHour",
            Self::Late => "Late",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One matrix per period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodMatrices {
    pub early: TransitionMatrix,
    pub rush_hour: TransitionMatrix,
    pub late: TransitionMatrix,
}

impl PeriodMatrices {
    /// Matrix for `period`.
    pub fn get(&self, period: Period) -> &TransitionMatrix {
        match period {
            Period::Early => &self.early,
            Period::RushHour => &self.rush_hour,
            Period::Late => &self.late,
        }
    }
}

/// Contiguous step range `[start_step, end_step]` (1-based, inclusive) using one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSegment {
    pub period: Period,
    pub start_step: usize,
    pub end_step: usize,
    pub matrix: TransitionMatrix,
}

impl ScheduleSegment {
    /// Returns `true` when `step` falls inside the segment.
    pub fn contains(&self, step: usize) -> bool {
        step >= self.start_step && step <= self.end_step
    }

    /// Number of steps in the segment.
    pub fn len(&self) -> usize {
        self.end_step + 1 - self.start_step
    }

    /// Always `false` for a validated segment.
    pub fn is_empty(&self) -> bool {
        self.end_step < self.start_step
    }
}

/// Ordered, gap-free partition of steps `1..=last_step()` into segments.
///
/// Ranges use inclusive upper bounds, so a step on a boundary belongs to the
/// earlier segment: with `Early` ending at 48, step 48 uses the Early matrix
/// and step 49 the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSchedule {
    segments: Vec<ScheduleSegment>,
}

impl PeriodSchedule {
    /// Validates a list of segments.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidInput`] if the list is empty, the first
    /// segment does not start at step 1, a segment ends before it starts,
    /// a segment does not start right after its predecessor, or a period
    /// label appears on more than one segment.
    pub fn new(segments: Vec<ScheduleSegment>) -> Result<Self, MarkovError> {
        let Some(first) = segments.first() else {
            return Err(MarkovError::invalid_input("schedule has no segments"));
        };
        if first.start_step != 1 {
            return Err(MarkovError::invalid_input(format!(
                "schedule starts at step {}, expected 1",
                first.start_step
            )));
        }
        for (idx, seg) in segments.iter().enumerate() {
            if seg.end_step < seg.start_step {
                return Err(MarkovError::invalid_input(format!(
                    "segment {idx} ({}) ends at step {} before it starts at {}",
                    seg.period, seg.end_step, seg.start_step
                )));
            }
            if idx > 0 {
                let expected = segments[idx - 1].end_step + 1;
                if seg.start_step != expected {
                    return Err(MarkovError::invalid_input(format!(
                        "segment {idx} ({}) starts at step {}, expected {expected}",
                        seg.period, seg.start_step
                    )));
                }
            }
            if segments[..idx].iter().any(|s| s.period == seg.period) {
                return Err(MarkovError::invalid_input(format!(
                    "segment {idx} repeats period {}",
                    seg.period
                )));
            }
        }
        Ok(Self { segments })
    }

    /// Builds the three-period day: Early `1..=early_end`, RushHour
    /// `early_end+1..=rush_hour_end`, Late `rush_hour_end+1..=horizon`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidInput`] unless
    /// `1 <= early_end < rush_hour_end < horizon`.
    pub fn three_period(
        early_end: usize,
        rush_hour_end: usize,
        horizon: usize,
        matrices: &PeriodMatrices,
    ) -> Result<Self, MarkovError> {
        let bounds = [
            (Period::Early, 1, early_end),
            (Period::RushHour, early_end + 1, rush_hour_end),
            (Period::Late, rush_hour_end + 1, horizon),
        ];
        Self::new(
            bounds
                .iter()
                .map(|&(period, start_step, end_step)| ScheduleSegment {
                    period,
                    start_step,
                    end_step,
                    matrix: *matrices.get(period),
                })
                .collect(),
        )
    }

    /// Segments in step order.
    pub fn segments(&self) -> &[ScheduleSegment] {
        &self.segments
    }

    /// Last step covered.
    pub fn last_step(&self) -> usize {
        self.segments.last().map_or(0, |s| s.end_step)
    }

    /// Segment owning `step`, or `None` outside `1..=last_step()`.
    pub fn segment_for(&self, step: usize) -> Option<&ScheduleSegment> {
        if step == 0 {
            return None;
        }
        self.segments.iter().find(|s| step <= s.end_step)
    }

    /// Matrix governing `step`.
    pub fn matrix_for(&self, step: usize) -> Option<&TransitionMatrix> {
        self.segment_for(step).map(|s| &s.matrix)
    }

    /// Period of `step`.
    pub fn period_for(&self, step: usize) -> Option<Period> {
        self.segment_for(step).map(|s| s.period)
    }

    /// Matrix of the segment labelled `period`.
    pub fn matrix_of(&self, period: Period) -> Option<&TransitionMatrix> {
        self.segments
            .iter()
            .find(|s| s.period == period)
            .map(|s| &s.matrix)
    }

    /// Periods in step order.
    pub fn periods(&self) -> Vec<Period> {
        let mut out: Vec<Period> = Vec::new();
        for seg in &self.segments {
            if !out.contains(&seg.period) {
                out.push(seg.period);
            }
        }
        out
    }

    /// Checks that the schedule covers steps `1..=num_steps`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidInput`] if `num_steps` is past the last segment.
    pub fn ensure_covers(&self, num_steps: usize) -> Result<(), MarkovError> {
        if num_steps > self.last_step() {
            return Err(MarkovError::invalid_input(format!(
                "schedule covers steps 1..={}, but {num_steps} steps were requested",
                self.last_step()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrices() -> PeriodMatrices {
        PeriodMatrices {
            early: TransitionMatrix::identity(),
            rush_hour: TransitionMatrix::identity(),
            late: TransitionMatrix::identity(),
        }
    }

    fn segment(period: Period, start_step: usize, end_step: usize) -> ScheduleSegment {
        ScheduleSegment {
            period,
            start_step,
            end_step,
            matrix: TransitionMatrix::identity(),
        }
    }

    #[test]
    fn boundary_steps_belong_to_earlier_period() {
        let schedule = PeriodSchedule::three_period(48, 60, 72, &matrices()).unwrap();
        assert_eq!(schedule.period_for(1), Some(Period::Early));
        assert_eq!(schedule.period_for(48), Some(Period::Early));
        assert_eq!(schedule.period_for(49), Some(Period::RushHour));
        assert_eq!(schedule.period_for(60), Some(Period::RushHour));
        assert_eq!(schedule.period_for(61), Some(Period::Late));
        assert_eq!(schedule.period_for(72), Some(Period::Late));
    }

    #[test]
    fn steps_outside_schedule_have_no_segment() {
        let schedule = PeriodSchedule::three_period(48, 60, 72, &matrices()).unwrap();
        assert!(schedule.segment_for(0).is_none());
        assert!(schedule.segment_for(73).is_none());
    }

    #[test]
    fn rejects_gap_between_segments() {
        let err = PeriodSchedule::new(vec![
            segment(Period::Early, 1, 10),
            segment(Period::Late, 12, 20),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("expected 11"));
    }

    #[test]
    fn rejects_overlap() {
        let result = PeriodSchedule::new(vec![
            segment(Period::Early, 1, 10),
            segment(Period::Late, 10, 20),
        ]);
        assert!(matches!(result, Err(MarkovError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_repeated_period_label() {
        let err = PeriodSchedule::new(vec![
            segment(Period::Early, 1, 10),
            segment(Period::RushHour, 11, 20),
            segment(Period::Early, 21, 30),
        ])
        .unwrap_err();
        assert!(matches!(err, MarkovError::InvalidInput { .. }));
        assert!(err.to_string().contains("repeats period Early"));
    }

    #[test]
    fn rejects_schedule_not_starting_at_one() {
        let result = PeriodSchedule::new(vec![segment(Period::Early, 2, 10)]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_schedule() {
        assert!(PeriodSchedule::new(Vec::new()).is_err());
    }

    #[test]
    fn three_period_rejects_unordered_bounds() {
        assert!(PeriodSchedule::three_period(60, 48, 72, &matrices()).is_err());
        assert!(PeriodSchedule::three_period(48, 60, 60, &matrices()).is_err());
    }

    #[test]
    fn ensure_covers_checks_horizon() {
        let schedule = PeriodSchedule::three_period(48, 60, 72, &matrices()).unwrap();
        assert!(schedule.ensure_covers(72).is_ok());
        assert!(schedule.ensure_covers(1).is_ok());
        assert!(schedule.ensure_covers(73).is_err());
    }

    #[test]
    fn segment_lengths() {
        let schedule = PeriodSchedule::three_period(48, 60, 72, &matrices()).unwrap();
        let lens: Vec<usize> = schedule.segments().iter().map(ScheduleSegment::len).collect();
        assert_eq!(lens, vec![48, 12, 12]);
        assert_eq!(schedule.periods(), Period::ALL.to_vec());
    }
}
