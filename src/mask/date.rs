//! Date mask engine (`dd.mm.yyyy`).

use super::pattern::PatternMask;
use super::{ChangeDetails, Direction, MaskError, MaskKind, MaskOptions, MaskSource, Masked};

/// Pattern behind every date mask
pub const DATE_PATTERN: &str = "00.00.0000";

fn digits(chars: &[char]) -> Vec<u32> {
    chars.iter().filter_map(|ch| ch.to_digit(10)).collect()
}

fn two_digits(d: &[u32], at: usize) -> u32 {
    d[at] * 10 + d[at + 1]
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(month: u32, year: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Reject day/month prefixes that can never become valid
fn date_prefix_ok(chars: &[char]) -> bool {
    let d = digits(chars);

    if d.first().is_some_and(|&first| first > 3) {
        return false;
    }
    if d.len() >= 2 && !(1..=31).contains(&two_digits(&d, 0)) {
        return false;
    }
    if d.get(2).is_some_and(|&first| first > 1) {
        return false;
    }
    if d.len() >= 4 && !(1..=12).contains(&two_digits(&d, 2)) {
        return false;
    }
    true
}

fn is_valid_date(chars: &[char]) -> bool {
    let d = digits(chars);
    if d.len() != 8 {
        return false;
    }

    let day = two_digits(&d, 0);
    let month = two_digits(&d, 2);
    let year = two_digits(&d, 4) * 100 + two_digits(&d, 6);
    year > 0 && day >= 1 && day <= days_in_month(month, year)
}

/// Day.month.year mask that only completes on a real calendar date.
#[derive(Debug, Clone)]
pub struct DateMask {
    source: MaskSource,
    pattern: PatternMask,
}

impl DateMask {
    pub fn new() -> Self {
        let pattern = PatternMask::with_validator(DATE_PATTERN, date_prefix_ok)
            .unwrap_or_else(|_| unreachable!("date pattern is a valid pattern"));
        Self {
            source: MaskSource::Date,
            pattern,
        }
    }

    fn reject(&self, requested: &MaskSource) -> MaskError {
        MaskError::IncompatibleMask {
            current: MaskKind::Date,
            requested: requested.kind(),
        }
    }
}

impl Default for DateMask {
    fn default() -> Self {
        Self::new()
    }
}

impl Masked for DateMask {
    fn kind(&self) -> MaskKind {
        MaskKind::Date
    }

    fn mask(&self) -> &MaskSource {
        &self.source
    }

    fn set_mask(&mut self, mask: MaskSource) -> Result<(), MaskError> {
        match mask {
            MaskSource::Date => Ok(()),
            other => Err(self.reject(&other)),
        }
    }

    fn value(&self) -> &str {
        self.pattern.value()
    }

    fn set_value(&mut self, value: &str) {
        self.pattern.set_value(value);
    }

    fn unmasked_value(&self) -> &str {
        self.pattern.unmasked_value()
    }

    fn set_unmasked_value(&mut self, value: &str) {
        self.pattern.set_unmasked_value(value);
    }

    fn is_complete(&self) -> bool {
        self.pattern.is_complete() && is_valid_date(self.pattern.inputs())
    }

    fn options(&self) -> MaskOptions {
        MaskOptions {
            mask: Some(MaskSource::Date),
            ..self.pattern.options()
        }
    }

    fn update_options(&mut self, options: &MaskOptions) -> Result<(), MaskError> {
        if let Some(mask) = &options.mask {
            if *mask != MaskSource::Date {
                return Err(self.reject(mask));
            }
        }
        self.pattern.update_options(&MaskOptions {
            mask: None,
            ..options.clone()
        })
    }

    fn apply_edit(
        &mut self,
        start: usize,
        delete_count: usize,
        inserted: &str,
        direction: Direction,
    ) -> ChangeDetails {
        self.pattern.apply_edit(start, delete_count, inserted, direction)
    }

    fn nearest_input_pos(&self, pos: usize, direction: Direction) -> usize {
        self.pattern.nearest_input_pos(pos, direction)
    }

    fn commit(&mut self) {
        self.pattern.commit();
    }
}
