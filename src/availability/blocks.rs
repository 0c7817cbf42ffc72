// Time-block evaluator
//
// Administrative blocks (maintenance, events, holidays) make a facility
// unavailable for their whole interval.

use chrono::{DateTime, Utc};

use crate::availability::{overlaps, AvailabilityCheckResult, AvailabilityConflictType};
use crate::schedule::TimeBlock;

/// Check a candidate interval against the facility's active time blocks
///
/// The first overlapping active block is surfaced; multiple overlapping
/// blocks are not aggregated.
pub fn check_time_blocks(
    blocks: &[TimeBlock],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AvailabilityCheckResult {
    let conflicting = blocks
        .iter()
        .filter(|b| b.is_active)
        .find(|b| overlaps(b.start_time, b.end_time, start, end));

    match conflicting {
        Some(block) => {
            let window = format!(
                "{} - {}",
                block.start_time.format("%Y-%m-%d %H:%M"),
                block.end_time.format("%Y-%m-%d %H:%M")
            );
            let message = match block.reason.as_deref() {
                Some(reason) if !reason.is_empty() => format!(
                    "Facility is unavailable due to: {} - {} ({})",
                    block.block_type, reason, window
                ),
                _ => format!(
                    "Facility is unavailable due to: {} ({})",
                    block.block_type, window
                ),
            };
            AvailabilityCheckResult::unavailable(AvailabilityConflictType::TimeBlock, message)
        }
        None => AvailabilityCheckResult::available(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::schedule::BlockType;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
    }

    fn block(start: DateTime<Utc>, end: DateTime<Utc>, reason: Option<&str>, is_active: bool) -> TimeBlock {
        TimeBlock {
            id: 1,
            facility_id: 1,
            block_type: BlockType::Maintenance,
            start_time: start,
            end_time: end,
            reason: reason.map(str::to_string),
            is_active,
            created_at: at(0, 0),
        }
    }

    #[test]
    fn no_blocks_means_available() {
        let result = check_time_blocks(&[], at(10, 0), at(12, 0));
        assert!(result.is_available);
    }

    #[test]
    fn overlapping_active_block_conflicts() {
        let blocks = vec![block(at(11, 0), at(13, 0), None, true)];
        let result = check_time_blocks(&blocks, at(10, 0), at(12, 0));
        assert!(!result.is_available);
        assert_eq!(result.conflict_type, AvailabilityConflictType::TimeBlock);
    }

    #[test]
    fn inactive_block_is_ignored() {
        let blocks = vec![block(at(11, 0), at(13, 0), None, false)];
        let result = check_time_blocks(&blocks, at(10, 0), at(12, 0));
        assert!(result.is_available);
    }

    #[test]
    fn touching_block_does_not_conflict() {
        let blocks = vec![block(at(12, 0), at(14, 0), None, true)];
        let result = check_time_blocks(&blocks, at(10, 0), at(12, 0));
        assert!(result.is_available);
    }

    #[test]
    fn message_includes_block_type_and_reason() {
        let blocks = vec![block(at(11, 0), at(13, 0), Some("court resurfacing"), true)];
        let result = check_time_blocks(&blocks, at(10, 0), at(12, 0));
        let message = result.message.unwrap();
        assert!(message.contains("Maintenance break"), "message was: {}", message);
        assert!(message.contains("court resurfacing"), "message was: {}", message);
    }

    #[test]
    fn message_without_reason_still_names_block_type() {
        let blocks = vec![block(at(11, 0), at(13, 0), None, true)];
        let result = check_time_blocks(&blocks, at(10, 0), at(12, 0));
        let message = result.message.unwrap();
        assert!(message.contains("Maintenance break"), "message was: {}", message);
    }
}
