use super::domain::BonusCategory;

const LOW_TIER_CEILING: u64 = 100;
const MEDIUM_TIER_CEILING: u64 = 200;

/// Maps a manager's monthly call counter, already incremented for the call being
/// classified, to the tier that call earns.
pub fn classify(monthly_count: u64) -> BonusCategory {
    if monthly_count <= LOW_TIER_CEILING {
        BonusCategory::Low
    } else if monthly_count <= MEDIUM_TIER_CEILING {
        BonusCategory::Medium
    } else {
        BonusCategory::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_switch_at_101_and_201() {
        assert_eq!(classify(0), BonusCategory::Low);
        assert_eq!(classify(1), BonusCategory::Low);
        assert_eq!(classify(100), BonusCategory::Low);
        assert_eq!(classify(101), BonusCategory::Medium);
        assert_eq!(classify(200), BonusCategory::Medium);
        assert_eq!(classify(201), BonusCategory::High);
        assert_eq!(classify(u64::MAX), BonusCategory::High);
    }

    #[test]
    fn tier_never_decreases_as_count_grows() {
        let mut previous = classify(0);
        for count in 1..=400 {
            let current = classify(count);
            assert!(current >= previous, "tier dropped at {count}");
            previous = current;
        }
    }
}
