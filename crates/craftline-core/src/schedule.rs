//! Lead-time heuristics for production and installation scheduling.

use chrono::NaiveDate;

use crate::item::{BuildItem, HandlingClass};

/// A computed production window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSchedule {
    /// Scheduled production start.
    pub starts_on: NaiveDate,
    /// Projected production finish.
    pub finishes_on: NaiveDate,
}

/// Fixed lead-time heuristics used to derive schedule dates.
///
/// Every item contributes `base_units` plus extras for special handling and
/// oversize, multiplied by its quantity. The summed total is floored at one
/// unit and converted to calendar days through `units_per_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadTimeConfig {
    /// Build-time units every item contributes per unit of quantity.
    pub base_units: u32,
    /// Extra units for [`HandlingClass::Standard`] items.
    pub standard_handling_units: u32,
    /// Extra units for [`HandlingClass::Delicate`] items.
    pub delicate_handling_units: u32,
    /// Extra units for oversize items.
    pub oversize_units: u32,
    /// How many build-time units the shop completes per calendar day.
    pub units_per_day: u32,
    /// Days between projected production finish and installation.
    pub installation_buffer_days: u32,
}

impl Default for LeadTimeConfig {
    fn default() -> Self {
        Self {
            base_units: 1,
            standard_handling_units: 1,
            delicate_handling_units: 2,
            oversize_units: 1,
            units_per_day: 4,
            installation_buffer_days: 2,
        }
    }
}

impl LeadTimeConfig {
    /// Build-time units contributed by a single item line.
    fn item_units(&self, item: &BuildItem) -> u32 {
        let handling = match item.handling {
            Some(HandlingClass::Standard) => self.standard_handling_units,
            Some(HandlingClass::Delicate) => self.delicate_handling_units,
            None => 0,
        };
        let oversize = if item.oversize { self.oversize_units } else { 0 };
        (self.base_units + handling + oversize) * item.quantity
    }

    /// Total build-time units for a set of items, floored at one unit.
    #[must_use]
    pub fn build_units(&self, items: &[BuildItem]) -> u32 {
        items
            .iter()
            .map(|item| self.item_units(item))
            .sum::<u32>()
            .max(1)
    }

    /// Total build duration in calendar days, floored at one day.
    #[must_use]
    pub fn build_days(&self, items: &[BuildItem]) -> u32 {
        self.build_units(items).div_ceil(self.units_per_day).max(1)
    }

    /// Production window for `items` starting on `starts_on`.
    #[must_use]
    pub fn production_window(&self, starts_on: NaiveDate, items: &[BuildItem]) -> BuildSchedule {
        let finishes_on = starts_on + chrono::Days::new(u64::from(self.build_days(items)));
        BuildSchedule {
            starts_on,
            finishes_on,
        }
    }

    /// Installation date derived from a projected production finish.
    #[must_use]
    pub fn installation_date(&self, finishes_on: NaiveDate) -> NaiveDate {
        finishes_on + chrono::Days::new(u64::from(self.installation_buffer_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, handling: Option<HandlingClass>, oversize: bool) -> BuildItem {
        BuildItem {
            name: "Cabinet".to_owned(),
            description: None,
            category: None,
            material: None,
            color: None,
            dimensions: None,
            quantity,
            handling,
            oversize,
        }
    }

    #[test]
    fn test_build_units_sums_per_item_contributions() {
        // Arrange
        let config = LeadTimeConfig::default();
        let items = vec![
            item(1, None, false),                           // 1
            item(2, Some(HandlingClass::Standard), false),  // (1 + 1) * 2 = 4
            item(1, Some(HandlingClass::Delicate), true),   // 1 + 2 + 1 = 4
        ];

        // Act
        let units = config.build_units(&items);

        // Assert
        assert_eq!(units, 9);
    }

    #[test]
    fn test_build_units_floored_at_one_for_empty_items() {
        // Arrange
        let config = LeadTimeConfig::default();

        // Act
        let units = config.build_units(&[]);

        // Assert
        assert_eq!(units, 1);
    }

    #[test]
    fn test_build_days_divides_with_ceiling() {
        // Arrange
        let config = LeadTimeConfig::default();
        // 9 units at 4 units/day rounds up to 3 days.
        let items = vec![
            item(1, None, false),
            item(2, Some(HandlingClass::Standard), false),
            item(1, Some(HandlingClass::Delicate), true),
        ];

        // Act
        let days = config.build_days(&items);

        // Assert
        assert_eq!(days, 3);
    }

    #[test]
    fn test_production_window_and_installation_date() {
        // Arrange
        let config = LeadTimeConfig::default();
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let items = vec![item(1, None, false)]; // 1 unit -> 1 day

        // Act
        let window = config.production_window(start, &items);
        let install = config.installation_date(window.finishes_on);

        // Assert
        assert_eq!(window.starts_on, start);
        assert_eq!(window.finishes_on, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!(install, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
    }
}
