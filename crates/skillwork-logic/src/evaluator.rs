//! Skill → priority lookup.
//!
//! ```
//! use skillwork_logic::evaluator::evaluate;
//! use skillwork_logic::rule::RangeRule;
//! use skillwork_logic::rule_set::RuleSet;
//!
//! let rules = RuleSet::from_rules([
//!     RangeRule::new(0, 5, 4),
//!     RangeRule::new(6, 10, 3),
//!     RangeRule::new(11, 20, 2),
//! ]);
//! assert_eq!(evaluate(false, 7, &rules), 3);
//! assert_eq!(evaluate(true, 7, &rules), 0);
//! ```

use crate::constants::priority;
use crate::rule_set::RuleSet;

/// Compute the priority for one entity/category pair.
///
/// * `disabled`: the host forbids the category; always yields
///   [`priority::DISABLED`].
/// * Otherwise the priority of the first rule, in ascending `min_value`
///   order, whose range contains `attribute_value`.
/// * A value that no rule covers also yields [`priority::DISABLED`]:
///   gaps in coverage switch the work off rather than leave it untouched.
pub fn evaluate(disabled: bool, attribute_value: i32, rules: &RuleSet) -> u8 {
    if disabled {
        return priority::DISABLED;
    }
    rules
        .rules()
        .find(|rule| rule.matches(attribute_value))
        .map(|rule| rule.priority())
        .unwrap_or(priority::DISABLED)
}
