/// Maximum length of an item name
pub const ITEM_NAME_MAX_LEN: usize = 128;

/// Maximum length of an item area (shop section)
pub const ITEM_AREA_MAX_LEN: usize = 128;

/// Maximum length of a grocery entry amount ("2 kg", "1 pakke")
pub const ENTRY_AMOUNT_MAX_LEN: usize = 64;

/// Maximum length of a grocery entry note
pub const ENTRY_NOTE_MAX_LEN: usize = 512;

/// Maximum length of a planned dinner
pub const DINNER_MAX_LEN: usize = 256;

/// Number of days returned for a meal plan week
pub const MEAL_PLAN_WEEK_DAYS: i64 = 7;
