//! Unit and city combat constants
//!
//! Formula coefficients (base damage, exponent divisor, counter scale,
//! fortification) live in `SimulationRules`; these are the fixed stat values.

// Hit points
pub const UNIT_MAX_HP: u32 = 100;
pub const CITY_BASE_HP: u32 = 200;
pub const WALLS_HP_BONUS: u32 = 100;

// City defence strength
pub const CITY_BASE_STRENGTH: f64 = 8.0;
pub const CITY_STRENGTH_PER_POP: f64 = 1.0;
pub const WALLS_STRENGTH_BONUS: f64 = 5.0;

// Embarked land units fight at a fraction of their strength
pub const EMBARKED_STRENGTH_FACTOR: f64 = 0.5;

// Cost to move between two water tiles, for naval and embarked units
pub const WATER_STEP_COST: u32 = 1;
